//! Customer inquiry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient_text, required_text};
use crate::db::{Document, ListOrder};

/// Processing state of an inquiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Pending,
    Completed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Pending => "pending",
            InquiryStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(InquiryStatus::New),
            "pending" => Some(InquiryStatus::Pending),
            "completed" => Some(InquiryStatus::Completed),
            _ => None,
        }
    }
}

/// A course inquiry submitted through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    /// Move the inquiry to `status`, stamping the update time.
    pub fn set_status(&mut self, status: InquiryStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Document for Inquiry {
    const COLLECTION: &'static str = "inquiries";
    const ORDER: ListOrder = ListOrder::NewestFirst;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Request body for submitting an inquiry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInquiryRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

impl CreateInquiryRequest {
    /// Build a fresh inquiry, or `None` when a required field is missing.
    pub fn into_inquiry(self, now: DateTime<Utc>) -> Option<Inquiry> {
        Some(Inquiry {
            id: String::new(),
            name: required_text(self.name)?,
            email: required_text(self.email)?,
            phone: required_text(self.phone)?,
            course: required_text(self.course)?,
            message: required_text(self.message),
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Request body for changing an inquiry's status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInquiryStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(InquiryStatus::parse("new"), Some(InquiryStatus::New));
        assert_eq!(InquiryStatus::parse("pending"), Some(InquiryStatus::Pending));
        assert_eq!(
            InquiryStatus::parse("completed"),
            Some(InquiryStatus::Completed)
        );
        assert_eq!(InquiryStatus::parse("Completed"), None);
        assert_eq!(InquiryStatus::parse("archived"), None);
        assert_eq!(InquiryStatus::parse(""), None);
    }

    #[test]
    fn test_into_inquiry_sets_server_defaults() {
        let now = Utc::now();
        let inquiry = CreateInquiryRequest {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            phone: Some("123".to_string()),
            course: Some("MERN".to_string()),
            message: Some(String::new()),
        }
        .into_inquiry(now)
        .unwrap();

        assert_eq!(inquiry.status, InquiryStatus::New);
        assert_eq!(inquiry.created_at, now);
        assert_eq!(inquiry.updated_at, now);
        assert!(inquiry.message.is_none());
    }

    #[test]
    fn test_into_inquiry_requires_contact_fields() {
        let request = CreateInquiryRequest {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            phone: None,
            course: Some("MERN".to_string()),
            message: None,
        };
        assert!(request.into_inquiry(Utc::now()).is_none());
    }

    #[test]
    fn test_create_request_accepts_scalar_fields() {
        let request: CreateInquiryRequest = serde_json::from_value(serde_json::json!({
            "name": "A",
            "email": "a@x.com",
            "phone": 1234567890,
            "course": 3,
            "message": null,
        }))
        .unwrap();
        assert_eq!(request.phone.as_deref(), Some("1234567890"));
        assert_eq!(request.course.as_deref(), Some("3"));
        assert!(request.message.is_none());

        let inquiry = request.into_inquiry(Utc::now()).unwrap();
        assert_eq!(inquiry.phone, "1234567890");
        assert_eq!(inquiry.course, "3");
    }

    #[test]
    fn test_create_request_treats_empty_and_structured_values_as_missing() {
        let request: CreateInquiryRequest = serde_json::from_value(serde_json::json!({
            "name": "A",
            "email": "",
            "phone": ["123"],
            "course": {"id": 3},
        }))
        .unwrap();
        assert_eq!(request.email.as_deref(), Some(""));
        assert!(request.phone.is_none());
        assert!(request.course.is_none());
        assert!(request.into_inquiry(Utc::now()).is_none());
    }

    #[test]
    fn test_into_inquiry_keeps_values_as_sent() {
        let inquiry = CreateInquiryRequest {
            name: Some("  A  ".to_string()),
            email: Some("a@x.com".to_string()),
            phone: Some(" ".to_string()),
            course: Some("MERN".to_string()),
            message: Some(" hi ".to_string()),
        }
        .into_inquiry(Utc::now())
        .unwrap();

        assert_eq!(inquiry.name, "  A  ");
        assert_eq!(inquiry.phone, " ");
        assert_eq!(inquiry.message.as_deref(), Some(" hi "));
    }

    #[test]
    fn test_set_status_touches_updated_at() {
        let created = Utc::now();
        let mut inquiry = CreateInquiryRequest {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            phone: Some("123".to_string()),
            course: Some("MERN".to_string()),
            message: None,
        }
        .into_inquiry(created)
        .unwrap();

        let later = created + chrono::Duration::seconds(5);
        inquiry.set_status(InquiryStatus::Completed, later);

        assert_eq!(inquiry.status.as_str(), "completed");
        assert_eq!(inquiry.created_at, created);
        assert_eq!(inquiry.updated_at, later);
    }
}
