//! Events pushed to notification subscribers.

use serde::{Deserialize, Serialize};

use super::Inquiry;

/// Identifier of a removed inquiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedInquiry {
    #[serde(rename = "_id")]
    pub id: String,
}

/// A notification event, serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEvent {
    /// Sent once to each subscriber as soon as its stream opens
    Connected,
    NewInquiry(Inquiry),
    InquiryStatusUpdated(Inquiry),
    InquiryDeleted(DeletedInquiry),
}

impl NotificationEvent {
    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::Connected => "CONNECTED",
            NotificationEvent::NewInquiry(_) => "NEW_INQUIRY",
            NotificationEvent::InquiryStatusUpdated(_) => "INQUIRY_STATUS_UPDATED",
            NotificationEvent::InquiryDeleted(_) => "INQUIRY_DELETED",
        }
    }
}
