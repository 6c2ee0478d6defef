//! Portfolio project model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient_text, required_text};
use crate::db::{Document, ListOrder};

/// A portfolio project shown on the marketing site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub details: String,
    pub image: String,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const ORDER: ListOrder = ListOrder::Inserted;

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

/// Request body for creating a new project.
///
/// Every field is optional at the parsing stage so that a missing field is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
}

impl CreateProjectRequest {
    /// Build the project record, or `None` when a required field is missing.
    pub fn into_project(self, now: DateTime<Utc>) -> Option<Project> {
        let technologies: Vec<String> = self
            .technologies?
            .into_iter()
            .filter_map(|tech| required_text(Some(tech)))
            .collect();
        if technologies.is_empty() {
            return None;
        }

        Some(Project {
            id: String::new(),
            title: required_text(self.title)?,
            description: required_text(self.description)?,
            details: required_text(self.details)?,
            image: required_text(self.image)?,
            technologies,
            published: self.published.unwrap_or(false),
            created_at: now,
        })
    }
}

/// Request body for toggling a project's published flag.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishProjectRequest {
    #[serde(default)]
    pub published: Option<bool>,
}
