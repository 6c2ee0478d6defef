//! Storage adapter with in-memory fallback.
//!
//! While connected, every call goes to the primary store. The first primary
//! failure flips the adapter into degraded mode for the rest of the process:
//! the failing write is re-applied to the fallback collection, and every
//! later call skips the primary store entirely. There is no reconnection.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentRepository, ListOrder, StoreError};
use crate::ids::TimeTokens;

/// Which backing store answered, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    #[serde(rename = "mongodb")]
    Database,
    Demo,
}

/// One collection's view over the primary store and its fallback.
pub struct StorageAdapter<D: Document> {
    primary: Option<DocumentRepository>,
    connected: AtomicBool,
    fallback: RwLock<Vec<D>>,
    tokens: TimeTokens,
}

impl<D: Document> StorageAdapter<D> {
    /// Create an adapter; without a repository it starts degraded.
    pub fn new(primary: Option<DocumentRepository>) -> Self {
        Self {
            connected: AtomicBool::new(primary.is_some()),
            primary,
            fallback: RwLock::new(Vec::new()),
            tokens: TimeTokens::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn mode(&self) -> StoreMode {
        if self.is_connected() {
            StoreMode::Database
        } else {
            StoreMode::Demo
        }
    }

    /// The primary repository, unless the adapter has degraded.
    fn primary(&self) -> Option<&DocumentRepository> {
        if self.is_connected() {
            self.primary.as_ref()
        } else {
            None
        }
    }

    fn degrade(&self, operation: &str, error: StoreError) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::error!(
                collection = D::COLLECTION,
                operation,
                "Primary store failed, switching to in-memory storage: {}",
                error
            );
        } else {
            tracing::warn!(
                collection = D::COLLECTION,
                operation,
                "Primary store failed after degradation: {}",
                error
            );
        }
    }

    /// All documents of the collection in its configured order.
    pub async fn list(&self) -> Vec<D> {
        if let Some(repo) = self.primary() {
            match repo.list::<D>().await {
                Ok(docs) => return docs,
                Err(e) => self.degrade("list", e),
            }
        }

        let fallback = self.fallback.read().await;
        match D::ORDER {
            ListOrder::Inserted => fallback.clone(),
            ListOrder::NewestFirst => {
                let mut docs: Vec<D> = fallback.iter().rev().cloned().collect();
                docs.sort_by_key(|doc| std::cmp::Reverse(doc.created_at()));
                docs
            }
        }
    }

    /// Store a new document and return it with its assigned identifier.
    pub async fn create(&self, mut doc: D) -> D {
        if let Some(repo) = self.primary() {
            doc.assign_id(Uuid::new_v4().simple().to_string());
            match repo.insert(&doc).await {
                Ok(()) => return doc,
                Err(e) => self.degrade("create", e),
            }
        }

        doc.assign_id(self.tokens.next().to_string());
        self.fallback.write().await.push(doc.clone());
        doc
    }

    /// Apply `apply` to the document with `id`; `None` when it does not exist.
    ///
    /// `apply` runs a second time against the fallback copy if the primary
    /// store fails mid-update.
    pub async fn update<F>(&self, id: &str, apply: F) -> Option<D>
    where
        F: Fn(&mut D) + Send + Sync,
    {
        if let Some(repo) = self.primary() {
            match repo.update::<D, F>(id, &apply).await {
                Ok(doc) => return doc,
                Err(e) => self.degrade("update", e),
            }
        }

        let mut fallback = self.fallback.write().await;
        let doc = fallback.iter_mut().find(|doc| doc.id() == id)?;
        apply(doc);
        Some(doc.clone())
    }

    /// Remove the document with `id`, returning it; `None` when it does not exist.
    pub async fn delete(&self, id: &str) -> Option<D> {
        if let Some(repo) = self.primary() {
            match repo.delete::<D>(id).await {
                Ok(doc) => return doc,
                Err(e) => self.degrade("delete", e),
            }
        }

        let mut fallback = self.fallback.write().await;
        let index = fallback.iter().position(|doc| doc.id() == id)?;
        Some(fallback.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db::temp_repository;
    use crate::models::{Inquiry, InquiryStatus, Project};

    fn inquiry(name: &str) -> Inquiry {
        let now = Utc::now();
        Inquiry {
            id: String::new(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: "123".to_string(),
            course: "MERN".to_string(),
            message: None,
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    fn project(title: &str) -> Project {
        Project {
            id: String::new(),
            title: title.to_string(),
            description: "description".to_string(),
            details: "details".to_string(),
            image: "/img/project.png".to_string(),
            technologies: vec!["Rust".to_string()],
            published: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_without_primary_starts_in_demo_mode() {
        let adapter: StorageAdapter<Inquiry> = StorageAdapter::new(None);
        assert!(!adapter.is_connected());
        assert_eq!(adapter.mode(), StoreMode::Demo);
        assert_eq!(serde_json::to_value(adapter.mode()).unwrap(), "demo");

        let created = adapter.create(inquiry("a")).await;
        assert!(created.id.parse::<u64>().is_ok());
        assert_eq!(adapter.list().await, vec![created]);
    }

    #[tokio::test]
    async fn test_fallback_lists_newest_first() {
        let adapter: StorageAdapter<Inquiry> = StorageAdapter::new(None);

        let mut old = inquiry("old");
        old.created_at = Utc::now() - Duration::minutes(5);
        adapter.create(old).await;
        adapter.create(inquiry("first")).await;
        adapter.create(inquiry("second")).await;

        let names: Vec<String> = adapter.list().await.into_iter().map(|i| i.name).collect();
        assert_eq!(names.last().map(String::as_str), Some("old"));
        // Equal timestamps keep the later insertion first
        let first = names.iter().position(|n| n == "first").unwrap();
        let second = names.iter().position(|n| n == "second").unwrap();
        assert!(second < first);
    }

    #[tokio::test]
    async fn test_fallback_projects_keep_insertion_order() {
        let adapter: StorageAdapter<Project> = StorageAdapter::new(None);
        adapter.create(project("one")).await;
        adapter.create(project("two")).await;

        let titles: Vec<String> = adapter.list().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_fallback_update_and_delete() {
        let adapter: StorageAdapter<Inquiry> = StorageAdapter::new(None);
        let created = adapter.create(inquiry("a")).await;

        let updated = adapter
            .update(&created.id, |i| i.status = InquiryStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::Completed);

        assert!(adapter
            .update("missing", |i| i.status = InquiryStatus::Pending)
            .await
            .is_none());

        assert!(adapter.delete("missing").await.is_none());
        assert_eq!(adapter.list().await.len(), 1);

        let removed = adapter.delete(&created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(adapter.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_primary_round_trip() {
        let (repo, _temp_dir) = temp_repository().await;
        let adapter: StorageAdapter<Project> = StorageAdapter::new(Some(repo));
        assert_eq!(adapter.mode(), StoreMode::Database);
        assert_eq!(serde_json::to_value(adapter.mode()).unwrap(), "mongodb");

        let created = adapter.create(project("stored")).await;
        assert_eq!(created.id.len(), 32);

        let published = adapter
            .update(&created.id, |p| p.published = true)
            .await
            .unwrap();
        assert!(published.published);
        assert_eq!(adapter.list().await, vec![published]);

        assert!(adapter.delete(&created.id).await.is_some());
        assert!(adapter.delete(&created.id).await.is_none());
        assert!(adapter.is_connected());
    }

    #[tokio::test]
    async fn test_primary_failure_degrades_permanently() {
        let (repo, _temp_dir) = temp_repository().await;
        let adapter: StorageAdapter<Inquiry> = StorageAdapter::new(Some(repo.clone()));

        let stored = adapter.create(inquiry("stored")).await;
        assert!(adapter.is_connected());

        repo.close().await;

        // The failing write lands in the fallback instead of erroring
        let rescued = adapter.create(inquiry("rescued")).await;
        assert!(!adapter.is_connected());
        assert_eq!(adapter.mode(), StoreMode::Demo);
        assert!(rescued.id.parse::<u64>().is_ok());

        // Only fallback records are visible from now on
        assert_eq!(adapter.list().await, vec![rescued.clone()]);
        assert!(adapter
            .update(&stored.id, |i| i.status = InquiryStatus::Pending)
            .await
            .is_none());
        assert!(adapter.delete(&stored.id).await.is_none());

        let updated = adapter
            .update(&rescued.id, |i| i.status = InquiryStatus::Pending)
            .await
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::Pending);
        assert!(!adapter.is_connected());
    }

    #[tokio::test]
    async fn test_failed_update_is_reapplied_to_fallback() {
        let (repo, _temp_dir) = temp_repository().await;
        let adapter: StorageAdapter<Inquiry> = StorageAdapter::new(Some(repo.clone()));

        repo.close().await;

        assert!(adapter
            .update("whatever", |i| i.status = InquiryStatus::Completed)
            .await
            .is_none());
        assert!(!adapter.is_connected());
    }
}
