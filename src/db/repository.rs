//! Document repository over the SQLite `documents` table.
//!
//! Each document is stored as a JSON body keyed by `(collection, id)`.

use sqlx::{Row, SqlitePool};

use super::{Document, ListOrder, StoreError};

/// Primary-store operations, generic over the document type.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the underlying pool; every later call fails.
    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert a document that already carries its identifier.
    pub async fn insert<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let body = serde_json::to_string(doc)?;

        sqlx::query(
            "INSERT INTO documents (collection, id, body, created_ms) VALUES (?, ?, ?, ?)",
        )
        .bind(D::COLLECTION)
        .bind(doc.id())
        .bind(&body)
        .bind(doc.created_at().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List every document of the collection in its configured order.
    pub async fn list<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        let sql = match D::ORDER {
            ListOrder::Inserted => {
                "SELECT id, body FROM documents WHERE collection = ? ORDER BY seq"
            }
            ListOrder::NewestFirst => {
                "SELECT id, body FROM documents WHERE collection = ? ORDER BY created_ms DESC, seq DESC"
            }
        };

        let rows = sqlx::query(sql)
            .bind(D::COLLECTION)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let body: String = row.get("body");
                match serde_json::from_str(&body) {
                    Ok(doc) => Some(doc),
                    Err(e) => {
                        let id: String = row.get("id");
                        tracing::warn!(
                            collection = D::COLLECTION,
                            id = %id,
                            "Skipping undecodable document: {}",
                            e
                        );
                        None
                    }
                }
            })
            .collect())
    }

    /// Apply `apply` to a stored document inside a transaction.
    ///
    /// Returns `None` when the collection has no document with that id.
    pub async fn update<D, F>(&self, id: &str, apply: &F) -> Result<Option<D>, StoreError>
    where
        D: Document,
        F: Fn(&mut D) + Sync,
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(D::COLLECTION)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row.get("body");
        let mut doc: D = serde_json::from_str(&body)?;
        apply(&mut doc);
        let body = serde_json::to_string(&doc)?;

        sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
            .bind(&body)
            .bind(D::COLLECTION)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(doc))
    }

    /// Remove a document, returning it when it existed.
    pub async fn delete<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        let row =
            sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ? RETURNING body")
                .bind(D::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let body: String = row.get("body");
                Ok(Some(serde_json::from_str(&body)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::temp_repository;
    use crate::models::{Inquiry, InquiryStatus, Project};

    fn inquiry(id: &str, name: &str, created_offset_secs: i64) -> Inquiry {
        let created = Utc::now() + chrono::Duration::seconds(created_offset_secs);
        Inquiry {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            phone: "123".to_string(),
            course: "MERN".to_string(),
            message: None,
            status: InquiryStatus::New,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_inquiries_listed_newest_first() {
        let (repo, _temp_dir) = temp_repository().await;

        repo.insert(&inquiry("a", "older", -60)).await.unwrap();
        repo.insert(&inquiry("b", "newer", 0)).await.unwrap();
        repo.insert(&inquiry("c", "oldest", -120)).await.unwrap();

        let listed: Vec<Inquiry> = repo.list().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older", "oldest"]);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let (repo, _temp_dir) = temp_repository().await;

        let doc = inquiry("shared-id", "someone", 0);
        repo.insert(&doc).await.unwrap();

        let projects: Vec<Project> = repo.list().await.unwrap();
        assert!(projects.is_empty());
        let removed: Option<Project> = repo.delete("shared-id").await.unwrap();
        assert!(removed.is_none());

        let inquiries: Vec<Inquiry> = repo.list().await.unwrap();
        assert_eq!(inquiries.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, _temp_dir) = temp_repository().await;
        repo.insert(&inquiry("a", "someone", 0)).await.unwrap();

        let updated: Option<Inquiry> = repo
            .update("a", &|i: &mut Inquiry| i.status = InquiryStatus::Pending)
            .await
            .unwrap();
        assert_eq!(updated.unwrap().status, InquiryStatus::Pending);

        let missing: Option<Inquiry> = repo
            .update("nope", &|i: &mut Inquiry| i.status = InquiryStatus::Pending)
            .await
            .unwrap();
        assert!(missing.is_none());

        let removed: Option<Inquiry> = repo.delete("a").await.unwrap();
        assert_eq!(removed.unwrap().status, InquiryStatus::Pending);

        let removed_again: Option<Inquiry> = repo.delete("a").await.unwrap();
        assert!(removed_again.is_none());
    }

    #[tokio::test]
    async fn test_closed_pool_reports_errors() {
        let (repo, _temp_dir) = temp_repository().await;
        repo.close().await;

        let result: Result<Vec<Inquiry>, StoreError> = repo.list().await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
