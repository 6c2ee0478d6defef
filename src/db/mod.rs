//! Primary document store and the storage adapter in front of it.
//!
//! The primary store is a SQLite database holding JSON documents grouped by
//! collection. Handlers never talk to it directly: every read and write goes
//! through a [`StorageAdapter`], which falls back to process memory as soon as
//! the store misbehaves.

mod adapter;
mod repository;

pub use adapter::*;
pub use repository::*;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Order in which a collection is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Oldest insertion first
    Inserted,
    /// Latest `created_at` first; ties go to the later insertion
    NewestFirst,
}

/// A record that can live in the document store or the fallback collection.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the documents are grouped under.
    const COLLECTION: &'static str;
    /// Order used when listing the collection.
    const ORDER: ListOrder;

    fn id(&self) -> &str;

    fn assign_id(&mut self, id: String);

    fn created_at(&self) -> DateTime<Utc>;
}

/// Failure talking to the primary store.
#[derive(Debug)]
pub enum StoreError {
    /// The configured location is not a SQLite URL
    UnsupportedUrl(String),
    /// Connecting took longer than the configured budget
    Timeout(Duration),
    Database(sqlx::Error),
    Codec(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UnsupportedUrl(url) => write!(f, "unsupported store URL: {}", url),
            StoreError::Timeout(budget) => {
                write!(f, "store did not answer within {:?}", budget)
            }
            StoreError::Database(err) => write!(f, "database error: {}", err),
            StoreError::Codec(err) => write!(f, "document encoding error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err)
    }
}

/// Connect to the primary store and create the documents table.
///
/// `connect_timeout` bounds the initial connection and every later pool
/// acquire; there is no other per-operation timeout.
pub async fn init_database(
    url: &str,
    connect_timeout: Duration,
) -> Result<SqlitePool, StoreError> {
    if !url.starts_with("sqlite:") {
        return Err(StoreError::UnsupportedUrl(redact(url)));
    }

    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    // Ensure the parent directory exists
    if let Some(parent) = options.get_filename().parent() {
        if parent != Path::new("") {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let connect = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(connect_timeout)
        .connect_with(options);

    let pool = tokio::time::timeout(connect_timeout, connect)
        .await
        .map_err(|_| StoreError::Timeout(connect_timeout))??;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create the documents table if it does not exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_ms INTEGER NOT NULL,
            UNIQUE (collection, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_documents_created
            ON documents(collection, created_ms);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Strip credentials from a URL before it reaches the logs.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

/// Repository backed by a fresh SQLite file inside a temp dir.
#[cfg(test)]
pub(crate) async fn temp_repository() -> (DocumentRepository, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let url = format!(
        "sqlite:{}?mode=rwc",
        temp_dir.path().join("test.sqlite").display()
    );
    let pool = init_database(&url, Duration::from_secs(5))
        .await
        .expect("Failed to init DB");
    (DocumentRepository::new(pool), temp_dir)
}
