//! Document store contract and backends.
//!
//! # Responsibility
//! - Define the collection/document CRUD contract shared by every backend.
//! - Keep transport details (REST, SQLite) out of repositories and services.
//!
//! # Invariants
//! - Document ids live in the document name, never in `fields`.
//! - `update` fails with `NotFound` for missing documents; `delete` does not.
//! - Query field paths must match `[A-Za-z_][A-Za-z0-9_]*`.
//! - No transactions: the last write wins.

pub mod firestore;
pub mod firestore_value;
pub mod migrations;
pub mod sqlite;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use firestore::FirestoreStore;
pub use sqlite::SqliteDocumentStore;

static FIELD_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field path regex"));

/// Document body: a flat or nested JSON object.
pub type Fields = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Sort direction for `DocumentQuery::order_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// Collection query: equality filters, one optional ordering, optional limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<u32>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks every field path used by this query.
    pub fn validate(&self) -> StoreResult<()> {
        for filter in &self.filters {
            validate_field_path(&filter.field)?;
        }
        if let Some((field, _)) = &self.order_by {
            validate_field_path(field)?;
        }
        Ok(())
    }
}

/// Store-level error for every backend.
#[derive(Debug)]
pub enum StoreError {
    /// Transport failure before a response was received.
    Http(reqwest::Error),
    /// Remote responded with a non-success status.
    Status { status: u16, body: String },
    Sqlite(rusqlite::Error),
    /// Document body could not be encoded or decoded.
    Codec(String),
    NotFound { collection: String, id: String },
    InvalidFieldPath(String),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "document store request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "document store returned status {status}: {body}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Codec(message) => write!(f, "document codec error: {message}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::InvalidFieldPath(path) => write!(f, "invalid field path: `{path}`"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value.to_string())
    }
}

/// Collection/document CRUD contract.
pub trait DocumentStore: Send + Sync {
    /// Creates a document with a store-assigned id and returns that id.
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String>;
    /// Creates or fully replaces the document at `id`.
    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()>;
    /// Merges `fields` into an existing document.
    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()>;
    /// Removes a document; missing documents are not an error.
    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        (**self).add(collection, fields)
    }

    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        (**self).set(collection, id, fields)
    }

    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        (**self).update(collection, id, fields)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        (**self).get(collection, id)
    }

    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        (**self).query(collection, query)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        (**self).add(collection, fields)
    }

    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        (**self).set(collection, id, fields)
    }

    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        (**self).update(collection, id, fields)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        (**self).get(collection, id)
    }

    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        (**self).query(collection, query)
    }
}

/// Rejects field paths that cannot be used as a top-level document key.
pub fn validate_field_path(path: &str) -> StoreResult<()> {
    if FIELD_PATH_RE.is_match(path) {
        Ok(())
    } else {
        Err(StoreError::InvalidFieldPath(path.to_string()))
    }
}
