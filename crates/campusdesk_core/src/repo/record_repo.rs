//! Generic record repository.

use crate::model::validation::RecordValidationError;
use crate::store::{Document, DocumentQuery, DocumentStore, Fields, StoreError};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// A domain record stored as one document in a fixed collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Remote collection name.
    const COLLECTION: &'static str;
    /// Short label used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn validate(&self) -> Result<(), RecordValidationError>;
}

/// Repository error for record persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Store(StoreError),
    NotFound { kind: &'static str, id: String },
    /// Write requires an id the record does not have.
    MissingId(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::MissingId(kind) => write!(f, "{kind} has no document id"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Typed CRUD over any `DocumentStore`.
pub struct RecordRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> RecordRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a record with a store-assigned id and returns the stored copy.
    pub fn add<T: Record>(&self, record: &T) -> RepoResult<T> {
        record.validate()?;
        let id = self.store.add(T::COLLECTION, &to_fields(record)?)?;
        let mut stored = record.clone();
        stored.set_id(id);
        Ok(stored)
    }

    /// Creates or replaces a record under its own id.
    pub fn put<T: Record>(&self, record: &T) -> RepoResult<()> {
        record.validate()?;
        let id = require_id(record)?;
        self.store.set(T::COLLECTION, id, &to_fields(record)?)?;
        Ok(())
    }

    /// Replaces an existing record; fails with `NotFound` when it is gone.
    pub fn replace<T: Record>(&self, record: &T) -> RepoResult<()> {
        record.validate()?;
        let id = require_id(record)?;
        self.store
            .update(T::COLLECTION, id, &to_fields(record)?)
            .map_err(|err| not_found_as::<T>(err, id))
    }

    /// Merges raw fields into an existing record without full validation.
    pub fn patch<T: Record>(&self, id: &str, fields: &Fields) -> RepoResult<()> {
        self.store
            .update(T::COLLECTION, id, fields)
            .map_err(|err| not_found_as::<T>(err, id))
    }

    pub fn get<T: Record>(&self, id: &str) -> RepoResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)?
            .map(from_document::<T>)
            .transpose()
    }

    /// Lists matching records, skipping documents that fail to decode or
    /// validate. `get` stays strict for single lookups.
    pub fn list<T: Record>(&self, query: &DocumentQuery) -> RepoResult<Vec<T>> {
        let documents = self.store.query(T::COLLECTION, query)?;
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match from_document::<T>(document) {
                Ok(record) => records.push(record),
                Err(err) => warn!(
                    "event=record_skip module=repo kind={} status=invalid error={err}",
                    T::KIND
                ),
            }
        }
        Ok(records)
    }

    pub fn delete<T: Record>(&self, id: &str) -> RepoResult<()> {
        self.store.delete(T::COLLECTION, id)?;
        Ok(())
    }
}

fn require_id<T: Record>(record: &T) -> RepoResult<&str> {
    let id = record.id();
    if id.trim().is_empty() {
        return Err(RepoError::MissingId(T::KIND));
    }
    Ok(id)
}

fn not_found_as<T: Record>(err: StoreError, id: &str) -> RepoError {
    match err {
        StoreError::NotFound { .. } => RepoError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        },
        other => RepoError::Store(other),
    }
}

/// Serializes a record body; the id is never part of the body.
pub fn to_fields<T: Record>(record: &T) -> RepoResult<Fields> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RepoError::InvalidData(format!(
            "{} serialized to a non-object: {other}",
            T::KIND
        ))),
        Err(err) => Err(RepoError::InvalidData(err.to_string())),
    }
}

fn from_document<T: Record>(document: Document) -> RepoResult<T> {
    let Document { id, fields } = document;
    let mut record: T = serde_json::from_value(Value::Object(fields)).map_err(|err| {
        RepoError::InvalidData(format!("{} document `{id}`: {err}", T::KIND))
    })?;
    record.set_id(id);
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!("{} document `{}`: {err}", T::KIND, record.id()))
    })?;
    Ok(record)
}
