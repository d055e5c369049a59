//! Domain records mirrored 1:1 onto remote documents.
//!
//! # Responsibility
//! - Define the canonical records managed by the admin screens.
//! - Own record-level validation used before every remote write.
//!
//! # Invariants
//! - Document ids are carried on the record but never serialized into the
//!   document body; stores fill them from the document name on read.
//! - Wire field names are camelCase.
//! - Timestamps are Unix epoch milliseconds.

pub mod banner;
pub mod college_info;
pub mod faculty;
pub mod gallery;
pub mod notice;
pub mod timetable;
pub mod validation;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Returns the current wall-clock time in epoch milliseconds.
///
/// A clock before the Unix epoch collapses to `0` instead of panicking.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Generates a client-side document id.
///
/// Used by collections whose records are written with `set` instead of `add`.
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}
