//! Typed record access over a `DocumentStore`.
//!
//! # Responsibility
//! - Convert between domain records and document bodies.
//! - Enforce `Record::validate()` before every write.
//!
//! # Invariants
//! - Single-record reads reject invalid persisted documents; list reads skip
//!   them with a warning.
//! - Repository errors keep `NotFound` distinct from transport failures.

pub mod record_repo;
