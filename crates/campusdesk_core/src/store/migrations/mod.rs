//! Schema steps for the local `documents` table.
//!
//! # Invariants
//! - Each step is one SQL script keyed by a strictly increasing version.
//! - `PRAGMA user_version` holds the highest applied step.
//! - A file stamped with a version above `latest_version()` is refused.

use crate::store::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs, oldest first.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_documents.sql"))];

/// Highest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the documents schema up to date in one transaction.
///
/// Returns the version the file was at before the upgrade.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<u32> {
    let found = current_user_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&(u32, &str)> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (version, script) in pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=store_migrate module=store backend=sqlite from={found} to={latest}");
    Ok(found)
}

pub(crate) fn current_user_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
