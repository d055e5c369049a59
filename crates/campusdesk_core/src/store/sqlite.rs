//! SQLite-backed document store.
//!
//! # Responsibility
//! - Provide the `DocumentStore` contract without network access, for offline
//!   admin sessions and tests.
//! - Keep SQL and JSON-path details inside this module.
//!
//! # Invariants
//! - Returned stores have migrations fully applied.
//! - Bodies are stored as JSON objects; filters compare through
//!   `json_extract`, so booleans compare as `0/1`.
//! - Unordered queries return documents sorted by id, like the remote store.

use crate::model::new_document_id;
use crate::store::migrations::apply_migrations;
use crate::store::{
    Direction, Document, DocumentQuery, DocumentStore, Fields, StoreError, StoreResult,
};
use log::{debug, error, info};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Local document store over a single SQLite connection.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Opens (or creates) a database file and applies pending migrations.
    ///
    /// # Side effects
    /// - Emits `store_open` events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_open module=store backend=sqlite status=start mode=file");
        let result = Connection::open(path)
            .map_err(StoreError::from)
            .and_then(Self::bootstrap);
        log_open_result("file", started_at, &result);
        result
    }

    /// Opens a private in-memory database with migrations applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_open module=store backend=sqlite status=start mode=memory");
        let result = Connection::open_in_memory()
            .map_err(StoreError::from)
            .and_then(Self::bootstrap);
        log_open_result("memory", started_at, &result);
        result
    }

    fn bootstrap(mut conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_open_result(mode: &str, started_at: Instant, result: &StoreResult<SqliteDocumentStore>) {
    match result {
        Ok(_) => info!(
            "event=store_open module=store backend=sqlite status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_open module=store backend=sqlite status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        let id = new_document_id();
        let body = serde_json::to_string(fields)?;
        self.conn().execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3);",
            params![collection, id, body],
        )?;
        debug!("event=doc_add module=store backend=sqlite collection={collection} id={id}");
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let body = serde_json::to_string(fields)?;
        self.conn().execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_id) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection, id, body],
        )?;
        debug!("event=doc_set module=store backend=sqlite collection={collection} id={id}");
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let conn = self.conn();
        let existing: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(existing) = existing else {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        };

        let mut merged = parse_body(&existing)?;
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }

        conn.execute(
            "UPDATE documents
             SET body = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?2 AND doc_id = ?3;",
            params![serde_json::to_string(&merged)?, collection, id],
        )?;
        debug!("event=doc_update module=store backend=sqlite collection={collection} id={id}");
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.conn().execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
        )?;
        debug!("event=doc_delete module=store backend=sqlite collection={collection} id={id}");
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let body: Option<String> = self
            .conn()
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| {
            Ok(Document {
                id: id.to_string(),
                fields: parse_body(&body)?,
            })
        })
        .transpose()
    }

    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        query.validate()?;

        let mut sql = String::from("SELECT doc_id, body FROM documents WHERE collection = ?");
        let mut bind_values: Vec<SqlValue> = vec![SqlValue::Text(collection.to_string())];

        for filter in &query.filters {
            let path = json_path(&filter.field);
            match to_sql_value(&filter.value)? {
                Some(value) => {
                    sql.push_str(" AND json_extract(body, ?) = ?");
                    bind_values.push(SqlValue::Text(path));
                    bind_values.push(value);
                }
                None => {
                    sql.push_str(" AND json_extract(body, ?) IS NULL");
                    bind_values.push(SqlValue::Text(path));
                }
            }
        }

        match &query.order_by {
            Some((field, direction)) => {
                sql.push_str(" ORDER BY json_extract(body, ?) ");
                sql.push_str(match direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                });
                sql.push_str(", doc_id ASC");
                bind_values.push(SqlValue::Text(json_path(field)));
            }
            None => sql.push_str(" ORDER BY doc_id ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(SqlValue::Integer(i64::from(limit)));
        }

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            documents.push(Document {
                id,
                fields: parse_body(&body)?,
            });
        }

        Ok(documents)
    }
}

fn json_path(field: &str) -> String {
    format!("$.{field}")
}

fn parse_body(body: &str) -> StoreResult<Fields> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Codec(format!(
            "stored document body is not an object: {other}"
        ))),
    }
}

/// Maps a filter value to the scalar `json_extract` yields; `None` means null.
fn to_sql_value(value: &Value) -> StoreResult<Option<SqlValue>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(SqlValue::Integer(i64::from(*flag)))),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Some(SqlValue::Integer(int)))
            } else if let Some(float) = number.as_f64() {
                Ok(Some(SqlValue::Real(float)))
            } else {
                Err(StoreError::Codec(format!("unsupported number filter: {number}")))
            }
        }
        Value::String(text) => Ok(Some(SqlValue::Text(text.clone()))),
        Value::Array(_) | Value::Object(_) => Err(StoreError::Codec(
            "equality filters support scalar values only".to_string(),
        )),
    }
}
