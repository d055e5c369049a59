//! Timetable management flow.
//!
//! # Invariants
//! - Only active entries are loaded; delete is a soft delete that hides the
//!   entry from the list but keeps the document.
//! - Every write stamps `last_updated`.
//! - The list is ordered by day, then slot start time.

use crate::model::new_document_id;
use crate::model::now_epoch_ms;
use crate::model::timetable::{compare_slots, TimetableEntry};
use crate::repo::record_repo::{Record, RecordRepository};
use crate::service::filter::{distinct_values, TimetableFilter};
use crate::service::record_list::RecordList;
use crate::service::{ServiceError, ServiceResult};
use crate::store::{DocumentQuery, DocumentStore, Fields};
use log::info;
use serde_json::Value;

pub struct TimetableService<S: DocumentStore> {
    repo: RecordRepository<S>,
    entries: RecordList<TimetableEntry>,
}

impl<S: DocumentStore> TimetableService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: RecordRepository::new(store),
            entries: RecordList::new(),
        }
    }

    /// Fetches active entries.
    pub fn load(&mut self) -> ServiceResult<&[TimetableEntry]> {
        let query = DocumentQuery::new().where_eq("isActive", true);
        let entries = self.repo.list::<TimetableEntry>(&query)?;
        info!(
            "event=collection_load module=service kind=timetable count={}",
            entries.len()
        );
        self.entries.replace_all(entries);
        self.sort();
        Ok(self.entries.items())
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        self.entries.items()
    }

    pub fn filtered(&self, filter: &TimetableFilter) -> Vec<TimetableEntry> {
        self.entries
            .items()
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    pub fn years(&self) -> Vec<String> {
        distinct_values(self.entries.items().iter().map(|e| e.year.as_str()))
    }

    pub fn branches(&self) -> Vec<String> {
        distinct_values(self.entries.items().iter().map(|e| e.branch.as_str()))
    }

    pub fn create(&mut self, draft: TimetableEntry) -> ServiceResult<TimetableEntry> {
        draft.validate()?;
        let mut entry = draft;
        if entry.id.trim().is_empty() {
            entry.id = new_document_id();
        }
        entry.is_active = true;
        entry.last_updated = now_epoch_ms();

        self.repo.put(&entry)?;
        info!("event=record_create module=service kind=timetable id={}", entry.id);
        self.entries.push(entry.clone());
        self.sort();
        Ok(entry)
    }

    pub fn update(&mut self, record: TimetableEntry) -> ServiceResult<TimetableEntry> {
        record.validate()?;
        self.resolve(record.id())?;
        let mut entry = record;
        entry.last_updated = now_epoch_ms();

        self.repo.replace(&entry)?;
        info!("event=record_update module=service kind=timetable id={}", entry.id);
        if entry.is_active {
            self.entries.upsert(entry.clone());
            self.sort();
        } else {
            self.entries.remove_by_id(&entry.id);
        }
        Ok(entry)
    }

    /// Soft delete: clears `isActive` and drops the entry from the list.
    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let mut entry = self.resolve(id)?;
        entry.soft_delete(now_epoch_ms());

        let mut fields = Fields::new();
        fields.insert("isActive".to_string(), Value::Bool(false));
        fields.insert("lastUpdated".to_string(), Value::from(entry.last_updated));
        self.repo.patch::<TimetableEntry>(id, &fields)?;

        self.entries.remove_by_id(id);
        info!("event=record_soft_delete module=service kind=timetable id={id}");
        Ok(())
    }

    fn resolve(&self, id: &str) -> ServiceResult<TimetableEntry> {
        if let Some(entry) = self.entries.find(id) {
            return Ok(entry.clone());
        }
        self.repo
            .get::<TimetableEntry>(id)?
            .ok_or_else(|| ServiceError::UnknownRecord {
                kind: TimetableEntry::KIND,
                id: id.to_string(),
            })
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            a.day
                .cmp(&b.day)
                .then_with(|| compare_slots(&a.time_slot, &b.time_slot))
                .then_with(|| a.branch.cmp(&b.branch))
        });
    }
}
