//! In-memory list mirrored from a collection.

use crate::repo::record_repo::Record;
use std::cmp::Ordering;

/// Loaded records for one screen, reconciled after each successful write.
#[derive(Debug, Clone)]
pub struct RecordList<T: Record> {
    items: Vec<T>,
    loaded: bool,
}

impl<T: Record> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

impl<T: Record> RecordList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list with a fresh fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn insert_first(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Replaces the record with the same id; returns `false` if absent.
    pub fn replace_by_id(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Replaces by id, appending when the record was not loaded.
    pub fn upsert(&mut self, item: T) {
        if !self.replace_by_id(item.clone()) {
            self.items.push(item);
        }
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }
}
