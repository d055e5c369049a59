//! Client-side filters applied to loaded lists.
//!
//! An empty choice or the literal `All` disables that criterion. Text search
//! is a case-insensitive substring match over each record's searchable fields.

use crate::model::faculty::Faculty;
use crate::model::notice::{Notice, NoticePriority};
use crate::model::timetable::{TimetableEntry, Weekday};

/// Choice label that disables a dropdown filter.
pub const ALL_CHOICE: &str = "All";

fn active_choice(choice: &Option<String>) -> Option<&str> {
    choice
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL_CHOICE))
}

fn needle(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn same_choice(selected: Option<&str>, value: &str) -> bool {
    selected.map_or(true, |selected| selected.eq_ignore_ascii_case(value.trim()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyFilter {
    pub query: String,
    pub department: Option<String>,
    pub include_inactive: bool,
}

impl FacultyFilter {
    pub fn matches(&self, faculty: &Faculty) -> bool {
        if !self.include_inactive && !faculty.is_active {
            return false;
        }
        if !same_choice(active_choice(&self.department), &faculty.department) {
            return false;
        }
        needle(&self.query).map_or(true, |needle| faculty.matches_text(&needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeFilter {
    pub query: String,
    pub category: Option<String>,
    pub priority: Option<NoticePriority>,
    pub active_only: bool,
}

impl NoticeFilter {
    pub fn matches(&self, notice: &Notice) -> bool {
        if self.active_only && !notice.is_active {
            return false;
        }
        if !same_choice(active_choice(&self.category), &notice.category) {
            return false;
        }
        if self.priority.is_some_and(|priority| priority != notice.priority) {
            return false;
        }
        needle(&self.query).map_or(true, |needle| notice.matches_text(&needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableFilter {
    pub query: String,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub day: Option<Weekday>,
}

impl TimetableFilter {
    pub fn matches(&self, entry: &TimetableEntry) -> bool {
        if !same_choice(active_choice(&self.year), &entry.year) {
            return false;
        }
        if !same_choice(active_choice(&self.branch), &entry.branch) {
            return false;
        }
        if self.day.is_some_and(|day| day != entry.day) {
            return false;
        }
        needle(&self.query).map_or(true, |needle| entry.matches_text(&needle))
    }
}

/// Sorted distinct non-blank values, used to populate filter choices.
pub fn distinct_values<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<String> = values
        .into_iter()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    distinct.sort_by_key(|value| value.to_lowercase());
    distinct.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    distinct
}
