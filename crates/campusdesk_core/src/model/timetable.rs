//! Timetable entry record.
//!
//! # Invariants
//! - `id` is generated client-side and written with `set`.
//! - Deletion is a soft delete: `is_active = false`, `last_updated` bumped.
//! - `last_updated` must be refreshed on every write.

use crate::model::validation::{require, RecordValidationError};
use crate::repo::record_repo::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

static SLOT_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})(?:[:.](\d{2}))?\s*(am|pm)?\s*(?:-|$)")
        .expect("valid slot start regex")
});

/// Day of the week a class is held.
///
/// Stored documents are decoded through [`Weekday::parse`], so `monday` and
/// `Mon` load as `Monday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Accepts full names and three-letter abbreviations, any case.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|day| {
            let name = day.as_str().to_ascii_lowercase();
            lowered == name || (lowered.len() == 3 && name.starts_with(lowered.as_str()))
        })
    }
}

impl TryFrom<String> for Weekday {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown weekday `{value}`"))
    }
}

/// Minutes after midnight at which a slot label starts.
///
/// Accepts `9:00-10:00`, `09.30 - 10.30`, `2:00 PM-3:00 PM` and bare hours.
pub fn slot_start_minutes(slot: &str) -> Option<u32> {
    let captures = SLOT_START_RE.captures(slot)?;
    let mut hours: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = match captures.get(2) {
        Some(minutes) => minutes.as_str().parse().ok()?,
        None => 0,
    };
    if let Some(meridiem) = captures.get(3) {
        if hours == 0 || hours > 12 {
            return None;
        }
        hours %= 12;
        if meridiem.as_str().eq_ignore_ascii_case("pm") {
            hours += 12;
        }
    }
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Orders slot labels by start time; unparseable labels sort last, by text.
pub fn compare_slots(a: &str, b: &str) -> Ordering {
    let by_start = match (slot_start_minutes(a), slot_start_minutes(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_start.then_with(|| a.cmp(b))
}

/// One class slot in the weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(default, skip_serializing)]
    pub id: String,
    /// Academic year label (e.g. `2nd Year`).
    pub year: String,
    pub branch: String,
    pub day: Weekday,
    /// Slot label such as `09:00-10:00`; sorts by start time within a day.
    pub time_slot: String,
    pub subject: String,
    #[serde(default)]
    pub subject_code: String,
    pub teacher_name: String,
    #[serde(default)]
    pub room_number: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Epoch milliseconds.
    #[serde(default)]
    pub last_updated: i64,
}

fn default_active() -> bool {
    true
}

impl TimetableEntry {
    /// Creates an active entry with blank optional fields.
    pub fn new(
        year: impl Into<String>,
        branch: impl Into<String>,
        day: Weekday,
        time_slot: impl Into<String>,
        subject: impl Into<String>,
        teacher_name: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            year: year.into(),
            branch: branch.into(),
            day,
            time_slot: time_slot.into(),
            subject: subject.into(),
            subject_code: String::new(),
            teacher_name: teacher_name.into(),
            room_number: String::new(),
            is_active: true,
            last_updated: 0,
        }
    }

    /// Marks the entry as removed from the visible timetable.
    pub fn soft_delete(&mut self, at: i64) {
        self.is_active = false;
        self.last_updated = at;
    }

    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        self.subject.to_lowercase().contains(needle)
            || self.subject_code.to_lowercase().contains(needle)
            || self.teacher_name.to_lowercase().contains(needle)
            || self.room_number.to_lowercase().contains(needle)
    }
}

impl Record for TimetableEntry {
    const COLLECTION: &'static str = "timetable";
    const KIND: &'static str = "timetable";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require(Self::KIND, "year", &self.year)?;
        require(Self::KIND, "branch", &self.branch)?;
        require(Self::KIND, "timeSlot", &self.time_slot)?;
        require(Self::KIND, "subject", &self.subject)?;
        require(Self::KIND, "teacherName", &self.teacher_name)
    }
}
