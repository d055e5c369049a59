//! Notice record.
//!
//! # Invariants
//! - `id` is assigned by the document store on creation.
//! - `attachment_url` points at a raw (PDF) asset on the media host or is empty.

use crate::model::validation::{require, RecordValidationError};
use crate::repo::record_repo::Record;
use serde::{Deserialize, Serialize};

/// Well-known notice categories offered by the admin screen.
pub const NOTICE_CATEGORIES: &[&str] = &[
    "General",
    "Academic",
    "Examination",
    "Admission",
    "Placement",
    "Events",
    "Holiday",
];

/// Display priority of a notice.
///
/// Decoding goes through [`NoticePriority::parse`]; encoding always writes
/// the capitalized label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum NoticePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl NoticePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Case-insensitive parse used by CLI and FFI inputs.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl TryFrom<String> for NoticePriority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown notice priority `{value}`"))
    }
}

/// Published notice with optional PDF attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority: NoticePriority,
    #[serde(default)]
    pub attachment_url: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub published_by: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

impl Default for Notice {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            category: NOTICE_CATEGORIES[0].to_string(),
            priority: NoticePriority::default(),
            attachment_url: String::new(),
            publish_date: String::new(),
            published_by: String::new(),
            is_active: true,
            created_at: 0,
        }
    }
}

impl Notice {
    pub fn has_attachment(&self) -> bool {
        !self.attachment_url.trim().is_empty()
    }

    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.published_by.to_lowercase().contains(needle)
    }
}

impl Record for Notice {
    const COLLECTION: &'static str = "notices";
    const KIND: &'static str = "notice";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require(Self::KIND, "title", &self.title)?;
        require(Self::KIND, "description", &self.description)?;
        require(Self::KIND, "category", &self.category)
    }
}
