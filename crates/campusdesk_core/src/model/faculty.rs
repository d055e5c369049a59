//! Faculty record.
//!
//! # Invariants
//! - `id` is generated client-side and written with `set`.
//! - Inactive members stay stored but are hidden from the default listing.

use crate::model::validation::{check_email, require, RecordValidationError};
use crate::repo::record_repo::Record;
use serde::{Deserialize, Serialize};

/// Teaching staff profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: String,
    pub designation: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub image_url: String,
    /// Free-form date as entered by the admin (e.g. `2019-07-01`).
    #[serde(default)]
    pub joining_date: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for Faculty {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            department: String::new(),
            designation: String::new(),
            qualification: String::new(),
            experience: String::new(),
            specialization: String::new(),
            image_url: String::new(),
            joining_date: String::new(),
            is_active: true,
        }
    }
}

impl Faculty {
    /// Returns whether any searchable field contains `needle` (already lowercased).
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.department.as_str(),
            self.designation.as_str(),
            self.specialization.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Record for Faculty {
    const COLLECTION: &'static str = "faculty";
    const KIND: &'static str = "faculty";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require(Self::KIND, "name", &self.name)?;
        require(Self::KIND, "email", &self.email)?;
        check_email(Self::KIND, &self.email)?;
        require(Self::KIND, "department", &self.department)?;
        require(Self::KIND, "designation", &self.designation)
    }
}
