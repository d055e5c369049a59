//! College profile singleton.
//!
//! # Invariants
//! - Exactly one document exists, at `college_info/profile`.

use crate::model::validation::{check_email, require, RecordValidationError};
use crate::repo::record_repo::Record;
use serde::{Deserialize, Serialize};

/// Fixed document id of the profile singleton.
pub const COLLEGE_INFO_DOC_ID: &str = "profile";

const MIN_ESTABLISHED_YEAR: i64 = 1000;
const MAX_ESTABLISHED_YEAR: i64 = 9999;

/// Public-facing college profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeInfo {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub established_year: Option<i64>,
    #[serde(default)]
    pub updated_at: i64,
}

impl Record for CollegeInfo {
    const COLLECTION: &'static str = "college_info";
    const KIND: &'static str = "college_info";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require(Self::KIND, "name", &self.name)?;
        check_email(Self::KIND, &self.email)?;
        if let Some(year) = self.established_year {
            if !(MIN_ESTABLISHED_YEAR..=MAX_ESTABLISHED_YEAR).contains(&year) {
                return Err(RecordValidationError::OutOfRange {
                    record: Self::KIND,
                    field: "establishedYear",
                    value: year,
                });
            }
        }
        Ok(())
    }
}
