//! Banner record.
//!
//! # Invariants
//! - `id` is assigned by the document store on creation.
//! - `public_id` is the media host handle used to destroy the image later.

use crate::model::validation::{require, RecordValidationError};
use crate::repo::record_repo::Record;
use serde::{Deserialize, Serialize};

/// Home-screen banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub public_id: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub uploaded_at: i64,
}

impl Banner {
    /// Builds an unsaved banner from a completed upload.
    pub fn from_upload(image_url: impl Into<String>, public_id: impl Into<String>, at: i64) -> Self {
        Self {
            id: String::new(),
            image_url: image_url.into(),
            public_id: public_id.into(),
            uploaded_at: at,
        }
    }
}

impl Record for Banner {
    const COLLECTION: &'static str = "banners";
    const KIND: &'static str = "banner";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require(Self::KIND, "imageUrl", &self.image_url)
    }
}
