//! Gallery image record.

use crate::model::validation::{require, RecordValidationError};
use crate::repo::record_repo::Record;
use serde::{Deserialize, Serialize};

/// Campus gallery photo uploaded through the unsigned preset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub public_id: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub uploaded_at: i64,
}

impl Record for GalleryImage {
    const COLLECTION: &'static str = "gallery";
    const KIND: &'static str = "gallery";

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
