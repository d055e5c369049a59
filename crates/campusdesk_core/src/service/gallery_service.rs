//! Gallery management flow.

use crate::media::{MediaFile, MediaHost, ResourceKind};
use crate::model::gallery::GalleryImage;
use crate::model::now_epoch_ms;
use crate::repo::record_repo::{Record, RecordRepository};
use crate::service::record_list::RecordList;
use crate::service::{
    destroy_best_effort, ensure_image, stored_asset, ServiceError, ServiceResult,
};
use crate::store::{Direction, DocumentQuery, DocumentStore, Fields};
use log::info;
use serde_json::Value;

pub struct GalleryService<S: DocumentStore, M: MediaHost> {
    repo: RecordRepository<S>,
    media: M,
    folder: String,
    images: RecordList<GalleryImage>,
}

impl<S: DocumentStore, M: MediaHost> GalleryService<S, M> {
    pub fn new(store: S, media: M, folder: impl Into<String>) -> Self {
        Self {
            repo: RecordRepository::new(store),
            media,
            folder: folder.into(),
            images: RecordList::new(),
        }
    }

    pub fn load(&mut self) -> ServiceResult<&[GalleryImage]> {
        let query = DocumentQuery::new().order_by("uploadedAt", Direction::Descending);
        let images = self.repo.list::<GalleryImage>(&query)?;
        self.images.replace_all(images);
        Ok(self.images.items())
    }

    pub fn images(&self) -> &[GalleryImage] {
        self.images.items()
    }

    pub fn upload(&mut self, file: &MediaFile, caption: &str) -> ServiceResult<GalleryImage> {
        ensure_image(file, "gallery upload")?;

        let asset = self.media.upload_unsigned(file, Some(self.folder.as_str()))?;
        let draft = GalleryImage {
            id: String::new(),
            image_url: asset.secure_url,
            public_id: asset.public_id,
            caption: caption.trim().to_string(),
            uploaded_at: now_epoch_ms(),
        };

        match self.repo.add(&draft) {
            Ok(stored) => {
                info!(
                    "event=record_create module=service kind=gallery id={}",
                    stored.id()
                );
                self.images.insert_first(stored.clone());
                Ok(stored)
            }
            Err(err) => {
                destroy_best_effort(
                    &self.media,
                    stored_asset(&draft.public_id, &draft.image_url, ResourceKind::Image),
                    "gallery_write_failed",
                );
                Err(err.into())
            }
        }
    }

    pub fn update_caption(&mut self, id: &str, caption: &str) -> ServiceResult<GalleryImage> {
        let mut image = self.resolve(id)?;
        let mut fields = Fields::new();
        fields.insert("caption".to_string(), Value::from(caption.trim()));
        self.repo.patch::<GalleryImage>(id, &fields)?;

        image.caption = caption.trim().to_string();
        self.images.upsert(image.clone());
        Ok(image)
    }

    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let image = self.resolve(id)?;
        destroy_best_effort(
            &self.media,
            stored_asset(&image.public_id, &image.image_url, ResourceKind::Image),
            "gallery_delete",
        );
        self.repo.delete::<GalleryImage>(id)?;
        self.images.remove_by_id(id);
        info!("event=record_delete module=service kind=gallery id={id}");
        Ok(())
    }

    fn resolve(&self, id: &str) -> ServiceResult<GalleryImage> {
        if let Some(image) = self.images.find(id) {
            return Ok(image.clone());
        }
        self.repo
            .get::<GalleryImage>(id)?
            .ok_or_else(|| ServiceError::UnknownRecord {
                kind: GalleryImage::KIND,
                id: id.to_string(),
            })
    }
}
