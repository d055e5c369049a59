//! Banner management flow.
//!
//! # Invariants
//! - Banners are uploaded through the unsigned preset path.
//! - The list is ordered newest first.
//! - A banner whose record write fails has its fresh asset destroyed.

use crate::media::{MediaFile, MediaHost, ResourceKind};
use crate::model::banner::Banner;
use crate::model::now_epoch_ms;
use crate::repo::record_repo::{Record, RecordRepository};
use crate::service::record_list::RecordList;
use crate::service::{
    destroy_best_effort, ensure_image, stored_asset, ServiceError, ServiceResult,
};
use crate::store::{Direction, DocumentQuery, DocumentStore};
use log::info;

pub struct BannerService<S: DocumentStore, M: MediaHost> {
    repo: RecordRepository<S>,
    media: M,
    folder: String,
    banners: RecordList<Banner>,
}

impl<S: DocumentStore, M: MediaHost> BannerService<S, M> {
    pub fn new(store: S, media: M, folder: impl Into<String>) -> Self {
        Self {
            repo: RecordRepository::new(store),
            media,
            folder: folder.into(),
            banners: RecordList::new(),
        }
    }

    /// Fetches every banner, newest first.
    pub fn load(&mut self) -> ServiceResult<&[Banner]> {
        let query = DocumentQuery::new().order_by("uploadedAt", Direction::Descending);
        let banners = self.repo.list::<Banner>(&query)?;
        info!(
            "event=collection_load module=service kind=banner count={}",
            banners.len()
        );
        self.banners.replace_all(banners);
        Ok(self.banners.items())
    }

    pub fn banners(&self) -> &[Banner] {
        self.banners.items()
    }

    /// Uploads an image and records it as a new banner.
    pub fn upload(&mut self, file: &MediaFile) -> ServiceResult<Banner> {
        ensure_image(file, "banner")?;

        let asset = self.media.upload_unsigned(file, Some(self.folder.as_str()))?;
        let draft = Banner::from_upload(asset.secure_url, asset.public_id, now_epoch_ms());

        match self.repo.add(&draft) {
            Ok(stored) => {
                info!(
                    "event=record_create module=service kind=banner id={}",
                    stored.id()
                );
                self.banners.insert_first(stored.clone());
                Ok(stored)
            }
            Err(err) => {
                destroy_best_effort(
                    &self.media,
                    stored_asset(&draft.public_id, &draft.image_url, ResourceKind::Image),
                    "banner_write_failed",
                );
                Err(err.into())
            }
        }
    }

    /// Destroys the image (best effort), then deletes the record.
    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let banner = self.resolve(id)?;
        destroy_best_effort(
            &self.media,
            stored_asset(&banner.public_id, &banner.image_url, ResourceKind::Image),
            "banner_delete",
        );
        self.repo.delete::<Banner>(id)?;
        self.banners.remove_by_id(id);
        info!("event=record_delete module=service kind=banner id={id}");
        Ok(())
    }

    fn resolve(&self, id: &str) -> ServiceResult<Banner> {
        if let Some(banner) = self.banners.find(id) {
            return Ok(banner.clone());
        }
        self.repo
            .get::<Banner>(id)?
            .ok_or_else(|| ServiceError::UnknownRecord {
                kind: Banner::KIND,
                id: id.to_string(),
            })
    }
}
