//! Notice management flow.
//!
//! # Invariants
//! - Attachments must be PDFs and go through the signed raw path.
//! - Replacing an attachment destroys the previous file (best effort) first.
//! - `created_at` is stamped once on creation and kept across updates.
//! - The list is ordered newest first.

use crate::media::{MediaFile, MediaHost, ResourceKind};
use crate::model::notice::Notice;
use crate::model::now_epoch_ms;
use crate::repo::record_repo::{Record, RecordRepository};
use crate::service::filter::{distinct_values, NoticeFilter};
use crate::service::record_list::RecordList;
use crate::service::{
    destroy_best_effort, ensure_pdf, stored_asset, ServiceError, ServiceResult,
};
use crate::store::{Direction, DocumentQuery, DocumentStore, Fields};
use log::info;
use serde_json::Value;

pub struct NoticeService<S: DocumentStore, M: MediaHost> {
    repo: RecordRepository<S>,
    media: M,
    folder: String,
    notices: RecordList<Notice>,
}

impl<S: DocumentStore, M: MediaHost> NoticeService<S, M> {
    pub fn new(store: S, media: M, folder: impl Into<String>) -> Self {
        Self {
            repo: RecordRepository::new(store),
            media,
            folder: folder.into(),
            notices: RecordList::new(),
        }
    }

    /// Fetches all notices, active or not, newest first.
    pub fn load(&mut self) -> ServiceResult<&[Notice]> {
        let query = DocumentQuery::new().order_by("createdAt", Direction::Descending);
        let notices = self.repo.list::<Notice>(&query)?;
        info!(
            "event=collection_load module=service kind=notice count={}",
            notices.len()
        );
        self.notices.replace_all(notices);
        Ok(self.notices.items())
    }

    pub fn notices(&self) -> &[Notice] {
        self.notices.items()
    }

    pub fn filtered(&self, filter: &NoticeFilter) -> Vec<Notice> {
        self.notices
            .items()
            .iter()
            .filter(|notice| filter.matches(notice))
            .cloned()
            .collect()
    }

    /// Categories present in the loaded list.
    pub fn categories(&self) -> Vec<String> {
        distinct_values(self.notices.items().iter().map(|n| n.category.as_str()))
    }

    /// Publishes a notice, uploading the PDF attachment first when given.
    pub fn create(&mut self, draft: Notice, attachment: Option<&MediaFile>) -> ServiceResult<Notice> {
        draft.validate()?;
        let mut notice = draft;
        notice.id.clear();
        notice.created_at = now_epoch_ms();

        if let Some(attachment) = attachment {
            ensure_pdf(attachment, "notice attachment")?;
            notice.attachment_url = self.upload_attachment(attachment)?;
        }

        match self.repo.add(&notice) {
            Ok(stored) => {
                info!(
                    "event=record_create module=service kind=notice id={} attachment={}",
                    stored.id(),
                    stored.has_attachment()
                );
                self.notices.insert_first(stored.clone());
                Ok(stored)
            }
            Err(err) => {
                if attachment.is_some() {
                    destroy_best_effort(
                        &self.media,
                        stored_asset("", &notice.attachment_url, ResourceKind::Raw),
                        "notice_write_failed",
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Replaces a notice, swapping the attachment when a new one is given.
    pub fn update(&mut self, record: Notice, attachment: Option<&MediaFile>) -> ServiceResult<Notice> {
        record.validate()?;
        let previous = self.resolve(record.id())?;
        let mut notice = record;
        notice.created_at = previous.created_at;

        let uploaded = match attachment {
            Some(attachment) => {
                ensure_pdf(attachment, "notice attachment")?;
                destroy_best_effort(
                    &self.media,
                    stored_asset("", &previous.attachment_url, ResourceKind::Raw),
                    "notice_attachment_replaced",
                );
                notice.attachment_url = self.upload_attachment(attachment)?;
                true
            }
            None => false,
        };

        if let Err(err) = self.repo.replace(&notice) {
            if uploaded {
                destroy_best_effort(
                    &self.media,
                    stored_asset("", &notice.attachment_url, ResourceKind::Raw),
                    "notice_write_failed",
                );
            }
            return Err(err.into());
        }
        info!("event=record_update module=service kind=notice id={}", notice.id);
        self.notices.upsert(notice.clone());
        Ok(notice)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> ServiceResult<Notice> {
        let mut notice = self.resolve(id)?;
        let mut fields = Fields::new();
        fields.insert("isActive".to_string(), Value::Bool(active));
        self.repo.patch::<Notice>(id, &fields)?;

        notice.is_active = active;
        self.notices.upsert(notice.clone());
        Ok(notice)
    }

    /// Destroys the attachment (best effort), then hard-deletes the record.
    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let notice = self.resolve(id)?;
        destroy_best_effort(
            &self.media,
            stored_asset("", &notice.attachment_url, ResourceKind::Raw),
            "notice_delete",
        );
        self.repo.delete::<Notice>(id)?;
        self.notices.remove_by_id(id);
        info!("event=record_delete module=service kind=notice id={id}");
        Ok(())
    }

    fn upload_attachment(&self, attachment: &MediaFile) -> ServiceResult<String> {
        let asset = self
            .media
            .upload_signed(attachment, ResourceKind::Raw, Some(self.folder.as_str()))?;
        Ok(asset.secure_url)
    }

    fn resolve(&self, id: &str) -> ServiceResult<Notice> {
        if let Some(notice) = self.notices.find(id) {
            return Ok(notice.clone());
        }
        self.repo
            .get::<Notice>(id)?
            .ok_or_else(|| ServiceError::UnknownRecord {
                kind: Notice::KIND,
                id: id.to_string(),
            })
    }
}
