//! Faculty management flow.
//!
//! # Invariants
//! - Faculty ids are generated client-side; records are written with `set`.
//! - Photos go through the signed image path.
//! - Replacing a photo destroys the previous asset (best effort) before the
//!   new upload.
//! - The list is kept sorted by name.

use crate::media::{MediaFile, MediaHost, ResourceKind};
use crate::model::faculty::Faculty;
use crate::model::new_document_id;
use crate::repo::record_repo::{Record, RecordRepository};
use crate::service::filter::{distinct_values, FacultyFilter};
use crate::service::record_list::RecordList;
use crate::service::{
    destroy_best_effort, ensure_image, stored_asset, ServiceError, ServiceResult,
};
use crate::store::{Direction, DocumentQuery, DocumentStore, Fields};
use log::info;
use serde_json::Value;

pub struct FacultyService<S: DocumentStore, M: MediaHost> {
    repo: RecordRepository<S>,
    media: M,
    folder: String,
    members: RecordList<Faculty>,
}

impl<S: DocumentStore, M: MediaHost> FacultyService<S, M> {
    pub fn new(store: S, media: M, folder: impl Into<String>) -> Self {
        Self {
            repo: RecordRepository::new(store),
            media,
            folder: folder.into(),
            members: RecordList::new(),
        }
    }

    /// Fetches faculty ordered by name; inactive members only on request.
    pub fn load(&mut self, include_inactive: bool) -> ServiceResult<&[Faculty]> {
        let members = self.repo.list::<Faculty>(&load_query(include_inactive))?;
        info!(
            "event=collection_load module=service kind=faculty count={} include_inactive={include_inactive}",
            members.len()
        );
        self.members.replace_all(members);
        self.sort();
        Ok(self.members.items())
    }

    pub fn members(&self) -> &[Faculty] {
        self.members.items()
    }

    pub fn filtered(&self, filter: &FacultyFilter) -> Vec<Faculty> {
        self.members
            .items()
            .iter()
            .filter(|member| filter.matches(member))
            .cloned()
            .collect()
    }

    /// Departments present in the loaded list, for the filter dropdown.
    pub fn departments(&self) -> Vec<String> {
        distinct_values(self.members.items().iter().map(|m| m.department.as_str()))
    }

    /// Creates a faculty member, uploading the photo first when given.
    pub fn create(&mut self, draft: Faculty, photo: Option<&MediaFile>) -> ServiceResult<Faculty> {
        draft.validate()?;
        let mut member = draft;
        if member.id.trim().is_empty() {
            member.id = new_document_id();
        }

        let uploaded = match photo {
            Some(photo) => {
                ensure_image(photo, "faculty photo")?;
                let asset = self.upload_photo(photo)?;
                member.image_url = asset.clone();
                Some(asset)
            }
            None => None,
        };

        if let Err(err) = self.repo.put(&member) {
            if let Some(url) = uploaded {
                destroy_best_effort(
                    &self.media,
                    stored_asset("", &url, ResourceKind::Image),
                    "faculty_write_failed",
                );
            }
            return Err(err.into());
        }

        info!("event=record_create module=service kind=faculty id={}", member.id);
        self.members.push(member.clone());
        self.sort();
        Ok(member)
    }

    /// Replaces a faculty record, swapping the photo when a new one is given.
    pub fn update(&mut self, record: Faculty, photo: Option<&MediaFile>) -> ServiceResult<Faculty> {
        record.validate()?;
        let previous = self.resolve(record.id())?;
        let mut member = record;

        let uploaded = match photo {
            Some(photo) => {
                ensure_image(photo, "faculty photo")?;
                destroy_best_effort(
                    &self.media,
                    stored_asset("", &previous.image_url, ResourceKind::Image),
                    "faculty_photo_replaced",
                );
                member.image_url = self.upload_photo(photo)?;
                true
            }
            None => false,
        };

        if let Err(err) = self.repo.replace(&member) {
            if uploaded {
                destroy_best_effort(
                    &self.media,
                    stored_asset("", &member.image_url, ResourceKind::Image),
                    "faculty_write_failed",
                );
            }
            return Err(err.into());
        }
        info!("event=record_update module=service kind=faculty id={}", member.id);
        self.members.upsert(member.clone());
        self.sort();
        Ok(member)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> ServiceResult<Faculty> {
        let mut member = self.resolve(id)?;
        let mut fields = Fields::new();
        fields.insert("isActive".to_string(), Value::Bool(active));
        self.repo.patch::<Faculty>(id, &fields)?;

        member.is_active = active;
        self.members.upsert(member.clone());
        self.sort();
        Ok(member)
    }

    /// Destroys the photo (best effort), then hard-deletes the record.
    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let member = self.resolve(id)?;
        destroy_best_effort(
            &self.media,
            stored_asset("", &member.image_url, ResourceKind::Image),
            "faculty_delete",
        );
        self.repo.delete::<Faculty>(id)?;
        self.members.remove_by_id(id);
        info!("event=record_delete module=service kind=faculty id={id}");
        Ok(())
    }

    fn upload_photo(&self, photo: &MediaFile) -> ServiceResult<String> {
        let asset = self
            .media
            .upload_signed(photo, ResourceKind::Image, Some(self.folder.as_str()))?;
        Ok(asset.secure_url)
    }

    fn resolve(&self, id: &str) -> ServiceResult<Faculty> {
        if let Some(member) = self.members.find(id) {
            return Ok(member.clone());
        }
        self.repo
            .get::<Faculty>(id)?
            .ok_or_else(|| ServiceError::UnknownRecord {
                kind: Faculty::KIND,
                id: id.to_string(),
            })
    }

    fn sort(&mut self) {
        self.members
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

/// The `isActive` filter is never combined with a remote ordering: that pair
/// requires a composite index. `sort` orders the loaded list either way.
fn load_query(include_inactive: bool) -> DocumentQuery {
    if include_inactive {
        DocumentQuery::new().order_by("name", Direction::Ascending)
    } else {
        DocumentQuery::new().where_eq("isActive", true)
    }
}
