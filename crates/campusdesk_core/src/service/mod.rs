//! Admin use-case services, one per managed collection.
//!
//! # Responsibility
//! - Run the load -> filter -> mutate -> reconcile flow behind each screen.
//! - Sequence media uploads/destroys around record writes.
//!
//! # Invariants
//! - Records are validated before any media upload or remote write.
//! - A failed write leaves the in-memory list unchanged.
//! - Asset destroy failures are logged and never fail the action.
//! - A record delete that succeeds always drops the record from the list.

pub mod banner_service;
pub mod college_info_service;
pub mod faculty_service;
pub mod filter;
pub mod gallery_service;
pub mod notice_service;
pub mod record_list;
pub mod timetable_service;

use crate::media::asset_url::{asset_from_url, AssetRef};
use crate::media::{DestroyOutcome, MediaError, MediaFile, MediaHost, ResourceKind};
use crate::model::validation::RecordValidationError;
use crate::repo::record_repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one admin action.
#[derive(Debug)]
pub enum ServiceError {
    Validation(RecordValidationError),
    Repo(RepoError),
    Media(MediaError),
    /// Record id is unknown to both the loaded list and the store.
    UnknownRecord { kind: &'static str, id: String },
    InvalidInput(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Media(err) => write!(f, "{err}"),
            Self::UnknownRecord { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidInput(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for ServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { kind, id } => Self::UnknownRecord { kind, id },
            other => Self::Repo(other),
        }
    }
}

impl From<MediaError> for ServiceError {
    fn from(value: MediaError) -> Self {
        Self::Media(value)
    }
}

/// Rejects non-image uploads before anything touches the media host.
pub(crate) fn ensure_image(file: &MediaFile, what: &str) -> ServiceResult<()> {
    if file.is_image() {
        return Ok(());
    }
    Err(ServiceError::InvalidInput(format!(
        "{what} must be an image, got {}",
        file.content_type
    )))
}

/// Rejects attachments that are not PDFs.
pub(crate) fn ensure_pdf(file: &MediaFile, what: &str) -> ServiceResult<()> {
    if file.is_pdf() {
        return Ok(());
    }
    Err(ServiceError::InvalidInput(format!(
        "{what} must be a PDF, got {}",
        file.content_type
    )))
}

/// Resolves the asset to destroy: the stored id when present, else the URL.
pub(crate) fn stored_asset(public_id: &str, url: &str, kind: ResourceKind) -> Option<AssetRef> {
    let public_id = public_id.trim();
    if !public_id.is_empty() {
        return Some(AssetRef {
            public_id: public_id.to_string(),
            kind,
        });
    }
    asset_from_url(url)
}

/// Destroys an asset, logging instead of failing.
///
/// Returns `true` only when the host confirmed the deletion.
pub(crate) fn destroy_best_effort<M: MediaHost>(
    media: &M,
    asset: Option<AssetRef>,
    reason: &str,
) -> bool {
    let Some(asset) = asset else {
        return false;
    };

    match media.destroy(&asset.public_id, asset.kind) {
        Ok(DestroyOutcome::Deleted) => true,
        Ok(DestroyOutcome::NotFound) => {
            info!(
                "event=asset_cleanup module=service status=missing reason={reason} public_id={}",
                asset.public_id
            );
            false
        }
        Err(err) => {
            warn!(
                "event=asset_cleanup module=service status=orphaned reason={reason} public_id={} error={err}",
                asset.public_id
            );
            false
        }
    }
}
