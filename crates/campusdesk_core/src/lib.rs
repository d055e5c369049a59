//! Core domain logic for CampusDesk.
//! This crate is the single source of truth for content rules and the
//! document/media contracts behind the admin screens.

pub mod config;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{AdminConfig, ConfigError, StoreBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use media::{
    CloudinaryClient, DestroyOutcome, MediaError, MediaFile, MediaHost, ResourceKind,
    UploadedAsset,
};
pub use model::banner::Banner;
pub use model::college_info::CollegeInfo;
pub use model::faculty::Faculty;
pub use model::gallery::GalleryImage;
pub use model::notice::{Notice, NoticePriority};
pub use model::timetable::{TimetableEntry, Weekday};
pub use model::validation::RecordValidationError;
pub use repo::record_repo::{Record, RecordRepository, RepoError, RepoResult};
pub use service::filter::{FacultyFilter, NoticeFilter, TimetableFilter};
pub use service::{ServiceError, ServiceResult};
pub use session::{AdminSession, SessionError, SharedMedia, SharedStore};
pub use store::{
    DocumentQuery, DocumentStore, FirestoreStore, SqliteDocumentStore, StoreError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
