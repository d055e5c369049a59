//! Wiring from `AdminConfig` to ready-to-use services.
//!
//! # Responsibility
//! - Build the configured document store and media host once.
//! - Hand every service a shared handle to both.

use crate::config::{AdminConfig, ConfigError, StoreBackend};
use crate::media::{CloudinaryClient, MediaError, MediaHost};
use crate::service::banner_service::BannerService;
use crate::service::college_info_service::CollegeInfoService;
use crate::service::faculty_service::FacultyService;
use crate::service::gallery_service::GalleryService;
use crate::service::notice_service::NoticeService;
use crate::service::timetable_service::TimetableService;
use crate::store::{DocumentStore, FirestoreStore, SqliteDocumentStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type SharedStore = Arc<dyn DocumentStore>;
pub type SharedMedia = Arc<dyn MediaHost>;

/// Failure while building a session.
#[derive(Debug)]
pub enum SessionError {
    Config(ConfigError),
    Store(StoreError),
    Media(MediaError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "store setup failed: {err}"),
            Self::Media(err) => write!(f, "media setup failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Media(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<MediaError> for SessionError {
    fn from(value: MediaError) -> Self {
        Self::Media(value)
    }
}

/// One admin session: a service per content kind over shared backends.
pub struct AdminSession {
    pub banners: BannerService<SharedStore, SharedMedia>,
    pub faculty: FacultyService<SharedStore, SharedMedia>,
    pub notices: NoticeService<SharedStore, SharedMedia>,
    pub timetable: TimetableService<SharedStore>,
    pub gallery: GalleryService<SharedStore, SharedMedia>,
    pub college_info: CollegeInfoService<SharedStore>,
}

impl AdminSession {
    /// Validates `config` and builds the backends it selects.
    pub fn from_config(config: &AdminConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let store: SharedStore = match config.store.backend {
            StoreBackend::Firestore => Arc::new(FirestoreStore::new(&config.firestore, &config.http)?),
            StoreBackend::Sqlite => {
                let path = config
                    .store
                    .path
                    .as_ref()
                    .ok_or(ConfigError::Missing("store.path"))?;
                Arc::new(SqliteDocumentStore::open(path)?)
            }
        };
        let media: SharedMedia = Arc::new(CloudinaryClient::new(&config.media, &config.http)?);

        info!(
            "event=session_open module=session status=ok {}",
            config.summary()
        );
        Ok(Self::with_backends(store, media, config))
    }

    /// Builds services over caller-provided backends.
    pub fn with_backends(store: SharedStore, media: SharedMedia, config: &AdminConfig) -> Self {
        let folders = &config.media.folders;
        Self {
            banners: BannerService::new(store.clone(), media.clone(), folders.banners.clone()),
            faculty: FacultyService::new(store.clone(), media.clone(), folders.faculty.clone()),
            notices: NoticeService::new(store.clone(), media.clone(), folders.notices.clone()),
            timetable: TimetableService::new(store.clone()),
            gallery: GalleryService::new(store.clone(), media, folders.gallery.clone()),
            college_info: CollegeInfoService::new(store),
        }
    }
}
