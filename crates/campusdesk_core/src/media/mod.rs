//! Media host contract and Cloudinary-style REST client.
//!
//! # Responsibility
//! - Upload images and PDFs, and destroy them by asset identifier.
//! - Own the bit-exact wire contracts: request signatures, multipart bodies
//!   and asset-id recovery from delivery URLs.
//!
//! # Invariants
//! - Unsigned uploads carry a preset and never the API secret.
//! - Signed requests carry `api_key`, `timestamp` and `signature`; the secret
//!   itself never goes on the wire or into logs.

pub mod asset_url;
pub mod client;
pub mod multipart;
pub mod signature;

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub use client::CloudinaryClient;

pub type MediaResult<T> = Result<T, MediaError>;

/// Asset family on the media host; selects the REST path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    /// Non-image files such as PDFs; ids keep their extension.
    Raw,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Raw => "raw",
        }
    }
}

/// File selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MediaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bytes: u64,
}

/// Outcome of a destroy call that reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    NotFound,
}

/// Media host failure.
#[derive(Debug)]
pub enum MediaError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Http(reqwest::Error),
    Status {
        status: u16,
        body: String,
    },
    /// Signed call attempted without `api_key`/`api_secret`, or unsigned
    /// call without a preset.
    MissingCredentials(&'static str),
    /// File type does not match the requested resource.
    UnsupportedFile(String),
    MalformedResponse(String),
    /// Host answered 2xx but reported a failed destroy.
    DestroyRejected(String),
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Http(err) => write!(f, "media host request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "media host returned status {status}: {body}")
            }
            Self::MissingCredentials(what) => write!(f, "media host {what} is not configured"),
            Self::UnsupportedFile(message) => write!(f, "unsupported file: {message}"),
            Self::MalformedResponse(message) => {
                write!(f, "malformed media host response: {message}")
            }
            Self::DestroyRejected(result) => write!(f, "media host refused destroy: {result}"),
        }
    }
}

impl Error for MediaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Media host operations used by the admin flows.
pub trait MediaHost: Send + Sync {
    /// Uploads an image through the configured unsigned preset.
    fn upload_unsigned(&self, file: &MediaFile, folder: Option<&str>) -> MediaResult<UploadedAsset>;
    /// Uploads through the signed REST path.
    fn upload_signed(
        &self,
        file: &MediaFile,
        kind: ResourceKind,
        folder: Option<&str>,
    ) -> MediaResult<UploadedAsset>;
    /// Destroys an asset by id through the signed REST path.
    fn destroy(&self, public_id: &str, kind: ResourceKind) -> MediaResult<DestroyOutcome>;
}

impl<T: MediaHost + ?Sized> MediaHost for &T {
    fn upload_unsigned(&self, file: &MediaFile, folder: Option<&str>) -> MediaResult<UploadedAsset> {
        (**self).upload_unsigned(file, folder)
    }

    fn upload_signed(
        &self,
        file: &MediaFile,
        kind: ResourceKind,
        folder: Option<&str>,
    ) -> MediaResult<UploadedAsset> {
        (**self).upload_signed(file, kind, folder)
    }

    fn destroy(&self, public_id: &str, kind: ResourceKind) -> MediaResult<DestroyOutcome> {
        (**self).destroy(public_id, kind)
    }
}

impl<T: MediaHost + ?Sized> MediaHost for std::sync::Arc<T> {
    fn upload_unsigned(&self, file: &MediaFile, folder: Option<&str>) -> MediaResult<UploadedAsset> {
        (**self).upload_unsigned(file, folder)
    }

    fn upload_signed(
        &self,
        file: &MediaFile,
        kind: ResourceKind,
        folder: Option<&str>,
    ) -> MediaResult<UploadedAsset> {
        (**self).upload_signed(file, kind, folder)
    }

    fn destroy(&self, public_id: &str, kind: ResourceKind) -> MediaResult<DestroyOutcome> {
        (**self).destroy(public_id, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaError, MediaFile};
    use std::io::Write;

    #[test]
    fn from_path_guesses_pdf_content_type() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let media = MediaFile::from_path(file.path()).unwrap();
        assert!(media.is_pdf());
        assert!(!media.is_image());
        assert_eq!(media.bytes, b"%PDF-1.4");
        assert!(media.file_name.ends_with(".pdf"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = MediaFile::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }
}
