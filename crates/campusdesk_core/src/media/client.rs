//! Cloudinary REST client implementing `MediaHost`.
//!
//! # Invariants
//! - One attempt per call; only client-level connect/read timeouts apply.
//! - Log lines carry ids, sizes and status codes, never credentials.

use crate::config::{HttpConfig, MediaConfig};
use crate::logging::redact_secrets;
use crate::media::multipart::MultipartBody;
use crate::media::signature::sign;
use crate::media::{
    DestroyOutcome, MediaError, MediaFile, MediaHost, MediaResult, ResourceKind, UploadedAsset,
};
use crate::model::now_epoch_ms;
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Blocking client for one cloud account.
pub struct CloudinaryClient {
    client: Client,
    api_base: String,
    api_key: String,
    api_secret: String,
    upload_preset: String,
}

impl CloudinaryClient {
    pub fn new(config: &MediaConfig, http: &HttpConfig) -> MediaResult<Self> {
        let client = http.blocking_client()?;
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            client,
            api_base: format!("{base_url}/{}", config.cloud_name.trim()),
            api_key: config.api_key.trim().to_string(),
            api_secret: config.api_secret.trim().to_string(),
            upload_preset: config.upload_preset.trim().to_string(),
        })
    }

    fn endpoint(&self, kind: ResourceKind, action: &str) -> String {
        format!("{}/{}/{action}", self.api_base, kind.as_str())
    }

    fn require_signing(&self) -> MediaResult<()> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(MediaError::MissingCredentials("api_key/api_secret"));
        }
        Ok(())
    }

    fn post_multipart(&self, op: &str, url: &str, body: &MultipartBody<'_>) -> MediaResult<Response> {
        let started_at = Instant::now();
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, body.content_type())
            .body(body.build())
            .send()?;
        finish(op, started_at, response)
    }

    fn parse_upload(op: &str, response: Response) -> MediaResult<UploadedAsset> {
        let asset: UploadedAsset = response
            .json()
            .map_err(|err| MediaError::MalformedResponse(err.to_string()))?;
        if asset.public_id.is_empty() || asset.secure_url.is_empty() {
            return Err(MediaError::MalformedResponse(
                "upload response lacks public_id or secure_url".to_string(),
            ));
        }
        info!(
            "event=media_upload module=media op={op} status=ok public_id={} bytes={}",
            asset.public_id, asset.bytes
        );
        Ok(asset)
    }
}

impl MediaHost for CloudinaryClient {
    fn upload_unsigned(&self, file: &MediaFile, folder: Option<&str>) -> MediaResult<UploadedAsset> {
        if self.upload_preset.is_empty() {
            return Err(MediaError::MissingCredentials("upload_preset"));
        }
        if !file.is_image() {
            return Err(MediaError::UnsupportedFile(format!(
                "`{}` is {}, expected an image",
                file.file_name, file.content_type
            )));
        }

        let body = MultipartBody::new()
            .file("file", file)
            .param("folder", folder.unwrap_or_default())
            .preset("upload_preset", self.upload_preset.as_str());
        let response = self.post_multipart(
            "upload_unsigned",
            &self.endpoint(ResourceKind::Image, "upload"),
            &body,
        )?;
        Self::parse_upload("upload_unsigned", response)
    }

    fn upload_signed(
        &self,
        file: &MediaFile,
        kind: ResourceKind,
        folder: Option<&str>,
    ) -> MediaResult<UploadedAsset> {
        self.require_signing()?;
        let timestamp = (now_epoch_ms() / 1000).to_string();
        let folder = folder.unwrap_or_default();
        let signature = sign(
            [("timestamp", timestamp.as_str()), ("folder", folder)],
            &self.api_secret,
        );

        let body = MultipartBody::new()
            .file("file", file)
            .param("api_key", self.api_key.as_str())
            .param("timestamp", timestamp.as_str())
            .param("folder", folder)
            .param("signature", signature);
        let response = self.post_multipart("upload_signed", &self.endpoint(kind, "upload"), &body)?;
        Self::parse_upload("upload_signed", response)
    }

    fn destroy(&self, public_id: &str, kind: ResourceKind) -> MediaResult<DestroyOutcome> {
        self.require_signing()?;
        let timestamp = (now_epoch_ms() / 1000).to_string();
        let signature = sign(
            [("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );

        let started_at = Instant::now();
        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()?;
        let response = finish("destroy", started_at, response)?;
        let parsed: DestroyResponse = response
            .json()
            .map_err(|err| MediaError::MalformedResponse(err.to_string()))?;

        match parsed.result.as_str() {
            "ok" => {
                info!("event=media_destroy module=media status=ok public_id={public_id}");
                Ok(DestroyOutcome::Deleted)
            }
            "not found" => {
                info!("event=media_destroy module=media status=not_found public_id={public_id}");
                Ok(DestroyOutcome::NotFound)
            }
            other => Err(MediaError::DestroyRejected(other.to_string())),
        }
    }
}

fn finish(op: &str, started_at: Instant, response: Response) -> MediaResult<Response> {
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "failed to read error body".to_string());
    let body = redact_secrets(&body);
    warn!(
        "event=media_call module=media op={op} status=error status_code={} duration_ms={duration_ms} body={}",
        status.as_u16(),
        body
    );
    Err(MediaError::Status {
        status: status.as_u16(),
        body,
    })
}
