//! Hand-assembled `multipart/form-data` bodies for media uploads.
//!
//! Part order is fixed: the file part first, then parameters in insertion
//! order, then presets, then the closing `--{boundary}--\r\n` marker.

use crate::media::MediaFile;
use uuid::Uuid;

const CRLF: &str = "\r\n";

/// Builder for one upload body.
#[derive(Debug, Clone)]
pub struct MultipartBody<'f> {
    boundary: String,
    file: Option<(&'f str, &'f MediaFile)>,
    params: Vec<(String, String)>,
    presets: Vec<(String, String)>,
}

impl<'f> MultipartBody<'f> {
    /// Starts a body with a fresh random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("CampusDeskBoundary{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            file: None,
            params: Vec::new(),
            presets: Vec::new(),
        }
    }

    pub fn file(mut self, field: &'f str, file: &'f MediaFile) -> Self {
        self.file = Some((field, file));
        self
    }

    /// Adds a text parameter; empty values are skipped.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.params.push((name.into(), value));
        }
        self
    }

    pub fn preset(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.presets.push((name.into(), value.into()));
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serializes the body.
    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();

        if let Some((field, file)) = self.file {
            body.extend_from_slice(
                format!(
                    "--{}{CRLF}Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{CRLF}Content-Type: {}{CRLF}{CRLF}",
                    self.boundary,
                    escape_quoted(field),
                    escape_quoted(&file.file_name),
                    file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(&file.bytes);
            body.extend_from_slice(CRLF.as_bytes());
        }

        for (name, value) in self.params.iter().chain(self.presets.iter()) {
            body.extend_from_slice(
                format!(
                    "--{}{CRLF}Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}{value}{CRLF}",
                    self.boundary,
                    escape_quoted(name)
                )
                .as_bytes(),
            );
        }

        body.extend_from_slice(format!("--{}--{CRLF}", self.boundary).as_bytes());
        body
    }
}

impl Default for MultipartBody<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace(['\r', '\n'], "")
        .replace('"', "%22")
}
