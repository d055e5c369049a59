//! Admin client configuration.
//!
//! # Responsibility
//! - Load backend and media-host settings from TOML.
//! - Apply `CAMPUSDESK_*` environment overrides on top of the file.
//!
//! # Invariants
//! - `validate()` must pass before any store or media client is built.
//! - Secrets never reach logs; callers log `summary()`, not the struct.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "CAMPUSDESK_";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Which document store backs the admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Firestore,
    Sqlite,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "firestore" | "remote" => Some(Self::Firestore),
            "sqlite" | "local" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Firestore => "firestore",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// SQLite database file, required for the `sqlite` backend.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    /// Overrides the public endpoint, e.g. for the local emulator.
    pub base_url: Option<String>,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".to_string(),
            api_key: None,
            bearer_token: None,
            base_url: None,
        }
    }
}

/// Upload folders per content kind on the media host.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaFolders {
    pub banners: String,
    pub gallery: String,
    pub faculty: String,
    pub notices: String,
}

impl Default for MediaFolders {
    fn default() -> Self {
        Self {
            banners: "banners".to_string(),
            gallery: "gallery".to_string(),
            faculty: "faculty".to_string(),
            notices: "notices".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_preset: String,
    /// Overrides `https://api.cloudinary.com/v1_1`.
    pub base_url: Option<String>,
    pub folders: MediaFolders,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Ignore `HTTP_PROXY`-style settings, e.g. for a local emulator.
    pub bypass_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            bypass_proxy: false,
        }
    }
}

impl HttpConfig {
    /// Blocking client shared by the REST backends.
    pub fn blocking_client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.read_timeout_secs));
        if self.bypass_proxy {
            builder = builder.no_proxy();
        }
        builder.build()
    }
}

/// Full admin client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub store: StoreConfig,
    pub firestore: FirestoreConfig,
    pub media: MediaConfig,
    pub http: HttpConfig,
}

/// Configuration load/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidValue { key: String, value: String },
    Missing(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config file: {err}"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl AdminConfig {
    /// Parses TOML text without applying environment overrides.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads a TOML file, applies process environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_overrides(process_env())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `CAMPUSDESK_*` overrides from `(key, value)` pairs.
    ///
    /// Unknown `CAMPUSDESK_*` keys are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "STORE_BACKEND" => {
                    self.store.backend =
                        StoreBackend::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                            key: key.clone(),
                            value: value.clone(),
                        })?;
                }
                "STORE_PATH" => self.store.path = Some(PathBuf::from(value)),
                "FIRESTORE_PROJECT_ID" => self.firestore.project_id = value,
                "FIRESTORE_API_KEY" => self.firestore.api_key = Some(value),
                "FIRESTORE_BEARER_TOKEN" => self.firestore.bearer_token = Some(value),
                "MEDIA_CLOUD_NAME" => self.media.cloud_name = value,
                "MEDIA_API_KEY" => self.media.api_key = value,
                "MEDIA_API_SECRET" => self.media.api_secret = value,
                "MEDIA_UPLOAD_PRESET" => self.media.upload_preset = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Reports the first missing setting for the selected backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.backend {
            StoreBackend::Firestore => {
                if self.firestore.project_id.trim().is_empty() {
                    return Err(ConfigError::Missing("firestore.project_id"));
                }
            }
            StoreBackend::Sqlite => {
                if self.store.path.is_none() {
                    return Err(ConfigError::Missing("store.path"));
                }
            }
        }

        if self.media.cloud_name.trim().is_empty() {
            return Err(ConfigError::Missing("media.cloud_name"));
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http.connect_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Secret-free one-line description for logs.
    pub fn summary(&self) -> String {
        format!(
            "backend={} project={} cloud={} signed_media={} preset={}",
            self.store.backend.as_str(),
            self.firestore.project_id,
            self.media.cloud_name,
            !self.media.api_secret.is_empty(),
            !self.media.upload_preset.is_empty()
        )
    }
}

/// Process environment as UTF-8 pairs; entries that are not valid Unicode
/// are skipped.
fn process_env() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
