//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord webhook that receives giveaway notifications
    pub discord_webhook_url: String,

    /// Giveaway listing source
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Snapshot and image locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Build a configuration with defaults for everything but the webhook.
    pub fn new(discord_webhook_url: impl Into<String>) -> Self {
        Self {
            discord_webhook_url: discord_webhook_url.into(),
            source: SourceConfig::default(),
            http: HttpConfig::default(),
            paths: PathsConfig::default(),
        }
    }

    /// Load configuration from a JSON or TOML file.
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content)
                .map_err(|e| AppError::config(format!("invalid {}: {}", path.display(), e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| AppError::config(format!("invalid {}: {}", path.display(), e)))
        }
    }

    /// Default config location: `config.json` next to the running executable.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
            .join("config.json")
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.discord_webhook_url.trim().is_empty() {
            return Err(AppError::validation("discord_webhook_url is empty"));
        }
        Url::parse(&self.discord_webhook_url).map_err(|e| {
            AppError::validation(format!("discord_webhook_url is not a valid URL: {e}"))
        })?;
        Url::parse(&self.source.listing_url).map_err(|e| {
            AppError::validation(format!("source.listing_url is not a valid URL: {e}"))
        })?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.paths.snapshot_file.as_os_str().is_empty() {
            return Err(AppError::validation("paths.snapshot_file is empty"));
        }
        Ok(())
    }
}

/// Where the giveaway listing lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Listing page URL; relative links are resolved against it
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset leaves requests unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// File system locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Snapshot of the last seen postings
    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: PathBuf,

    /// Directory for temporary image downloads (OS temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolved directory for temporary image downloads.
    pub fn image_dir(&self) -> PathBuf {
        self.image_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            snapshot_file: defaults::snapshot_file(),
            image_dir: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn listing_url() -> String {
        "https://www.rrr.org.au/subscriber-giveaways".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; giveaway-watcher/0.1)".into()
    }
    pub fn snapshot_file() -> PathBuf {
        PathBuf::from("giveaways.json")
    }
}
