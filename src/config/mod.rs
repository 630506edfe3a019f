//! Configuration for the proxy server
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (highest priority, applied by `cli`)
//! 2. Environment variables
//! 3. Config file (~/.config/toolbridge/config.toml)
//! 4. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;
mod translation;

#[cfg(test)]
mod tests;

pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use translation::{FileTranslation, Translation};

pub(crate) use translation::parse_content_policy;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9000";
pub const DEFAULT_BACKEND_URL: &str = "https://inference.do-ai.run/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 8192;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to bind the proxy server to
    pub bind_addr: SocketAddr,

    /// OpenAI-compatible backend base URL, without trailing slash
    /// (`/v1/{path}` is forwarded to `{backend_url}/{path}`)
    pub backend_url: String,

    /// Budget for connecting and receiving response headers (seconds)
    pub timeout_secs: u64,

    /// Maximum size of a relayed chunk on streamed responses (bytes)
    pub stream_chunk_size: usize,

    /// Request/response translation settings
    pub translation: Translation,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9000)),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
            translation: Translation::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub backend_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub stream_chunk_size: Option<usize>,

    /// Optional [translation] section
    pub translation: Option<FileTranslation>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/toolbridge/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("toolbridge").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists.
    ///
    /// A missing file yields defaults; a file that exists but cannot be read or
    /// parsed is an error. A broken config should fail fast rather than
    /// silently fall back to defaults.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn load() -> Result<Self> {
        let file = Self::load_file_config()?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    pub(crate) fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = env("TOOLBRIDGE_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address {:?}", bind_addr))?;

        let backend_url = env("TOOLBRIDGE_BACKEND_URL")
            .or(file.backend_url)
            .map(|url| normalize_backend_url(&url))
            .unwrap_or(defaults.backend_url);

        let timeout_secs = match env("TOOLBRIDGE_TIMEOUT_SECS") {
            Some(v) => Some(
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid TOOLBRIDGE_TIMEOUT_SECS {:?}", v))?,
            ),
            None => file.timeout_secs,
        };
        // A zero budget would time out every request
        let timeout_secs = timeout_secs
            .filter(|n| *n > 0)
            .unwrap_or(defaults.timeout_secs);

        let stream_chunk_size = file
            .stream_chunk_size
            .filter(|n| *n > 0)
            .unwrap_or(defaults.stream_chunk_size);

        let mut translation = Translation::from_file(file.translation);
        if let Some(policy) = env("TOOLBRIDGE_CONTENT_POLICY") {
            translation.content_policy = parse_content_policy(&policy);
        }

        let logging = LoggingConfig::from_file(file.logging);

        Ok(Self {
            bind_addr,
            backend_url,
            timeout_secs,
            stream_chunk_size,
            translation,
            logging,
        })
    }
}

/// Strip trailing slashes so `{backend_url}/{path}` never doubles them
pub fn normalize_backend_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
