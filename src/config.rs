// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for wordvecs
//!
//! Loads configuration from .wordvecsrc.toml in current directory or ~/.config/wordvecs/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::embedding::OovMode;

/// Default download chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default number of records written per transaction during ingestion.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Base directory for artifacts and stores (overridden by $EMBEDDINGS_ROOT)
    pub root: Option<PathBuf>,
}

/// Download configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Bytes read per chunk while streaming a download
    pub chunk_size: Option<usize>,
    /// Seconds to wait for a connection before giving up
    pub connect_timeout_secs: Option<u64>,
}

impl FetchConfig {
    /// Get chunk size (defaults to 64 KiB)
    pub fn chunk_size(&self) -> usize {
        match self.chunk_size {
            Some(0) | None => DEFAULT_CHUNK_SIZE,
            Some(size) => size,
        }
    }

    /// Get connect timeout (defaults to 30 seconds)
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.unwrap_or(30))
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Records written per transaction
    pub batch_size: Option<usize>,
    /// Whether to draw progress bars
    pub show_progress: Option<bool>,
}

impl IngestConfig {
    /// Get batch size (defaults to 1000)
    pub fn batch_size(&self) -> usize {
        match self.batch_size {
            Some(0) | None => DEFAULT_BATCH_SIZE,
            Some(size) => size,
        }
    }

    /// Get progress setting (defaults to true)
    pub fn show_progress(&self) -> bool {
        self.show_progress.unwrap_or(true)
    }
}

/// Lookup configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Out-of-vocabulary mode (none, zero, random)
    pub default: Option<OovMode>,
}

impl LookupConfig {
    /// Get default OOV mode (defaults to None)
    pub fn default_mode(&self) -> OovMode {
        self.default.unwrap_or_default()
    }
}

/// Configuration loaded from .wordvecsrc.toml or ~/.config/wordvecs/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache configuration
    pub cache: CacheConfig,

    /// Download configuration
    pub fetch: FetchConfig,

    /// Ingestion configuration
    pub ingest: IngestConfig,

    /// Lookup configuration
    pub lookup: LookupConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .wordvecsrc.toml in current directory
    /// 2. ~/.config/wordvecs/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".wordvecsrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("wordvecs").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::parse(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the cache configuration
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Get the fetch configuration
    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Get the ingestion configuration
    pub fn ingest(&self) -> &IngestConfig {
        &self.ingest
    }

    /// Get the lookup configuration
    pub fn lookup(&self) -> &LookupConfig {
        &self.lookup
    }
}
