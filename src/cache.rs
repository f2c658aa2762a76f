// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache root resolution.
//!
//! Every downloaded artifact and every vector store lives under a single base
//! directory. The directory is resolved once by the caller and passed around
//! as a [`CacheRoot`] value.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CacheConfig;
use crate::errors::{Error, Result};

/// Environment variable overriding the cache root.
pub const ROOT_ENV: &str = "EMBEDDINGS_ROOT";

/// Directory name used under the home directory when nothing else is set.
pub const DEFAULT_DIR_NAME: &str = ".embeddings";

/// Base directory for artifacts and stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRoot {
    root: PathBuf,
}

impl CacheRoot {
    /// Uses `root` as the cache root. Relative paths are anchored at the
    /// current working directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self { root })
    }

    /// Resolves the root from `$EMBEDDINGS_ROOT`, then the configured root,
    /// then `$HOME/.embeddings`.
    pub fn resolve(config: &CacheConfig) -> Result<Self> {
        Self::resolve_with(std::env::var_os(ROOT_ENV), config)
    }

    /// Same as [`CacheRoot::resolve`] with the environment value passed in.
    pub fn resolve_with(env_root: Option<OsString>, config: &CacheConfig) -> Result<Self> {
        if let Some(root) = env_root.filter(|v| !v.is_empty()) {
            return Self::new(PathBuf::from(root));
        }
        if let Some(root) = config.root.as_ref() {
            return Self::new(root.clone());
        }
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Config(format!(
                "cannot determine home directory; set {} or [cache] root",
                ROOT_ENV
            ))
        })?;
        Self::new(home.join(DEFAULT_DIR_NAME))
    }

    /// The absolute cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the cache root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Creates the cache root if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn env_override_wins() {
        let config = CacheConfig {
            root: Some(PathBuf::from("/from/config")),
        };
        let root = CacheRoot::resolve_with(Some(OsString::from("/from/env")), &config).unwrap();
        assert_eq!(root.root(), Path::new("/from/env"));
    }

    #[test]
    fn empty_env_falls_back_to_config() {
        let config = CacheConfig {
            root: Some(PathBuf::from("/from/config")),
        };
        let root = CacheRoot::resolve_with(Some(OsString::new()), &config).unwrap();
        assert_eq!(root.root(), Path::new("/from/config"));
    }

    #[test]
    fn default_is_under_home() {
        if let Some(home) = dirs::home_dir() {
            let root = CacheRoot::resolve_with(None, &CacheConfig::default()).unwrap();
            assert_eq!(root.root(), home.join(DEFAULT_DIR_NAME));
        }
    }

    #[test]
    fn relative_paths_are_joined() {
        let dir = tempdir().unwrap();
        let root = CacheRoot::new(dir.path()).unwrap();
        assert_eq!(root.path("foobar"), dir.path().join("foobar"));
        assert_eq!(
            root.path(Path::new("glove").join("twitter.zip")),
            dir.path().join("glove").join("twitter.zip")
        );
    }

    #[test]
    fn ensure_dir_creates_root() {
        let dir = tempdir().unwrap();
        let root = CacheRoot::new(dir.path().join("nested").join("cache")).unwrap();
        root.ensure_dir().unwrap();
        assert!(root.root().is_dir());
    }
}
