// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the library.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while fetching, ingesting or serving embeddings.
#[derive(Debug, Error)]
pub enum Error {
    /// The artifact is not cached and there is no URL to download it from.
    #[error("{} does not exist and no download url was given", path.display())]
    MissingArtifact { path: PathBuf },

    /// Network or transfer failure while downloading an artifact.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A corpus record could not be parsed.
    #[error("malformed record at line {line}: {message}")]
    Decode { line: usize, message: String },

    /// A downloaded archive is unreadable or lacks the expected member.
    #[error("archive {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// The backing SQLite store failed.
    #[error("store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A vector in a batch did not have the store dimension.
    #[error("cannot encode vector for '{word}': expected {expected} dimensions, got {actual}")]
    Encode {
        word: String,
        expected: usize,
        actual: usize,
    },

    /// A stored blob does not decode to the configured dimension.
    #[error("corrupt vector for '{word}': expected {expected_bytes} bytes, found {actual_bytes}")]
    CorruptVector {
        word: String,
        expected_bytes: usize,
        actual_bytes: usize,
    },

    /// Invalid corpus name, language, dimension or option.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::Fetch`] from any transport error.
    pub fn fetch<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Fetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// Builds a [`Error::Decode`] for the given 1-indexed line.
    pub fn decode(line: usize, message: impl Into<String>) -> Self {
        Error::Decode {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attaches the store path to SQLite errors.
pub(crate) trait StoreContext<T> {
    fn store_context(self, path: &Path) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Store {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_names_the_path() {
        let err = Error::MissingArtifact {
            path: PathBuf::from("/tmp/glove/twitter.zip"),
        };
        assert!(err.to_string().contains("/tmp/glove/twitter.zip"));
    }

    #[test]
    fn encode_error_names_the_word() {
        let err = Error::Encode {
            word: "hello".to_string(),
            expected: 3,
            actual: 2,
        };
        let message = err.to_string();
        assert!(message.contains("'hello'"));
        assert!(message.contains("expected 3"));
    }

    #[test]
    fn store_context_wraps_sqlite_errors() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.store_context(Path::new("x.db")).unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }
}
