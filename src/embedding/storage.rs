// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-based storage for word vectors.
//!
//! One store holds the `word -> vector` table of a single corpus
//! configuration. Vectors are packed as little-endian `f32` blobs of a fixed
//! dimension. Writes happen in whole-batch transactions so the row count is a
//! reliable signal of how far an ingestion got.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::corpus::Record;
use crate::errors::{Error, Result, StoreContext};

/// Meta key holding the vector dimension of the store.
pub const META_DIMENSION: &str = "dimension";

/// Meta key holding the ingestion marker (`in_progress` or `complete`).
pub const META_INGESTION: &str = "ingestion";

/// Meta key holding the vocabulary size recorded by the last complete ingestion.
pub const META_VOCABULARY: &str = "vocabulary";

const SCHEMA_VERSION: &str = "1";

/// Persistent `word -> vector` table.
pub struct VectorStore {
    conn: Connection,
    path: PathBuf,
    dimension: usize,
}

impl VectorStore {
    /// Opens or creates a store at the specified path.
    ///
    /// Parent directories are created as needed. A store that was created
    /// with a different dimension is rejected.
    pub fn open<P: AsRef<Path>>(path: P, dimension: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if dimension == 0 {
            return Err(Error::Config("vector dimension must be greater than 0".into()));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path).store_context(&path)?;
        let store = Self {
            conn,
            path,
            dimension,
        };
        store.init_schema()?;
        store.check_dimension(true)?;

        Ok(store)
    }

    /// Opens an existing store without write access.
    ///
    /// Each thread that serves lookups opens its own handle.
    pub fn open_read_only<P: AsRef<Path>>(path: P, dimension: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .store_context(&path)?;

        let store = Self {
            conn,
            path,
            dimension,
        };
        store.check_dimension(false)?;

        Ok(store)
    }

    /// Initializes the database schema if it does not exist.
    fn init_schema(&self) -> Result<()> {
        // WAL lets read-only handles keep serving while this one writes.
        self.conn
            .query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))
            .store_context(&self.path)?;

        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS embeddings (
                word TEXT PRIMARY KEY,
                emb BLOB NOT NULL
            );
            "#,
            )
            .store_context(&self.path)?;

        if self.get_meta("schema_version")?.is_none() {
            self.set_meta("schema_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    fn check_dimension(&self, record_if_missing: bool) -> Result<()> {
        match self.get_meta(META_DIMENSION)? {
            Some(stored) => {
                let stored: usize = stored.parse().map_err(|_| {
                    Error::Config(format!(
                        "{} has an unreadable dimension '{}'",
                        self.path.display(),
                        stored
                    ))
                })?;
                if stored != self.dimension {
                    return Err(Error::Config(format!(
                        "{} holds {}-dimensional vectors, not {}",
                        self.path.display(),
                        stored,
                        self.dimension
                    )));
                }
            }
            None if record_if_missing => {
                self.set_meta(META_DIMENSION, &self.dimension.to_string())?;
            }
            None => {}
        }
        Ok(())
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Vector length of every binding.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Closes the storage connection explicitly.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| e).store_context(&path)?;
        Ok(())
    }

    /// Number of distinct words in the store.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))
            .store_context(&self.path)?;
        Ok(count as u64)
    }

    /// Looks up the vector bound to `word`.
    pub fn lookup(&self, word: &str) -> Result<Option<Vec<f32>>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT emb FROM embeddings WHERE word = ?1")
            .store_context(&self.path)?;

        let blob: Option<Vec<u8>> = stmt
            .query_row(params![word], |row| row.get(0))
            .optional()
            .store_context(&self.path)?;

        blob.map(|blob| self.blob_to_embedding(word, &blob))
            .transpose()
    }

    /// Whether `word` has a binding. The stored vector is not read.
    pub fn contains(&self, word: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM embeddings WHERE word = ?1")
            .store_context(&self.path)?;
        stmt.exists(params![word]).store_context(&self.path)
    }

    /// Writes a batch of bindings in a single transaction.
    ///
    /// Every vector is encoded before anything is written, so a vector of
    /// the wrong dimension fails the whole batch and names the word. A word
    /// that is already bound is overwritten.
    pub fn insert_batch(&mut self, batch: &[Record]) -> Result<()> {
        let encoded = batch
            .iter()
            .map(|record| {
                self.embedding_to_blob(&record.word, &record.vector)
                    .map(|blob| (record.word.as_str(), blob))
            })
            .collect::<Result<Vec<_>>>()?;

        let tx = self.conn.transaction().store_context(&self.path)?;
        {
            let mut stmt = tx
                .prepare(
                    r#"
                INSERT INTO embeddings (word, emb)
                VALUES (?1, ?2)
                ON CONFLICT(word) DO UPDATE SET emb = excluded.emb
                "#,
                )
                .store_context(&self.path)?;

            for (word, blob) in &encoded {
                stmt.execute(params![word, blob]).store_context(&self.path)?;
            }
        }
        tx.commit().store_context(&self.path)?;

        Ok(())
    }

    /// Deletes all bindings. The deletion is committed before returning.
    pub fn clear(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM embeddings", [])
            .store_context(&self.path)?;
        self.delete_meta(META_INGESTION)?;
        self.delete_meta(META_VOCABULARY)?;
        Ok(())
    }

    /// Gets metadata value by key.
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .store_context(&self.path)
    }

    /// Sets metadata value.
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r#"
            INSERT INTO meta (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
                params![key, value],
            )
            .store_context(&self.path)?;
        Ok(())
    }

    fn delete_meta(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM meta WHERE key = ?1", params![key])
            .store_context(&self.path)?;
        Ok(())
    }

    /// Converts an embedding vector to a compact blob.
    fn embedding_to_blob(&self, word: &str, embedding: &[f32]) -> Result<Vec<u8>> {
        if embedding.len() != self.dimension {
            return Err(Error::Encode {
                word: word.to_string(),
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(embedding.iter().flat_map(|f| f.to_le_bytes()).collect())
    }

    /// Converts a blob back to an embedding vector.
    fn blob_to_embedding(&self, word: &str, blob: &[u8]) -> Result<Vec<f32>> {
        if blob.len() != self.dimension * 4 {
            return Err(Error::CorruptVector {
                word: word.to_string(),
                expected_bytes: self.dimension * 4,
                actual_bytes: blob.len(),
            });
        }
        Ok(blob
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }
}
