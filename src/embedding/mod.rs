// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - persistent word vectors with out-of-vocabulary handling
//!
//! This module provides the SQLite-backed vector store, the bulk ingester that
//! fills it from a corpus, and the lookup facades built on top of it.

pub mod concat;
pub mod facade;
pub mod ingest;
pub mod ngram;
pub mod oov;
pub mod storage;

pub use concat::ConcatEmbedding;
pub use facade::{Embedding, EmbeddingOptions, WordEmbedding};
pub use ingest::{CorpusIngester, IngestOptions, IngestStats};
pub use ngram::{ngram_keys, NgramEmbedding};
pub use oov::OovMode;
pub use storage::VectorStore;
