// SPDX-License-Identifier: MIT OR Apache-2.0

//! wordvecs - On-demand pretrained word vectors
//!
//! Downloads a corpus once, ingests it into a local SQLite store and serves
//! point lookups with a configurable out-of-vocabulary policy.

pub mod cache;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod errors;
pub mod fetch;
pub mod output;

pub use cache::CacheRoot;
pub use corpus::{Corpus, Record};
pub use embedding::{
    ConcatEmbedding, Embedding, EmbeddingOptions, NgramEmbedding, OovMode, VectorStore,
    WordEmbedding,
};
pub use errors::{Error, Result};
pub use fetch::ArtifactFetcher;
