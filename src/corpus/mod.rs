// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus adapters.
//!
//! A corpus knows where its raw artifact lives, how big its vocabulary is and
//! how to turn the artifact into a stream of `(word, vector)` records. The
//! embedding core is generic over [`Corpus`] and never looks at file formats.

pub mod archive;
pub mod fasttext;
pub mod glove;
pub mod kazuma;
pub mod numberbatch;
pub mod text;

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::fetch::ArtifactFetcher;

pub use fasttext::FastTextCorpus;
pub use glove::GloveCorpus;
pub use kazuma::KazumaCorpus;
pub use numberbatch::NumberbatchCorpus;
pub use text::VectorLines;

/// A single decoded `(word, vector)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub word: String,
    pub vector: Vec<f32>,
}

impl Record {
    pub fn new(word: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            word: word.into(),
            vector,
        }
    }
}

/// Lazy, single-pass sequence of decoded records.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record>>>;

/// Capabilities every corpus provides to the embedding core.
pub trait Corpus {
    /// Human readable identifier, used in logs.
    fn name(&self) -> String;

    /// Vector length of every record.
    fn dimension(&self) -> usize;

    /// Vocabulary size a completely ingested store must reach.
    fn expected_size(&self) -> u64;

    /// Store location relative to the cache root.
    fn store_path(&self) -> PathBuf;

    /// Makes the raw artifact available locally and returns its path.
    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf>;

    /// Streams the records of a prepared artifact.
    fn decode(&self, artifact: &Path) -> Result<RecordStream>;
}

/// Any of the bundled corpora, selected at runtime.
#[derive(Debug, Clone)]
pub enum AnyCorpus {
    Glove(GloveCorpus),
    FastText(FastTextCorpus),
    Kazuma(KazumaCorpus),
    Numberbatch(NumberbatchCorpus),
}

impl Corpus for AnyCorpus {
    fn name(&self) -> String {
        match self {
            AnyCorpus::Glove(c) => c.name(),
            AnyCorpus::FastText(c) => c.name(),
            AnyCorpus::Kazuma(c) => c.name(),
            AnyCorpus::Numberbatch(c) => c.name(),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            AnyCorpus::Glove(c) => c.dimension(),
            AnyCorpus::FastText(c) => c.dimension(),
            AnyCorpus::Kazuma(c) => c.dimension(),
            AnyCorpus::Numberbatch(c) => c.dimension(),
        }
    }

    fn expected_size(&self) -> u64 {
        match self {
            AnyCorpus::Glove(c) => c.expected_size(),
            AnyCorpus::FastText(c) => c.expected_size(),
            AnyCorpus::Kazuma(c) => c.expected_size(),
            AnyCorpus::Numberbatch(c) => c.expected_size(),
        }
    }

    fn store_path(&self) -> PathBuf {
        match self {
            AnyCorpus::Glove(c) => c.store_path(),
            AnyCorpus::FastText(c) => c.store_path(),
            AnyCorpus::Kazuma(c) => c.store_path(),
            AnyCorpus::Numberbatch(c) => c.store_path(),
        }
    }

    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf> {
        match self {
            AnyCorpus::Glove(c) => c.prepare(fetcher),
            AnyCorpus::FastText(c) => c.prepare(fetcher),
            AnyCorpus::Kazuma(c) => c.prepare(fetcher),
            AnyCorpus::Numberbatch(c) => c.prepare(fetcher),
        }
    }

    fn decode(&self, artifact: &Path) -> Result<RecordStream> {
        match self {
            AnyCorpus::Glove(c) => c.decode(artifact),
            AnyCorpus::FastText(c) => c.decode(artifact),
            AnyCorpus::Kazuma(c) => c.decode(artifact),
            AnyCorpus::Numberbatch(c) => c.decode(artifact),
        }
    }
}
