// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-to-query embedding over one corpus configuration.

use tracing::{info, warn};

use super::ingest::{CorpusIngester, IngestOptions, IngestStats};
use super::oov::OovMode;
use super::storage::VectorStore;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::errors::Result;
use crate::fetch::ArtifactFetcher;

/// Anything that maps a word to a vector.
pub trait WordEmbedding {
    /// Length of every vector returned by [`WordEmbedding::emb`].
    fn dimension(&self) -> usize;

    /// Mode used when a call passes no explicit default.
    fn default_oov(&self) -> OovMode;

    /// Embeds `word`, applying `default` (or the configured mode) on a miss.
    ///
    /// `Ok(None)` means the word has no embedding under [`OovMode::None`];
    /// a miss is never an error.
    fn emb(&self, word: &str, default: Option<OovMode>) -> Result<Option<Vec<f32>>>;
}

/// Construction options for [`Embedding`].
#[derive(Debug, Clone, Default)]
pub struct EmbeddingOptions {
    pub default_oov: OovMode,
    pub ingest: IngestOptions,
}

impl EmbeddingOptions {
    /// Options taken from the `[lookup]` and `[ingest]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_oov: config.lookup().default_mode(),
            ingest: IngestOptions {
                batch_size: config.ingest().batch_size(),
                show_progress: config.ingest().show_progress(),
            },
        }
    }

    pub fn with_default_oov(mut self, mode: OovMode) -> Self {
        self.default_oov = mode;
        self
    }
}

/// A corpus whose store is fully ingested and ready for lookups.
pub struct Embedding<C> {
    corpus: C,
    store: VectorStore,
    default_oov: OovMode,
}

impl<C: Corpus> Embedding<C> {
    /// Opens the corpus store, ingesting it first if it is incomplete.
    ///
    /// This blocks for as long as the download and ingestion take, which
    /// can be hours for the largest corpora. Run it at startup, off any
    /// latency-sensitive path.
    pub fn open(corpus: C, fetcher: &ArtifactFetcher, options: &EmbeddingOptions) -> Result<Self> {
        let store_path = fetcher.cache_root().path(corpus.store_path());
        let mut store = VectorStore::open(&store_path, corpus.dimension())?;

        let expected = corpus.expected_size();
        if !CorpusIngester::is_complete(&store, expected)? {
            info!(
                "{} has {} of {} words; ingesting",
                corpus.name(),
                store.count()?,
                expected
            );
            let artifact = corpus.prepare(fetcher)?;
            let records = corpus.decode(&artifact)?;
            let stats: IngestStats =
                CorpusIngester::new(options.ingest.clone()).ingest(&mut store, expected, records)?;

            if stats.inserted < expected {
                warn!(
                    "{} ingested {} words but declares {}; it will be ingested again next time",
                    corpus.name(),
                    stats.inserted,
                    expected
                );
            }
        }

        Ok(Self {
            corpus,
            store,
            default_oov: options.default_oov,
        })
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Stored vector for `word`, without any fallback.
    pub fn lookup(&self, word: &str) -> Result<Option<Vec<f32>>> {
        self.store.lookup(word)
    }

    pub fn contains(&self, word: &str) -> Result<bool> {
        self.store.contains(word)
    }

    /// Number of words in the store.
    pub fn count(&self) -> Result<u64> {
        self.store.count()
    }
}

impl<C: Corpus> WordEmbedding for Embedding<C> {
    fn dimension(&self) -> usize {
        self.store.dimension()
    }

    fn default_oov(&self) -> OovMode {
        self.default_oov
    }

    fn emb(&self, word: &str, default: Option<OovMode>) -> Result<Option<Vec<f32>>> {
        match self.store.lookup(word)? {
            Some(vector) => Ok(Some(vector)),
            None => Ok(default
                .unwrap_or(self.default_oov)
                .fallback(self.store.dimension())),
        }
    }
}
