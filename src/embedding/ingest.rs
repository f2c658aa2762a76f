// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time bulk load of a corpus into its store.
//!
//! Ingestion always starts from an empty store: a streaming decoder cannot
//! resume mid-file, so an incomplete store is cleared and loaded again.
//! Records are deduplicated (first occurrence wins) and written in batches,
//! so memory stays proportional to the batch size rather than the corpus.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use tracing::{debug, info};

use super::storage::{VectorStore, META_INGESTION, META_VOCABULARY};
use crate::config::DEFAULT_BATCH_SIZE;
use crate::corpus::Record;
use crate::errors::Result;

/// Ingestion marker written while a load is running.
pub const STATE_IN_PROGRESS: &str = "in_progress";

/// Ingestion marker written once the decoder is exhausted.
pub const STATE_COMPLETE: &str = "complete";

/// Options controlling a bulk load.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Records per transaction.
    pub batch_size: usize,
    /// Whether to draw a progress bar.
    pub show_progress: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: false,
        }
    }
}

/// Counters reported after a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Records written to the store.
    pub inserted: u64,
    /// Records dropped because their word was seen earlier.
    pub duplicates: u64,
    /// Transactions committed.
    pub batches: u64,
}

/// Drives a decoder into a [`VectorStore`].
#[derive(Debug, Clone, Default)]
pub struct CorpusIngester {
    options: IngestOptions,
}

impl CorpusIngester {
    pub fn new(options: IngestOptions) -> Self {
        let mut options = options;
        options.batch_size = options.batch_size.max(1);
        Self { options }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Whether `store` already holds at least `expected_size` words.
    pub fn is_complete(store: &VectorStore, expected_size: u64) -> Result<bool> {
        Ok(store.count()? >= expected_size)
    }

    /// Clears `store` and loads every record from `records` into it.
    ///
    /// A decoder error aborts the load and is returned as is. Batches that
    /// were already committed stay, leaving the store below its expected size
    /// so the next construction retries from scratch.
    pub fn ingest<I>(&self, store: &mut VectorStore, expected_size: u64, records: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        store.clear()?;
        store.set_meta(META_INGESTION, STATE_IN_PROGRESS)?;
        info!("Ingesting into {}", store.path().display());

        let pb = self.progress_bar(expected_size);
        let batch_size = self.options.batch_size;
        let mut stats = IngestStats::default();
        let mut batch: Vec<Record> = Vec::with_capacity(batch_size);
        let mut batch_words: HashSet<String> = HashSet::with_capacity(batch_size);

        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };
            pb.inc(1);

            // Earlier batches are already committed, so the store answers for them.
            if batch_words.contains(&record.word) || store.contains(&record.word)? {
                stats.duplicates += 1;
                continue;
            }

            batch_words.insert(record.word.clone());
            batch.push(record);

            if batch.len() == batch_size {
                self.flush(store, &mut batch, &mut stats)?;
                batch_words.clear();
            }
        }

        if !batch.is_empty() {
            self.flush(store, &mut batch, &mut stats)?;
        }
        pb.finish_and_clear();

        store.set_meta(META_VOCABULARY, &stats.inserted.to_string())?;
        store.set_meta(META_INGESTION, STATE_COMPLETE)?;
        info!(
            "Ingested {} words into {} ({} duplicates skipped)",
            stats.inserted,
            store.path().display(),
            stats.duplicates
        );

        Ok(stats)
    }

    fn flush(&self, store: &mut VectorStore, batch: &mut Vec<Record>, stats: &mut IngestStats) -> Result<()> {
        store.insert_batch(batch)?;
        stats.inserted += batch.len() as u64;
        stats.batches += 1;
        debug!("Committed batch {} ({} words)", stats.batches, batch.len());
        batch.clear();
        Ok(())
    }

    fn progress_bar(&self, expected_size: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(expected_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} words | Ingesting {msg}")
                .expect("valid progress bar template")
                .progress_chars("##."),
        );
        pb
    }
}
