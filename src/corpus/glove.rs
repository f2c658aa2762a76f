// SPDX-License-Identifier: MIT OR Apache-2.0

//! GloVe vectors (<http://nlp.stanford.edu/projects/glove>).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::archive::extract_zip_member;
use super::{Corpus, RecordStream, VectorLines};
use crate::errors::{Error, Result};
use crate::fetch::ArtifactFetcher;

/// A published GloVe distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GloveSetting {
    pub name: &'static str,
    pub url: &'static str,
    pub dimensions: &'static [usize],
    pub size: u64,
    pub description: &'static str,
}

pub const SETTINGS: &[GloveSetting] = &[
    GloveSetting {
        name: "common_crawl_48",
        url: "http://nlp.stanford.edu/data/glove.42B.300d.zip",
        dimensions: &[300],
        size: 1_917_494,
        description: "48B token common crawl",
    },
    GloveSetting {
        name: "common_crawl_840",
        url: "http://nlp.stanford.edu/data/glove.840B.300d.zip",
        dimensions: &[300],
        size: 2_195_895,
        description: "840B token common crawl",
    },
    GloveSetting {
        name: "twitter",
        url: "http://nlp.stanford.edu/data/glove.twitter.27B.zip",
        dimensions: &[25, 50, 100, 200],
        size: 1_193_514,
        description: "27B token twitter",
    },
    GloveSetting {
        name: "wikipedia_gigaword",
        url: "http://nlp.stanford.edu/data/glove.6B.zip",
        dimensions: &[50, 100, 200, 300],
        size: 400_000,
        description: "6B token wikipedia 2014 + gigaword 5",
    },
];

pub const DEFAULT_NAME: &str = "common_crawl_840";
pub const DEFAULT_DIMENSION: usize = 300;

/// One GloVe distribution at one dimension.
#[derive(Debug, Clone)]
pub struct GloveCorpus {
    setting: &'static GloveSetting,
    dimension: usize,
}

impl GloveCorpus {
    /// Validates `name` and `dimension` against the published settings.
    pub fn new(name: &str, dimension: usize) -> Result<Self> {
        let setting = SETTINGS.iter().find(|s| s.name == name).ok_or_else(|| {
            let valid: Vec<&str> = SETTINGS.iter().map(|s| s.name).collect();
            Error::Config(format!(
                "{} is not a valid GloVe corpus. Valid options: {}",
                name,
                valid.join(", ")
            ))
        })?;

        if !setting.dimensions.contains(&dimension) {
            return Err(Error::Config(format!(
                "{} is not a valid dimension for {}. Valid options: {:?}",
                dimension, name, setting.dimensions
            )));
        }

        Ok(Self { setting, dimension })
    }

    pub fn setting(&self) -> &GloveSetting {
        self.setting
    }

    fn archive_path(&self) -> PathBuf {
        Path::new("glove").join(format!("{}.zip", self.setting.name))
    }

    fn text_path(&self) -> PathBuf {
        Path::new("glove").join(format!("{}.{}d.txt", self.setting.name, self.dimension))
    }
}

impl Default for GloveCorpus {
    fn default() -> Self {
        Self {
            setting: &SETTINGS[1],
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl Corpus for GloveCorpus {
    fn name(&self) -> String {
        format!("glove/{}:{}", self.setting.name, self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn expected_size(&self) -> u64 {
        self.setting.size
    }

    fn store_path(&self) -> PathBuf {
        Path::new("glove").join(format!("{}:{}.db", self.setting.name, self.dimension))
    }

    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf> {
        let archive = fetcher.ensure(self.archive_path(), Some(self.setting.url), false)?;
        let text = fetcher.cache_root().path(self.text_path());
        let suffix = format!(".{}d.txt", self.dimension);
        extract_zip_member(&archive, |name| name.ends_with(&suffix), &text)?;
        Ok(text)
    }

    fn decode(&self, artifact: &Path) -> Result<RecordStream> {
        let reader = BufReader::new(File::open(artifact)?);
        Ok(Box::new(VectorLines::new(reader, self.dimension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Record;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn validates_name_and_dimension() {
        assert!(GloveCorpus::new("twitter", 25).is_ok());
        assert!(matches!(
            GloveCorpus::new("twitter", 300),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GloveCorpus::new("wikipedia", 50),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn paths_are_keyed_by_name_and_dimension() {
        let corpus = GloveCorpus::new("wikipedia_gigaword", 100).unwrap();
        assert_eq!(
            corpus.store_path(),
            Path::new("glove").join("wikipedia_gigaword:100.db")
        );
        assert_eq!(corpus.expected_size(), 400_000);
        assert_eq!(corpus.dimension(), 100);
    }

    #[test]
    fn default_is_common_crawl_840() {
        let corpus = GloveCorpus::default();
        assert_eq!(corpus.setting().name, DEFAULT_NAME);
        assert_eq!(corpus.dimension(), 300);
    }

    #[test]
    fn decodes_text_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glove.txt");
        fs::write(&path, "the 0.1 0.2\n, 0.3 0.4\n").unwrap();
        let corpus = GloveCorpus {
            setting: &SETTINGS[3],
            dimension: 2,
        };

        let records: Vec<Record> = corpus
            .decode(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records[0], Record::new("the", vec![0.1, 0.2]));
        assert_eq!(records[1].word, ",");
    }
}
