// SPDX-License-Identifier: MIT OR Apache-2.0

//! ConceptNet Numberbatch (<https://github.com/commonsense/conceptnet-numberbatch>).
//!
//! Distributed as gzip-compressed text, which is decoded straight from the
//! download without extracting it first.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{Corpus, RecordStream, VectorLines};
use crate::errors::{Error, Result};
use crate::fetch::ArtifactFetcher;

/// A published Numberbatch release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberbatchSetting {
    pub name: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub size: u64,
    pub url: &'static str,
    pub version: &'static str,
}

pub const SETTINGS: &[NumberbatchSetting] = &[
    NumberbatchSetting {
        name: "1908-en",
        description: "Numberbatch 19.08 embeddings for English-only tokens.",
        language: "en",
        size: 516_782,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2019/numberbatch/numberbatch-en-19.08.txt.gz",
        version: "19.08",
    },
    NumberbatchSetting {
        name: "1908-ml",
        description: "Numberbatch 19.08 embeddings for multiple languages.",
        language: "multi",
        size: 9_161_912,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2019/numberbatch/numberbatch-19.08.txt.gz",
        version: "19.08",
    },
    NumberbatchSetting {
        name: "1706-en",
        description: "Numberbatch 17.06 embeddings for English-only tokens.",
        language: "en",
        size: 417_194,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2017/numberbatch/numberbatch-en-17.06.txt.gz",
        version: "17.06",
    },
    NumberbatchSetting {
        name: "1706-ml",
        description: "Numberbatch 17.06 embeddings for multiple languages.",
        language: "multi",
        size: 1_917_247,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2017/numberbatch/numberbatch-17.06.txt.gz",
        version: "17.06",
    },
    NumberbatchSetting {
        name: "1704-en",
        description: "Numberbatch 17.04 embeddings for English-only tokens.",
        language: "en",
        size: 418_081,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2017/numberbatch/numberbatch-en-17.04b.txt.gz",
        version: "17.04",
    },
    NumberbatchSetting {
        name: "1704-ml",
        description: "Numberbatch 17.04 embeddings for multiple languages.",
        language: "multi",
        size: 1_918_206,
        url: "https://conceptnet.s3.amazonaws.com/downloads/2017/numberbatch/numberbatch-17.04.txt.gz",
        version: "17.04",
    },
    NumberbatchSetting {
        name: "1702-en",
        description: "Numberbatch 17.02 embeddings for English-only tokens.",
        language: "en",
        size: 484_556,
        url: "http://conceptnet.s3.amazonaws.com/downloads/2017/numberbatch/numberbatch-en-17.02.txt.gz",
        version: "17.02",
    },
];

pub const DEFAULT_NAME: &str = "1908-en";
pub const DIMENSION: usize = 300;

/// One Numberbatch release.
#[derive(Debug, Clone)]
pub struct NumberbatchCorpus {
    setting: &'static NumberbatchSetting,
}

impl NumberbatchCorpus {
    pub fn new(name: &str) -> Result<Self> {
        SETTINGS
            .iter()
            .find(|s| s.name == name)
            .map(|setting| Self { setting })
            .ok_or_else(|| {
                let valid: Vec<&str> = SETTINGS.iter().map(|s| s.name).collect();
                Error::Config(format!(
                    "{} is not a valid Numberbatch version. Valid options: {}",
                    name,
                    valid.join(", ")
                ))
            })
    }

    pub fn setting(&self) -> &NumberbatchSetting {
        self.setting
    }
}

impl Corpus for NumberbatchCorpus {
    fn name(&self) -> String {
        format!("numberbatch/{}", self.setting.name)
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn expected_size(&self) -> u64 {
        self.setting.size
    }

    fn store_path(&self) -> PathBuf {
        Path::new("numberbatch").join(format!("{}.db", self.setting.name))
    }

    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf> {
        fetcher.ensure(
            Path::new("numberbatch").join(format!("{}.txt.gz", self.setting.name)),
            Some(self.setting.url),
            false,
        )
    }

    fn decode(&self, artifact: &Path) -> Result<RecordStream> {
        let reader = BufReader::new(GzDecoder::new(File::open(artifact)?));
        Ok(Box::new(VectorLines::new(reader, DIMENSION)))
    }
}
