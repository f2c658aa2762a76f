// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character n-gram vectors from Hashimoto et al., "A Joint Many-Task Model"
//! (<http://www.logos.t.u-tokyo.ac.jp/~hassy/publications/arxiv2016jmt/>).
//!
//! Keys look like `3gram-#BEGIN#ca`; words are embedded through
//! [`crate::embedding::NgramEmbedding`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::archive::extract_tar_gz_member;
use super::{Corpus, RecordStream, VectorLines};
use crate::errors::Result;
use crate::fetch::ArtifactFetcher;

const URL: &str =
    "http://www.logos.t.u-tokyo.ac.jp/~hassy/publications/arxiv2016jmt/jmt_pre-trained_embeddings.tar.gz";
const MEMBER: &str = "charNgram.txt";

pub const SIZE: u64 = 874_474;
pub const DIMENSION: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct KazumaCorpus;

impl Corpus for KazumaCorpus {
    fn name(&self) -> String {
        "kazuma".to_string()
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn expected_size(&self) -> u64 {
        SIZE
    }

    fn store_path(&self) -> PathBuf {
        PathBuf::from("kazuma.db")
    }

    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf> {
        let archive = fetcher.ensure("kazuma.tar.gz", Some(URL), false)?;
        let text = fetcher.cache_root().path("kazuma.txt");
        extract_tar_gz_member(&archive, MEMBER, &text)?;
        Ok(text)
    }

    fn decode(&self, artifact: &Path) -> Result<RecordStream> {
        let reader = BufReader::new(File::open(artifact)?);
        Ok(Box::new(VectorLines::new(reader, DIMENSION)))
    }
}
