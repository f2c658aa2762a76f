// SPDX-License-Identifier: MIT OR Apache-2.0

//! fastText Wikipedia vectors (<https://arxiv.org/abs/1607.04606>).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::archive::extract_zip_member;
use super::{Corpus, RecordStream, VectorLines};
use crate::errors::{Error, Result};
use crate::fetch::ArtifactFetcher;

const URL_TEMPLATE: &str = "https://s3-us-west-1.amazonaws.com/fasttext-vectors/wiki.{lang}.zip";

/// Supported languages and the vocabulary size that marks a store complete.
///
/// A size of 1 accepts any non-empty store.
pub const LANGUAGES: &[(&str, u64)] = &[("en", 1)];

pub const DIMENSION: usize = 300;

/// fastText vectors for one language.
#[derive(Debug, Clone)]
pub struct FastTextCorpus {
    lang: String,
    size: u64,
}

impl FastTextCorpus {
    pub fn new(lang: &str) -> Result<Self> {
        let (_, size) = LANGUAGES
            .iter()
            .find(|(code, _)| *code == lang)
            .ok_or_else(|| {
                let valid: Vec<&str> = LANGUAGES.iter().map(|(code, _)| *code).collect();
                Error::Config(format!(
                    "{} is not a supported fastText language. Valid options: {}",
                    lang,
                    valid.join(", ")
                ))
            })?;

        Ok(Self {
            lang: lang.to_string(),
            size: *size,
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    fn url(&self) -> String {
        URL_TEMPLATE.replace("{lang}", &self.lang)
    }
}

impl Corpus for FastTextCorpus {
    fn name(&self) -> String {
        format!("fasttext/{}", self.lang)
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn expected_size(&self) -> u64 {
        self.size
    }

    fn store_path(&self) -> PathBuf {
        Path::new("fasttext").join(format!("{}.db", self.lang))
    }

    fn prepare(&self, fetcher: &ArtifactFetcher) -> Result<PathBuf> {
        let url = self.url();
        let archive = fetcher.ensure(
            Path::new("fasttext").join(format!("{}.zip", self.lang)),
            Some(&url),
            false,
        )?;
        let member = format!("wiki.{}.vec", self.lang);
        let text = fetcher.cache_root().path(Path::new("fasttext").join(&member));
        extract_zip_member(&archive, |name| name == member, &text)?;
        Ok(text)
    }

    fn decode(&self, artifact: &Path) -> Result<RecordStream> {
        let reader = BufReader::new(File::open(artifact)?);
        Ok(Box::new(VectorLines::new(reader, DIMENSION)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_languages_are_accepted() {
        assert!(FastTextCorpus::new("en").is_ok());
        assert!(matches!(FastTextCorpus::new("xx"), Err(Error::Config(_))));
    }

    #[test]
    fn url_and_store_follow_language() {
        let corpus = FastTextCorpus::new("en").unwrap();
        assert_eq!(
            corpus.url(),
            "https://s3-us-west-1.amazonaws.com/fasttext-vectors/wiki.en.zip"
        );
        assert_eq!(corpus.store_path(), Path::new("fasttext").join("en.db"));
        assert_eq!(corpus.expected_size(), 1);
    }
}
