// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character n-gram retrieval.
//!
//! A word is wrapped in `#BEGIN#`/`#END#` markers, split into character
//! n-grams for n in 2..=4, and embedded as the mean of the vectors of every
//! distinct n-gram found in the store. Words with no known n-gram embed as
//! the zero vector.

use std::collections::BTreeMap;

use super::facade::{Embedding, WordEmbedding};
use super::oov::OovMode;
use crate::corpus::Corpus;
use crate::errors::Result;

pub const BEGIN_MARKER: &str = "#BEGIN#";
pub const END_MARKER: &str = "#END#";
pub const NGRAM_SIZES: [usize; 3] = [2, 3, 4];

/// Store keys of every n-gram of `word`, in order, duplicates removed.
pub fn ngram_keys(word: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::with_capacity(word.chars().count() + 2);
    tokens.push(BEGIN_MARKER.to_string());
    tokens.extend(word.chars().map(String::from));
    tokens.push(END_MARKER.to_string());

    let mut keys = Vec::new();
    for n in NGRAM_SIZES {
        for window in tokens.windows(n) {
            let key = format!("{}gram-{}", n, window.concat());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Embedding that averages character n-gram vectors.
pub struct NgramEmbedding<C> {
    inner: Embedding<C>,
}

impl<C: Corpus> NgramEmbedding<C> {
    pub fn new(inner: Embedding<C>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Embedding<C> {
        &self.inner
    }

    /// Vectors of the n-grams of `word` that exist in the store.
    pub fn matches(&self, word: &str) -> Result<BTreeMap<String, Vec<f32>>> {
        let mut found = BTreeMap::new();
        for key in ngram_keys(word) {
            if let Some(vector) = self.inner.lookup(&key)? {
                found.insert(key, vector);
            }
        }
        Ok(found)
    }
}

impl<C: Corpus> WordEmbedding for NgramEmbedding<C> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn default_oov(&self) -> OovMode {
        OovMode::Zero
    }

    /// Always returns a vector; `default` has no effect since a word without
    /// known n-grams embeds as zeros.
    fn emb(&self, word: &str, _default: Option<OovMode>) -> Result<Option<Vec<f32>>> {
        let dimension = self.dimension();
        let found = self.matches(word)?;

        let mut mean = vec![0.0f32; dimension];
        if found.is_empty() {
            return Ok(Some(mean));
        }
        for vector in found.values() {
            for (acc, value) in mean.iter_mut().zip(vector) {
                *acc += value;
            }
        }
        let n = found.len() as f32;
        for value in mean.iter_mut() {
            *value /= n;
        }
        Ok(Some(mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_include_markers() {
        let keys = ngram_keys("ca");
        assert_eq!(
            keys,
            vec![
                "2gram-#BEGIN#c",
                "2gram-ca",
                "2gram-a#END#",
                "3gram-#BEGIN#ca",
                "3gram-ca#END#",
                "4gram-#BEGIN#ca#END#",
            ]
        );
    }

    #[test]
    fn repeated_ngrams_are_listed_once() {
        let keys = ngram_keys("aaa");
        let twograms: Vec<_> = keys.iter().filter(|k| k.as_str() == "2gram-aa").collect();
        assert_eq!(twograms.len(), 1);
    }

    #[test]
    fn empty_word_has_marker_bigram_only() {
        assert_eq!(ngram_keys(""), vec!["2gram-#BEGIN##END#"]);
    }

    #[test]
    fn multibyte_characters_are_kept_whole() {
        let keys = ngram_keys("é");
        assert!(keys.contains(&"2gram-#BEGIN#é".to_string()));
    }
}
