// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concatenation of several embeddings.

use super::facade::WordEmbedding;
use super::oov::OovMode;
use crate::errors::{Error, Result};

/// Joins the vectors of several embeddings, in declaration order.
///
/// Borrows its parts and never mutates them.
pub struct ConcatEmbedding<'a> {
    parts: Vec<&'a dyn WordEmbedding>,
    default_oov: OovMode,
}

impl<'a> ConcatEmbedding<'a> {
    pub fn new(parts: Vec<&'a dyn WordEmbedding>, default_oov: OovMode) -> Result<Self> {
        if parts.is_empty() {
            return Err(Error::Config(
                "a concatenated embedding needs at least one part".into(),
            ));
        }
        Ok(Self { parts, default_oov })
    }

    pub fn parts(&self) -> &[&'a dyn WordEmbedding] {
        &self.parts
    }
}

impl WordEmbedding for ConcatEmbedding<'_> {
    fn dimension(&self) -> usize {
        self.parts.iter().map(|part| part.dimension()).sum()
    }

    fn default_oov(&self) -> OovMode {
        self.default_oov
    }

    /// Absent as soon as any part has no embedding for `word`.
    fn emb(&self, word: &str, default: Option<OovMode>) -> Result<Option<Vec<f32>>> {
        let mode = default.unwrap_or(self.default_oov);
        let mut joined = Vec::with_capacity(self.dimension());
        for part in &self.parts {
            match part.emb(word, Some(mode))? {
                Some(vector) => joined.extend(vector),
                None => return Ok(None),
            }
        }
        Ok(Some(joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed {
        vectors: HashMap<&'static str, Vec<f32>>,
        dimension: usize,
    }

    impl WordEmbedding for Fixed {
        fn dimension(&self) -> usize {
            self.dimension
        }

        fn default_oov(&self) -> OovMode {
            OovMode::None
        }

        fn emb(&self, word: &str, default: Option<OovMode>) -> Result<Option<Vec<f32>>> {
            Ok(match self.vectors.get(word) {
                Some(v) => Some(v.clone()),
                None => default.unwrap_or(OovMode::None).fallback(self.dimension),
            })
        }
    }

    fn fixed(pairs: &[(&'static str, Vec<f32>)], dimension: usize) -> Fixed {
        Fixed {
            vectors: pairs.iter().cloned().collect(),
            dimension,
        }
    }

    #[test]
    fn concatenates_in_order() {
        let a = fixed(&[("w", vec![1.0, 2.0])], 2);
        let b = fixed(&[("w", vec![3.0])], 1);
        let parts: Vec<&dyn WordEmbedding> = vec![&a, &b];
        let concat = ConcatEmbedding::new(parts, OovMode::None).unwrap();

        assert_eq!(concat.dimension(), 3);
        assert_eq!(concat.emb("w", None).unwrap(), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn default_mode_is_passed_to_parts() {
        let a = fixed(&[("w", vec![1.0, 2.0])], 2);
        let b = fixed(&[], 1);
        let parts: Vec<&dyn WordEmbedding> = vec![&a, &b];
        let concat = ConcatEmbedding::new(parts, OovMode::Zero).unwrap();

        assert_eq!(concat.emb("w", None).unwrap(), Some(vec![1.0, 2.0, 0.0]));
        assert_eq!(concat.emb("w", Some(OovMode::None)).unwrap(), None);
    }

    #[test]
    fn needs_at_least_one_part() {
        assert!(matches!(
            ConcatEmbedding::new(Vec::new(), OovMode::None),
            Err(Error::Config(_))
        ));
    }
}
