// SPDX-License-Identifier: MIT OR Apache-2.0

//! Out-of-vocabulary fallback policy.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bound of the uniform distribution used by [`OovMode::RandomUniform`].
pub const RANDOM_BOUND: f32 = 0.1;

/// How to embed a word that is absent from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OovMode {
    /// Report the word as having no embedding
    #[default]
    None,
    /// All-zero vector
    Zero,
    /// Fresh values drawn uniformly from [-0.1, 0.1]
    #[serde(rename = "random", alias = "random-uniform")]
    RandomUniform,
}

impl OovMode {
    /// Substitute vector of `dimension` values for this mode.
    ///
    /// Draws from the thread-local generator; see [`OovMode::fallback_with`]
    /// to supply a seeded source instead.
    pub fn fallback(self, dimension: usize) -> Option<Vec<f32>> {
        self.fallback_with(&mut rand::thread_rng(), dimension)
    }

    /// Substitute vector drawing any randomness from `rng`.
    pub fn fallback_with<R: Rng + ?Sized>(self, rng: &mut R, dimension: usize) -> Option<Vec<f32>> {
        match self {
            OovMode::None => None,
            OovMode::Zero => Some(vec![0.0; dimension]),
            OovMode::RandomUniform => Some(
                (0..dimension)
                    .map(|_| rng.gen_range(-RANDOM_BOUND..=RANDOM_BOUND))
                    .collect(),
            ),
        }
    }
}

impl std::fmt::Display for OovMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OovMode::None => write!(f, "none"),
            OovMode::Zero => write!(f, "zero"),
            OovMode::RandomUniform => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for OovMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(OovMode::None),
            "zero" => Ok(OovMode::Zero),
            "random" | "random-uniform" => Ok(OovMode::RandomUniform),
            _ => Err(format!("Unknown OOV mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn none_is_absent() {
        assert_eq!(OovMode::None.fallback(3), None);
    }

    #[test]
    fn zero_has_dimension_zeros() {
        assert_eq!(OovMode::Zero.fallback(3), Some(vec![0.0, 0.0, 0.0]));
    }

    #[test]
    fn random_stays_in_bounds() {
        for _ in 0..100 {
            let v = OovMode::RandomUniform.fallback(3).unwrap();
            assert_eq!(v.len(), 3);
            assert!(v.iter().all(|x| (-RANDOM_BOUND..=RANDOM_BOUND).contains(x)));
        }
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let a = OovMode::RandomUniform.fallback_with(&mut StdRng::seed_from_u64(7), 5);
        let b = OovMode::RandomUniform.fallback_with(&mut StdRng::seed_from_u64(7), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("zero".parse::<OovMode>().unwrap(), OovMode::Zero);
        assert_eq!("Random-Uniform".parse::<OovMode>().unwrap(), OovMode::RandomUniform);
        assert!("gaussian".parse::<OovMode>().is_err());
        assert_eq!(OovMode::RandomUniform.to_string(), "random");
    }
}
