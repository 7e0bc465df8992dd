//! Node height generation.
//!
//! Upon insertion a new node is replicated to higher levels with a certain
//! probability, as determined by a [`LevelGenerator`]. The list only ever asks
//! the generator for a height, so tests can swap in a
//! [`ScriptedLevelGenerator`] and assert exact structural outcomes.

use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::config::{Config, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
use crate::error::Result;

pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a height for a new node in the range `[1, total]`.
    ///
    /// This must never return a height that is `> self.total()`.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed heights.
///
/// The probability of generating height `n + 1` is `p` times the probability
/// of generating height `n`, truncated at the maximum number of levels.
#[derive(Clone, Debug)]
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: SmallRng,
}

impl GeometricalLevelGenerator {
    /// Create a generator with `total` levels and `p` as the probability that
    /// a node present in one level is also present in the next.
    pub fn new(total: usize, p: f64) -> Result<Self> {
        Self::from_config(&Config::new().max_level(total).probability(p))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.get_seed() {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(GeometricalLevelGenerator {
            total: config.get_max_level(),
            p: config.get_probability(),
            rng,
        })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for GeometricalLevelGenerator {
    /// [`DEFAULT_MAX_LEVEL`] levels at [`DEFAULT_PROBABILITY`], seeded from
    /// entropy.
    fn default() -> Self {
        GeometricalLevelGenerator {
            total: DEFAULT_MAX_LEVEL,
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::from_entropy(),
        }
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 1;
        while h < self.total && self.rng.gen_bool(self.p) {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

/// Replays a fixed sequence of heights, cycling once it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedLevelGenerator {
    total: usize,
    heights: Vec<usize>,
    cursor: usize,
}

impl ScriptedLevelGenerator {
    /// Heights outside `[1, total]` are clamped into range when replayed.
    /// An empty script always yields height 1.
    pub fn new(total: usize, heights: impl IntoIterator<Item = usize>) -> Self {
        ScriptedLevelGenerator {
            total,
            heights: heights.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl LevelGenerator for ScriptedLevelGenerator {
    fn random(&mut self) -> usize {
        if self.heights.is_empty() {
            return 1;
        }
        let h = self.heights[self.cursor % self.heights.len()];
        self.cursor += 1;
        h.clamp(1, self.total.max(1))
    }

    fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipListError;

    #[test]
    fn invalid_total() {
        assert_eq!(
            GeometricalLevelGenerator::new(0, 0.5).unwrap_err(),
            SkipListError::InvalidMaxLevel(0)
        );
    }

    #[test]
    fn invalid_p_0() {
        assert!(GeometricalLevelGenerator::new(1, 0.0).is_err());
    }

    #[test]
    fn invalid_p_1() {
        assert!(GeometricalLevelGenerator::new(1, 1.0).is_err());
    }

    #[test]
    fn single_level_always_one() {
        let mut generator = GeometricalLevelGenerator::new(1, 0.9).unwrap();
        for _ in 0..100 {
            assert_eq!(generator.random(), 1);
        }
    }

    #[test]
    fn heights_stay_in_range() {
        let mut generator = GeometricalLevelGenerator::new(6, 0.75).unwrap();
        for _ in 0..10_000 {
            let h = generator.random();
            assert!((1..=6).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn seeded_is_reproducible() {
        let config = Config::new().seed(42);
        let mut a = GeometricalLevelGenerator::from_config(&config).unwrap();
        let mut b = GeometricalLevelGenerator::from_config(&config).unwrap();
        let xs: Vec<_> = (0..256).map(|_| a.random()).collect();
        let ys: Vec<_> = (0..256).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn distribution_is_roughly_geometric() {
        let mut generator =
            GeometricalLevelGenerator::from_config(&Config::new().seed(1)).unwrap();
        let n = 100_000;
        let ones = (0..n).filter(|_| generator.random() == 1).count();
        // P(height == 1) = 1 - p = 0.75
        let ratio = ones as f64 / n as f64;
        assert!((0.73..0.77).contains(&ratio), "ratio {}", ratio);
    }

    #[test]
    fn default_uses_default_config() {
        let generator = GeometricalLevelGenerator::default();
        assert_eq!(generator.total(), DEFAULT_MAX_LEVEL);
        assert_eq!(generator.probability(), DEFAULT_PROBABILITY);
    }

    #[test]
    fn scripted_cycles_and_clamps() {
        let mut generator = ScriptedLevelGenerator::new(3, [1, 5, 0, 2]);
        let heights: Vec<_> = (0..6).map(|_| generator.random()).collect();
        assert_eq!(heights, vec![1, 3, 1, 2, 1, 3]);
        assert_eq!(generator.total(), 3);
    }

    #[test]
    fn scripted_empty_yields_one() {
        let mut generator = ScriptedLevelGenerator::new(4, Vec::new());
        assert_eq!(generator.random(), 1);
    }
}
