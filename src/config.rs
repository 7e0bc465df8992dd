//! Construction parameters for an [`IndexedSkipList`](crate::IndexedSkipList).

use crate::error::{Result, SkipListError};

/// Default number of levels. 32 levels at p = 0.25 covers far more elements
/// than fit in memory.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Default probability that a node present on level `n` is also present on
/// level `n + 1`.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    max_level: usize,
    probability: f64,
    seed: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }

    /// Number of levels every list built from this config can grow to.
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Seed the level generator so node heights are reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn get_max_level(&self) -> usize {
        self.max_level
    }

    pub fn get_probability(&self) -> f64 {
        self.probability
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 {
            return Err(SkipListError::InvalidMaxLevel(self.max_level));
        }
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(SkipListError::InvalidProbability(self.probability));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.get_max_level(), DEFAULT_MAX_LEVEL);
        assert_eq!(config.get_probability(), DEFAULT_PROBABILITY);
        assert_eq!(config.get_seed(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_levels_rejected() {
        let config = Config::new().max_level(0);
        assert_eq!(config.validate(), Err(SkipListError::InvalidMaxLevel(0)));
    }

    #[test]
    fn probability_bounds() {
        for p in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            let err = Config::new().probability(p).validate().unwrap_err();
            assert!(matches!(err, SkipListError::InvalidProbability(_)), "p = {}", p);
        }
        assert!(Config::new().probability(0.5).validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let config = Config::new().max_level(6).probability(0.5).seed(7);
        assert_eq!(config.get_max_level(), 6);
        assert_eq!(config.get_probability(), 0.5);
        assert_eq!(config.get_seed(), Some(7));
    }
}
