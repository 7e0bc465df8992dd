//! Errors reported by skip list construction and rank-addressed mutation.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SkipListError {
    #[error("max level must be at least 1, got {0}")]
    InvalidMaxLevel(usize),
    #[error("level probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
    #[error("rank {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, SkipListError>;
