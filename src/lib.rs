//! Ranked Skip List - an ordered set with O(log n) rank queries.
//!
//! [`IndexedSkipList`] is a probabilistic skip list whose links also record
//! how many items they skip, so it can answer "what is the k-th smallest
//! item?" and "how many items are smaller than this one?" as cheaply as it
//! answers membership.
//!
//! # Quick Start
//!
//! ```
//! use ranked_skiplist::IndexedSkipList;
//!
//! let mut list = IndexedSkipList::with_max_level(6).unwrap();
//! for v in [10, 13, 9, 20, 12, 15] {
//!     list.insert(v);
//! }
//!
//! assert_eq!(list.len(), 6);
//! assert_eq!(list.rank_of(&9), Some(0));
//! assert_eq!(list.get(2), Some(&12));
//!
//! list.remove(&13);
//! assert_eq!(list.rank_of(&15), Some(3));
//! ```
//!
//! Node heights come from a [`LevelGenerator`]. The default draws them
//! geometrically with p = 0.25; [`ScriptedLevelGenerator`] replays a fixed
//! sequence for tests that assert exact structure.

mod config;
mod error;
mod level_generator;
#[cfg(feature = "serde")]
mod serialize;
mod skiplist;

pub use config::{Config, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
pub use error::{Result, SkipListError};
pub use level_generator::{GeometricalLevelGenerator, LevelGenerator, ScriptedLevelGenerator};
pub use skiplist::{IndexedSkipList, Iter};
