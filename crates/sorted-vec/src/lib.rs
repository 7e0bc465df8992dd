//! Naive ordered set over a sorted `Vec`.
//!
//! Every operation is a binary search plus, for mutation, an O(n) shift. It is
//! slow but obviously correct, which makes it the reference that property
//! tests and the fuzz harness compare `IndexedSkipList` against.
//!
//! # Example
//!
//! ```
//! use sorted_vec::SortedVecSet;
//!
//! let mut set = SortedVecSet::new();
//! set.insert(3);
//! set.insert(1);
//! assert_eq!(set.rank_of(&3), Some(1));
//! assert_eq!(set.get(0), Some(&1));
//! ```

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedVecSet<T> {
    items: Vec<T>,
}

impl<T: Ord> SortedVecSet<T> {
    pub fn new() -> Self {
        SortedVecSet { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `false` if an equal item is already present.
    pub fn insert(&mut self, item: T) -> bool {
        match self.items.binary_search(&item) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, item);
                true
            }
        }
    }

    pub fn remove(&mut self, item: &T) -> Option<T> {
        let pos = self.items.binary_search(item).ok()?;
        Some(self.items.remove(pos))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.binary_search(item).is_ok()
    }

    pub fn rank_of(&self, item: &T) -> Option<usize> {
        self.items.binary_search(item).ok()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
