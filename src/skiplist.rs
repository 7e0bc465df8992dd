//! Indexed Skip List
//!
//! An ordered set built on a probabilistic skip list where every forward link
//! also records its *span*: the number of base-level steps it jumps. Summing
//! spans along a search path yields the rank of the node the path lands on,
//! which gives O(log n) expected time for rank queries on top of the usual
//! O(log n) insert, remove and membership search.
//!
//! # Span Semantics
//!
//! Positions count base-level steps from the head: the head sits at position
//! 0, the element of rank `k` at position `k + 1`, and the end of every level
//! at position `len + 1`.
//!
//! - `node.links[level].span` = position of `node.links[level].next` (or of
//!   the end) minus the position of `node`
//! - On every active level the spans sum to `len + 1`
//!
//! # Structure
//!
//! ```text
//! Level 2: HEAD -(2)-------------> 12 -(3)---------------------> END
//! Level 1: HEAD -(2)-------------> 12 -(2)-----------> 15 -(1)-> END
//! Level 0: HEAD -(1)-> 9 -(1)-> 12 -(1)-> 13 -(1)-> 15 -(1)-> END
//! ```
//!
//! # Operations
//!
//! - `insert(item)`: O(log n) - returns false if an equal item is present
//! - `remove(item)` / `take(item)`: O(log n)
//! - `find(item)` / `contains(item)`: O(log n)
//! - `rank_of(item)`: O(log n) - number of strictly smaller items
//! - `get(index)`: O(log n) - item with the given rank
//! - `remove_at(index)`: O(log n)
//! - `len()`: O(1)

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use smallvec::{SmallVec, smallvec};
use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::error::{Result, SkipListError};
use crate::level_generator::{GeometricalLevelGenerator, LevelGenerator};

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// The head sentinel always occupies the first arena slot.
const HEAD: Idx = 0;

/// Per-call scratch buffers stay on the stack up to this many levels.
const INLINE_LEVELS: usize = 32;

type Path<V> = SmallVec<[V; INLINE_LEVELS]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Link {
    /// `None` marks the end of the level.
    next: Option<Idx>,
    span: usize,
}

#[derive(Clone, Debug)]
struct Node<T> {
    /// `None` only for the head and for slots on the free list.
    item: Option<T>,
    /// One link per level the node participates in.
    links: SmallVec<[Link; 4]>,
}

impl<T> Node<T> {
    fn new(item: T, height: usize) -> Self {
        Node {
            item: Some(item),
            links: smallvec![Link { next: None, span: 0 }; height],
        }
    }

    fn new_head(max_level: usize) -> Self {
        Node {
            item: None,
            links: smallvec![Link { next: None, span: 1 }; max_level],
        }
    }

    fn height(&self) -> usize {
        self.links.len()
    }
}

/// An ordered set of unique items with O(log n) rank queries.
#[derive(Clone)]
pub struct IndexedSkipList<T, G = GeometricalLevelGenerator> {
    /// Arena of nodes; `nodes[HEAD]` is the sentinel.
    nodes: Vec<Node<T>>,
    /// Removed slots available for reuse.
    free_list: Vec<Idx>,
    /// Number of active levels, in `[1, max_level]`.
    level: usize,
    len: usize,
    generator: G,
}

impl<T> IndexedSkipList<T> {
    /// An empty list using the default [`Config`].
    pub fn new() -> Self {
        Self::build(GeometricalLevelGenerator::default())
    }

    pub fn with_max_level(max_level: usize) -> Result<Self> {
        Self::with_config(Config::new().max_level(max_level))
    }

    #[instrument(level = "debug")]
    pub fn with_config(config: Config) -> Result<Self> {
        let generator = GeometricalLevelGenerator::from_config(&config)?;
        Ok(Self::build(generator))
    }
}

impl<T> Default for IndexedSkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G: LevelGenerator> IndexedSkipList<T, G> {
    /// An empty list whose node heights come from `generator`. The list can
    /// grow to `generator.total()` levels.
    #[instrument(level = "debug", skip_all)]
    pub fn with_generator(generator: G) -> Result<Self> {
        if generator.total() == 0 {
            return Err(SkipListError::InvalidMaxLevel(0));
        }
        Ok(Self::build(generator))
    }

    fn build(generator: G) -> Self {
        let max_level = generator.total();
        debug!(max_level, "creating indexed skip list");
        IndexedSkipList {
            nodes: vec![Node::new_head(max_level)],
            free_list: Vec::new(),
            level: 1,
            len: 0,
            generator,
        }
    }

    fn random_height(&mut self) -> usize {
        let height = self.generator.random();
        debug_assert!(
            (1..=self.max_level()).contains(&height),
            "level generator returned height {} outside [1, {}]",
            height,
            self.max_level()
        );
        height.clamp(1, self.max_level())
    }
}

impl<T, G> IndexedSkipList<T, G> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.node(HEAD).height()
    }

    // --- Node access helpers ---

    fn node(&self, idx: Idx) -> &Node<T> {
        &self.nodes[idx as usize]
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node<T> {
        &mut self.nodes[idx as usize]
    }

    fn alloc_node(&mut self, item: T, height: usize) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            *self.node_mut(idx) = Node::new(item, height);
            idx
        } else {
            let idx = self.nodes.len() as Idx;
            self.nodes.push(Node::new(item, height));
            idx
        }
    }

    fn release(&mut self, idx: Idx) -> Option<T> {
        let node = self.node_mut(idx);
        node.links.clear();
        let item = node.item.take();
        self.free_list.push(idx);
        item
    }

    // --- Searching ---

    /// The successor of `idx` on `level`, if its item is strictly less than
    /// `value`.
    fn successor_below<Q>(&self, idx: Idx, level: usize, value: &Q) -> Option<Idx>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let next = self.node(idx).links[level].next?;
        let item = self.node(next).item.as_ref()?;
        (item.borrow() < value).then_some(next)
    }

    /// The base-level successor of `pred`, if its item equals `value`.
    fn landing<Q>(&self, pred: Idx, value: &Q) -> Option<Idx>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let next = self.node(pred).links[0].next?;
        let item = self.node(next).item.as_ref()?;
        (item.borrow() == value).then_some(next)
    }

    /// Descend to the last node strictly less than `value`, returning it and
    /// its position.
    fn predecessor<Q>(&self, value: &Q) -> (Idx, usize)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.level).rev() {
            while let Some(next) = self.successor_below(idx, level, value) {
                pos += self.node(idx).links[level].span;
                idx = next;
            }
        }
        (idx, pos)
    }

    /// Same descent as [`predecessor`](Self::predecessor), recording for
    /// every level the last node visited and its position. Levels above the
    /// active ones are left pointing at the head at position 0.
    fn search_path<Q>(&self, value: &Q) -> (Path<Idx>, Path<usize>)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let max_level = self.max_level();
        let mut update: Path<Idx> = smallvec![HEAD; max_level];
        let mut rank: Path<usize> = smallvec![0; max_level];
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.level).rev() {
            while let Some(next) = self.successor_below(idx, level, value) {
                pos += self.node(idx).links[level].span;
                idx = next;
            }
            update[level] = idx;
            rank[level] = pos;
        }
        (update, rank)
    }

    /// The node at base position `target`, which must be in `[0, len]`.
    fn node_at_position(&self, target: usize) -> Idx {
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.level).rev() {
            loop {
                let link = self.node(idx).links[level];
                match link.next {
                    Some(next) if pos + link.span <= target => {
                        pos += link.span;
                        idx = next;
                    }
                    _ => break,
                }
            }
        }
        debug_assert_eq!(pos, target);
        idx
    }

    /// For every active level, the last node strictly before base position
    /// `target`.
    fn position_path(&self, target: usize) -> Path<Idx> {
        let mut update: Path<Idx> = smallvec![HEAD; self.max_level()];
        let mut idx = HEAD;
        let mut pos = 0;
        for level in (0..self.level).rev() {
            loop {
                let link = self.node(idx).links[level];
                match link.next {
                    Some(next) if pos + link.span < target => {
                        pos += link.span;
                        idx = next;
                    }
                    _ => break,
                }
            }
            update[level] = idx;
        }
        update
    }

    /// The item equal to `value`, if present.
    pub fn find<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (pred, _) = self.predecessor(value);
        let idx = self.landing(pred, value)?;
        self.node(idx).item.as_ref()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(value).is_some()
    }

    /// Number of items strictly less than `value`, if `value` is present.
    pub fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (pred, rank) = self.predecessor(value);
        self.landing(pred, value).map(|_| rank)
    }

    /// The item with rank `index` (the `index`-th smallest, from zero).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let idx = self.node_at_position(index + 1);
        self.node(idx).item.as_ref()
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Iterate over all items in ascending order.
    pub fn iter(&self) -> Iter<'_, T, G> {
        Iter {
            list: self,
            current: self.node(HEAD).links[0].next,
            remaining: self.len,
        }
    }

    /// Remove every item. The maximum level and generator are kept.
    #[instrument(level = "trace", skip_all, fields(len = self.len))]
    pub fn clear(&mut self) {
        let max_level = self.max_level();
        self.nodes.clear();
        self.nodes.push(Node::new_head(max_level));
        self.free_list.clear();
        self.level = 1;
        self.len = 0;
    }
}

impl<T: Ord, G: LevelGenerator> IndexedSkipList<T, G> {
    /// Insert `value`, returning `false` if an equal item is already present.
    ///
    /// A rejected insert leaves the list untouched and does not draw a level.
    pub fn insert(&mut self, value: T) -> bool {
        let (mut update, mut rank) = self.search_path(&value);
        if self.landing(update[0], &value).is_some() {
            return false;
        }

        let height = self.random_height();
        if height > self.level {
            for level in self.level..height {
                update[level] = HEAD;
                rank[level] = 0;
                // An unused level covers the whole list.
                self.node_mut(HEAD).links[level].span = self.len + 1;
            }
            trace!(from = self.level, to = height, "raising active level");
            self.level = height;
        }

        // Position of the new node's base-level predecessor.
        let pos = rank[0];
        let new_idx = self.alloc_node(value, height);

        for level in 0..self.level {
            let pred_idx = update[level];
            let old = self.node(pred_idx).links[level];
            if level >= height {
                // The new node is skipped over at this level.
                self.node_mut(pred_idx).links[level].span += 1;
                continue;
            }
            // Split the old span across pred -> new and new -> old successor.
            self.node_mut(new_idx).links[level] = Link {
                next: old.next,
                span: rank[level] + old.span - pos,
            };
            self.node_mut(pred_idx).links[level] = Link {
                next: Some(new_idx),
                span: pos + 1 - rank[level],
            };
        }

        self.len += 1;
        self.check_invariants();
        true
    }

    /// Remove the item equal to `value`. Returns `false` if it was absent.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Remove and return the item equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (update, _) = self.search_path(value);
        let target = self.landing(update[0], value)?;
        self.unlink(target, &update)
    }

    /// Remove and return the item with rank `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let out_of_range = SkipListError::OutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }
        let update = self.position_path(index + 1);
        let target = self.node(update[0]).links[0].next.ok_or(out_of_range)?;
        self.unlink(target, &update).ok_or(out_of_range)
    }

    /// Splice `target` out of every active level. `update[level]` must be the
    /// last node before `target` on that level.
    fn unlink(&mut self, target: Idx, update: &[Idx]) -> Option<T> {
        for level in 0..self.level {
            let pred_idx = update[level];
            let link = self.node(pred_idx).links[level];
            if link.next == Some(target) {
                // Merge the two spans, minus the removed node itself.
                let removed = self.node(target).links[level];
                self.node_mut(pred_idx).links[level] = Link {
                    next: removed.next,
                    span: link.span + removed.span - 1,
                };
            } else {
                self.node_mut(pred_idx).links[level].span -= 1;
            }
        }

        let before = self.level;
        while self.level > 1 && self.node(HEAD).links[self.level - 1].next.is_none() {
            self.level -= 1;
        }
        if self.level != before {
            trace!(from = before, to = self.level, "shrinking active level");
        }

        self.len -= 1;
        let item = self.release(target);
        self.check_invariants();
        item
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        // Invariant 1: level 0 is strictly ascending and holds len() items
        let mut position = vec![usize::MAX; self.nodes.len()];
        position[HEAD as usize] = 0;
        let mut count = 0usize;
        let mut prev: Option<&T> = None;
        let mut cursor = self.node(HEAD).links[0].next;
        while let Some(idx) = cursor {
            count += 1;
            position[idx as usize] = count;
            let item = self.node(idx).item.as_ref();
            assert!(
                item.is_some(),
                "INVARIANT VIOLATED: node {} on level 0 holds no item",
                idx
            );
            if let (Some(prev), Some(item)) = (prev, item) {
                assert!(
                    prev < item,
                    "INVARIANT VIOLATED: level 0 not strictly ascending at position {}",
                    count
                );
            }
            prev = item;
            cursor = self.node(idx).links[0].next;
        }
        assert_eq!(
            count, self.len,
            "INVARIANT VIOLATED: level 0 holds {} items but len()={}",
            count, self.len
        );

        // Invariant 2: every span is the base-level distance it jumps, and
        // spans on each active level sum to len + 1
        for level in 0..self.level {
            let mut idx = HEAD;
            let mut total = 0usize;
            loop {
                let link = self.node(idx).links[level];
                let here = position[idx as usize];
                let there = match link.next {
                    Some(next) => position[next as usize],
                    None => self.len + 1,
                };
                assert!(
                    there != usize::MAX,
                    "INVARIANT VIOLATED: node reachable on level {} is missing from level 0",
                    level
                );
                assert!(
                    link.span >= 1 && here + link.span == there,
                    "INVARIANT VIOLATED: span {} at position {} on level {} should reach position {}",
                    link.span,
                    here,
                    level,
                    there
                );
                total += link.span;
                match link.next {
                    Some(next) => idx = next,
                    None => break,
                }
            }
            assert_eq!(
                total,
                self.len + 1,
                "INVARIANT VIOLATED: spans on level {} sum to {} but len()+1={}",
                level,
                total,
                self.len + 1
            );
        }

        // Invariant 3: the top active level is never empty above level 1
        assert!(
            self.level == 1 || self.node(HEAD).links[self.level - 1].next.is_some(),
            "INVARIANT VIOLATED: top level {} is empty",
            self.level
        );
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}
}

/// Ascending iterator over the items of an [`IndexedSkipList`].
pub struct Iter<'a, T, G> {
    list: &'a IndexedSkipList<T, G>,
    current: Option<Idx>,
    remaining: usize,
}

impl<'a, T, G> Iterator for Iter<'a, T, G> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?);
        self.current = node.links[0].next;
        self.remaining = self.remaining.saturating_sub(1);
        node.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, G> ExactSizeIterator for Iter<'_, T, G> {}

impl<T, G> FusedIterator for Iter<'_, T, G> {}

impl<'a, T, G> IntoIterator for &'a IndexedSkipList<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord> FromIterator<T> for IndexedSkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = IndexedSkipList::new();
        list.extend(iter);
        list
    }
}

impl<T: Ord, G: LevelGenerator> Extend<T> for IndexedSkipList<T, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: PartialEq, G> PartialEq for IndexedSkipList<T, G> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, G> Eq for IndexedSkipList<T, G> {}

impl<T: fmt::Debug, G> fmt::Debug for IndexedSkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Level-by-level dump, top level first. Each base-level slot a link jumps
/// over is drawn as a run of dashes.
///
/// ```text
/// H-----2-----E
/// H--1--2--3--E
/// ```
impl<T: fmt::Display, G> fmt::Display for IndexedSkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.iter().map(|item| item.to_string()).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);
        let gap = "-".repeat(width + 2);

        for level in (0..self.level).rev() {
            f.write_str("H")?;
            let mut idx = HEAD;
            let mut pos = 0;
            loop {
                let link = self.node(idx).links[level];
                for _ in 1..link.span {
                    f.write_str(&gap)?;
                }
                pos += link.span;
                match link.next {
                    Some(next) => {
                        write!(f, "--{:>width$}", cells[pos - 1])?;
                        idx = next;
                    }
                    None => {
                        writeln!(f, "--E")?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
