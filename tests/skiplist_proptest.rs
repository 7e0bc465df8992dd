//! Property-based tests for `IndexedSkipList`, checked against the naive
//! `SortedVecSet` reference.

use proptest::prelude::*;
use ranked_skiplist::{Config, IndexedSkipList, ScriptedLevelGenerator};
use sorted_vec::SortedVecSet;

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    RemoveAt { index_pct: f64 },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u16..512).prop_map(Op::Insert),
        2 => (0u16..512).prop_map(Op::Remove),
        1 => (0.0..1.0f64).prop_map(|index_pct| Op::RemoveAt { index_pct }),
    ]
}

fn apply<G: ranked_skiplist::LevelGenerator>(
    list: &mut IndexedSkipList<u16, G>,
    reference: &mut SortedVecSet<u16>,
    op: &Op,
) -> Result<(), TestCaseError> {
    match *op {
        Op::Insert(v) => {
            prop_assert_eq!(list.insert(v), reference.insert(v));
        }
        Op::Remove(v) => {
            prop_assert_eq!(list.remove(&v), reference.remove(&v).is_some());
        }
        Op::RemoveAt { index_pct } => {
            let index = (index_pct * reference.len() as f64) as usize;
            prop_assert_eq!(list.remove_at(index).ok(), reference.remove_at(index));
        }
    }
    Ok(())
}

fn seeded(seed: u64) -> IndexedSkipList<u16> {
    IndexedSkipList::with_config(Config::new().max_level(10).seed(seed)).unwrap()
}

// =============================================================================
// Differential properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every observable result matches the sorted-Vec reference.
    #[test]
    fn matches_reference(
        ops in prop::collection::vec(arbitrary_op(), 1..200),
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        let mut reference = SortedVecSet::new();

        for op in &ops {
            apply(&mut list, &mut reference, op)?;
            prop_assert_eq!(list.len(), reference.len());
        }

        let items: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(items.as_slice(), reference.as_slice());
        for v in 0u16..512 {
            prop_assert_eq!(list.contains(&v), reference.contains(&v));
            prop_assert_eq!(list.rank_of(&v), reference.rank_of(&v));
        }
        for i in 0..=reference.len() {
            prop_assert_eq!(list.get(i), reference.get(i));
        }
    }

    /// Exact level scripts drive the same observable behavior.
    #[test]
    fn scripted_levels_match_reference(
        ops in prop::collection::vec(arbitrary_op(), 1..120),
        heights in prop::collection::vec(1usize..=5, 1..16),
    ) {
        let mut list = IndexedSkipList::with_generator(ScriptedLevelGenerator::new(5, heights)).unwrap();
        let mut reference = SortedVecSet::new();

        for op in &ops {
            apply(&mut list, &mut reference, op)?;
        }
        let items: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(items.as_slice(), reference.as_slice());
        prop_assert!(list.level() <= 5);
    }
}

// =============================================================================
// Structural properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Base-level traversal is strictly ascending for any insert order.
    #[test]
    fn iteration_is_strictly_ascending(
        values in prop::collection::vec(any::<i32>(), 0..300),
        seed in any::<u64>(),
    ) {
        let mut list = IndexedSkipList::with_config(Config::new().seed(seed)).unwrap();
        list.extend(values);
        let items: Vec<i32> = list.iter().copied().collect();
        prop_assert!(items.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(items.len(), list.len());
    }

    /// get(rank_of(v)) == v for every present v.
    #[test]
    fn rank_round_trip(
        ops in prop::collection::vec(arbitrary_op(), 1..200),
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        let mut reference = SortedVecSet::new();
        for op in &ops {
            apply(&mut list, &mut reference, op)?;
        }
        for v in reference.as_slice() {
            let rank = list.rank_of(v);
            prop_assert!(rank.is_some());
            prop_assert_eq!(rank.and_then(|r| list.get(r)), Some(v));
        }
    }

    /// Inserting then removing a fresh value restores len and ranks.
    #[test]
    fn insert_remove_is_neutral(
        values in prop::collection::btree_set(0u16..1000, 0..100),
        probe in 1000u16..2000,
        seed in any::<u64>(),
    ) {
        let mut list = seeded(seed);
        list.extend(values.iter().copied());
        let before: Vec<Option<usize>> = values.iter().map(|v| list.rank_of(v)).collect();

        prop_assert!(list.insert(probe));
        prop_assert!(list.contains(&probe));
        prop_assert_eq!(list.len(), values.len() + 1);
        prop_assert!(list.remove(&probe));
        prop_assert!(!list.contains(&probe));
        prop_assert!(!list.remove(&probe));

        let after: Vec<Option<usize>> = values.iter().map(|v| list.rank_of(v)).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(list.len(), values.len());
    }
}
