//! AFL Fuzz harness for IndexedSkipList
//!
//! Interprets the input as a stream of operations and replays them against
//! both the skip list and the sorted-Vec reference, asserting they agree on
//! every result. Debug builds also run the skip list's own span checks after
//! each mutation.
//!
//! Node heights are scripted from the input too, so the fuzzer steers the
//! shape of the list as well as its contents.

use afl::fuzz;
use ranked_skiplist::{IndexedSkipList, ScriptedLevelGenerator};
use sorted_vec::SortedVecSet;

const MAX_LEVEL: usize = 8;

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert(u8),
    Remove(u8),
    RemoveAt { pos_frac: u8 },
    Query(u8),
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        let (&arg, rest) = rest.split_first()?;
        let op = match tag % 4 {
            0 => FuzzOp::Insert(arg),
            1 => FuzzOp::Remove(arg),
            2 => FuzzOp::RemoveAt { pos_frac: arg },
            _ => FuzzOp::Query(arg),
        };
        Some((op, rest))
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        let Some((&script_len, rest)) = data.split_first() else {
            return;
        };
        let script_len = (script_len as usize % 16).min(rest.len());
        let (script, mut remaining) = rest.split_at(script_len);
        let heights: Vec<usize> = script.iter().map(|b| *b as usize % MAX_LEVEL + 1).collect();

        let generator = ScriptedLevelGenerator::new(MAX_LEVEL, heights);
        let Ok(mut list) = IndexedSkipList::with_generator(generator) else {
            return;
        };
        let mut reference = SortedVecSet::new();

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            match op {
                FuzzOp::Insert(v) => {
                    assert_eq!(list.insert(v), reference.insert(v));
                }
                FuzzOp::Remove(v) => {
                    assert_eq!(list.take(&v), reference.remove(&v));
                }
                FuzzOp::RemoveAt { pos_frac } => {
                    let index = pos_frac as usize * (reference.len() + 1) / 256;
                    assert_eq!(list.remove_at(index).ok(), reference.remove_at(index));
                }
                FuzzOp::Query(v) => {
                    assert_eq!(list.rank_of(&v), reference.rank_of(&v));
                    let index = v as usize % (reference.len() + 1);
                    assert_eq!(list.get(index), reference.get(index));
                }
            }
            assert_eq!(list.len(), reference.len());
            assert!(list.level() <= MAX_LEVEL);
        }

        assert!(list.iter().eq(reference.as_slice().iter()));
    });
}
