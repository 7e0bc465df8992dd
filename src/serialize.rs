//! Serde support: a list serializes as its ascending sequence of items and
//! deserializes by inserting each item into a list with the default config.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::skiplist::IndexedSkipList;

impl<T: Serialize, G> Serialize for IndexedSkipList<T, G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

struct ListVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de> + Ord> Visitor<'de> for ListVisitor<T> {
    type Value = IndexedSkipList<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of ordered items")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = IndexedSkipList::new();
        while let Some(item) = seq.next_element()? {
            list.insert(item);
        }
        Ok(list)
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for IndexedSkipList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ListVisitor(PhantomData))
    }
}
