use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A map from each key to a set of values. Iteration order is deterministic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiMap<K: Ord, V: Ord> {
    map: BTreeMap<K, BTreeSet<V>>,
}

impl<K: Ord + Clone, V: Ord + Clone> MultiMap<K, V> {
    pub fn new() -> MultiMap<K, V> {
        MultiMap {
            map: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_insert_with(BTreeSet::new).insert(value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn consume(self) -> BTreeMap<K, BTreeSet<V>> {
        self.map
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Default for MultiMap<K, V> {
    fn default() -> Self {
        MultiMap::new()
    }
}
