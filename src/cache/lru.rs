//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a fresh generation number. `order` maps
/// generations back to keys, so the smallest generation is the least
/// recently used key. Touch, remove and evict are `O(log n)`.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Latest generation of each tracked key
    stamps: HashMap<K, u64>,
    /// Keys by generation, oldest first
    order: BTreeMap<u64, K>,
    next_generation: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            stamps: HashMap::new(),
            order: BTreeMap::new(),
            next_generation: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &K) {
        let generation = self.next_generation;
        self.next_generation += 1;

        if let Some(previous) = self.stamps.insert(key.clone(), generation) {
            self.order.remove(&previous);
        }
        self.order.insert(generation, key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        if let Some(generation) = self.stamps.remove(key) {
            self.order.remove(&generation);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
