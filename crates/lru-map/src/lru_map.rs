//! Bounded LRU (Least Recently Used) map with O(1) operations.
//!
//! Uses a HashMap for key→index lookup and an arena-based doubly-linked list
//! for recency ordering. All get/set/remove operations are O(1) amortized.
//! No unsafe code — uses Vec<Node> with index-based links instead of raw pointers.
//!
//! The arena is kept dense: removing a node swap-removes its slot and
//! re-points the links and index entry of the node that moved into it. The
//! arena therefore always holds exactly `len()` nodes.
//!
//! # Features
//! - O(1) get, set, remove, peek, put-if-absent
//! - Optional maximum size with automatic LRU eviction
//! - Dynamic resize with bulk eviction, oldest first
//! - Non-promoting iterators over entries, keys and values (MRU→LRU)
//! - Hit/miss/eviction statistics
//!
//! # Example
//! ```
//! use lru_map::LruMap;
//!
//! let mut map = LruMap::new(3).unwrap();
//! map.set(1, "one");
//! map.set(2, "two");
//! map.set(3, "three");
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! // 1 is now most-recently used, 2 is least-recently used
//!
//! let evicted = map.set(4, "four");
//! assert_eq!(evicted, Some((2, "two")));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![4, 1, 3]);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::LruMapConfig;
use crate::error::Result;
use crate::iter::{Iter, Keys, Values};

/// Sentinel value for null links in the doubly-linked list.
pub(crate) const SENTINEL: usize = usize::MAX;

/// Upper limit on slots reserved up front for a bounded map.
const MAX_PREALLOCATED_SLOTS: usize = 1024;

/// A node in the arena-based doubly-linked list.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

/// Map hit/miss/eviction statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
    pub updates: u64,
    pub removals: u64,
}

impl MapStats {
    /// Hit rate as a fraction [0.0, 1.0]. Returns 0.0 if no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of promoting lookups (hits + misses).
    pub fn total_lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Bounded, recency-ordered map.
///
/// Internally stores entries in a `Vec<Node>` arena with index-based
/// doubly-linked list links. A `HashMap<K, usize>` maps keys to arena indices.
/// The linked list maintains recency order: head = most recent, tail = least recent.
///
/// Not synchronized; wrap it in a lock to share it between threads.
#[derive(Clone)]
pub struct LruMap<K, V> {
    /// Maximum number of entries, `None` when unbounded.
    maximum_size: Option<NonZeroUsize>,
    /// Key → arena index mapping.
    index: HashMap<K, usize>,
    /// Arena of nodes, exactly one per entry.
    arena: Vec<Node<K, V>>,
    /// Index of most-recently used node (head of list).
    head: usize,
    /// Index of least-recently used node (tail of list).
    tail: usize,
    stats: MapStats,
}

impl<K, V> fmt::Debug for LruMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruMap")
            .field("maximum_size", &self.maximum_size())
            .field("len", &self.arena.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K, V> LruMap<K, V> {
    fn with_bound(maximum_size: Option<NonZeroUsize>) -> Self {
        let reserve = maximum_size.map_or(0, |max| max.get().min(MAX_PREALLOCATED_SLOTS));
        Self {
            maximum_size,
            index: HashMap::with_capacity(reserve),
            arena: Vec::with_capacity(reserve),
            head: SENTINEL,
            tail: SENTINEL,
            stats: MapStats::default(),
        }
    }

    /// Returns the maximum number of entries, or `None` if unbounded.
    pub fn maximum_size(&self) -> Option<usize> {
        self.maximum_size.map(NonZeroUsize::get)
    }

    /// Returns the number of entries currently stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns a reference to the statistics.
    pub fn stats(&self) -> &MapStats {
        &self.stats
    }

    /// Resets the statistics counters.
    pub fn reset_stats(&mut self) {
        self.stats = MapStats::default();
    }

    /// Iterate over entries from most-recently used to least-recently used.
    /// Does not promote anything; call `.rev()` for LRU→MRU order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.head, self.tail)
    }

    /// Keys from most-recently used to least-recently used, without promotion.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Values from most-recently used to least-recently used, without promotion.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Call `visitor` with every entry, MRU→LRU, without promotion.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Returns true if any entry holds a value equal to `value`.
    /// Scans every entry; does not promote.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.arena.iter().any(|node| node.value == *value)
    }

    /// Peek at the least-recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.arena.get(self.tail).map(|node| (&node.key, &node.value))
    }

    /// Peek at the most-recently used entry without removing it.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.arena.get(self.head).map(|node| (&node.key, &node.value))
    }

    /// Clear all entries. Statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.arena.clear();
        self.head = SENTINEL;
        self.tail = SENTINEL;
    }
}

impl<K: Hash + Eq + Clone, V> LruMap<K, V> {
    /// Create an empty map without an entry bound.
    pub fn unbounded() -> Self {
        Self::with_bound(None)
    }

    /// Create an empty map holding at most `maximum_size` entries.
    ///
    /// A `maximum_size` of 0 is rejected with
    /// [`ConfigError::InvalidMaximumSize`](crate::ConfigError::InvalidMaximumSize).
    pub fn new(maximum_size: usize) -> Result<Self> {
        Self::with_config(&LruMapConfig::bounded(maximum_size))
    }

    /// Create an empty map from a validated configuration.
    pub fn with_config(config: &LruMapConfig) -> Result<Self> {
        Ok(Self::with_bound(config.validate()?))
    }

    /// Create a map and `set` each entry in iteration order.
    ///
    /// The last entry ends up most-recently used; if the entries outnumber
    /// the bound, the earliest ones are evicted as insertion proceeds.
    pub fn from_entries<I>(config: &LruMapConfig, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_config(config)?;
        map.extend(entries);
        Ok(map)
    }

    /// Get a reference to the value for `key`, promoting it to most-recently used.
    /// Returns `None` if the key is not present.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_head(idx);
            self.stats.hits += 1;
            Some(&self.arena[idx].value)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Get a mutable reference to the value for `key`, promoting it to most-recently used.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_head(idx);
            self.stats.hits += 1;
            Some(&mut self.arena[idx].value)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Peek at the value for `key` without promoting it (no recency change).
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| &self.arena[idx].value)
    }

    /// Returns true if the map contains the given key (without promoting it).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Insert or update a key-value pair.
    ///
    /// An existing key has its value replaced and is promoted to most-recently
    /// used; nothing is evicted and `None` is returned. A new key is linked in
    /// as most-recently used. If the map was full, the least-recently used
    /// entry is evicted and returned as `Some((evicted_key, evicted_value))`.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.arena[idx].value = value;
            self.move_to_head(idx);
            self.stats.updates += 1;
            return None;
        }
        self.insert_new(key, value)
    }

    /// Return the value for `key`, inserting `make_value()` first if absent.
    ///
    /// A present key is promoted and `make_value` is never called. An absent
    /// key gets the computed value as its most-recently used entry, evicting
    /// the least-recently used entry if the map was full.
    pub fn put_if_absent<F>(&mut self, key: K, make_value: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.try_put_if_absent(key, || Ok::<V, Infallible>(make_value())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`put_if_absent`](Self::put_if_absent).
    ///
    /// If `make_value` fails, its error is returned and the map is left exactly
    /// as it was: no entry is inserted, nothing is evicted or reordered.
    pub fn try_put_if_absent<F, E>(&mut self, key: K, make_value: F) -> std::result::Result<&V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let idx = if let Some(&idx) = self.index.get(&key) {
            self.move_to_head(idx);
            self.stats.hits += 1;
            idx
        } else {
            let value = make_value()?;
            self.stats.misses += 1;
            self.insert_new(key, value);
            self.head
        };
        Ok(&self.arena[idx].value)
    }

    /// Remove a key from the map, returning its value if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        let node = self.detach(idx);
        self.stats.removals += 1;
        Some(node.value)
    }

    /// Remove and return the least-recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.take_lru()?;
        self.stats.removals += 1;
        Some(entry)
    }

    /// Change the maximum size. `None` removes the bound.
    ///
    /// Shrinking below the current length evicts least-recently used entries
    /// one at a time until the map fits; the evicted entries are returned
    /// oldest first. Growing or removing the bound never evicts. A bound of 0
    /// is rejected and leaves the map untouched.
    pub fn set_maximum_size(&mut self, maximum_size: Option<usize>) -> Result<Vec<(K, V)>> {
        let bound = LruMapConfig { maximum_size }.validate()?;
        let previous = self.maximum_size();
        self.maximum_size = bound;

        let mut evicted = Vec::new();
        if let Some(max) = bound {
            while self.arena.len() > max.get() {
                match self.evict_lru() {
                    Some(entry) => evicted.push(entry),
                    None => break,
                }
            }
        }

        debug!(
            previous = ?previous,
            maximum_size = ?maximum_size,
            evicted = evicted.len(),
            "Maximum size changed"
        );
        Ok(evicted)
    }

    /// Retain only entries for which the predicate returns true.
    /// Entries are visited in LRU→MRU order. Removed entries don't count as evictions.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        // Collect keys to remove (can't mutate while iterating)
        let keys_to_remove: Vec<K> = self
            .iter()
            .rev()
            .filter(|(k, v)| !keep(k, v))
            .map(|(k, _)| k.clone())
            .collect();

        for key in keys_to_remove {
            self.remove(&key);
        }
    }

    // --- Internal linked-list operations ---

    fn is_full(&self) -> bool {
        self.maximum_size
            .is_some_and(|max| self.arena.len() >= max.get())
    }

    /// Link a key that is not yet present as most-recently used, evicting
    /// the LRU entry first if the map is full.
    fn insert_new(&mut self, key: K, value: V) -> Option<(K, V)> {
        let evicted = if self.is_full() {
            self.evict_lru()
        } else {
            None
        };

        let idx = self.arena.len();
        self.arena.push(Node {
            key: key.clone(),
            value,
            prev: SENTINEL,
            next: SENTINEL,
        });
        self.push_head(idx);
        self.index.insert(key, idx);
        self.stats.insertions += 1;

        evicted
    }

    /// Remove node at `idx` from the doubly-linked list (does NOT free the slot).
    fn unlink(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != SENTINEL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != SENTINEL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = SENTINEL;
        self.arena[idx].next = SENTINEL;
    }

    /// Push node at `idx` to the head of the list (most-recently used).
    fn push_head(&mut self, idx: usize) {
        self.arena[idx].prev = SENTINEL;
        self.arena[idx].next = self.head;

        if self.head != SENTINEL {
            self.arena[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == SENTINEL {
            self.tail = idx;
        }
    }

    /// Move an existing node to the head (most-recently used).
    fn move_to_head(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_head(idx);
    }

    /// Unlink the node at `idx` and take it out of the arena.
    ///
    /// The caller owns removing the node's own key from `index`. The last
    /// arena node is moved into the vacated slot, so its neighbours, the
    /// head/tail markers and its index entry are re-pointed here.
    fn detach(&mut self, idx: usize) -> Node<K, V> {
        self.unlink(idx);
        let last = self.arena.len() - 1;
        let node = self.arena.swap_remove(idx);

        if idx != last {
            let prev = self.arena[idx].prev;
            let next = self.arena[idx].next;

            if prev != SENTINEL {
                self.arena[prev].next = idx;
            } else {
                self.head = idx;
            }

            if next != SENTINEL {
                self.arena[next].prev = idx;
            } else {
                self.tail = idx;
            }

            if let Some(slot) = self.index.get_mut(&self.arena[idx].key) {
                *slot = idx;
            }
        }

        node
    }

    /// Detach the tail (least-recently used) entry, without touching stats.
    fn take_lru(&mut self) -> Option<(K, V)> {
        if self.tail == SENTINEL {
            return None;
        }
        let node = self.detach(self.tail);
        self.index.remove(&node.key);
        Some((node.key, node.value))
    }

    /// Evict the tail (least-recently used) entry.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let entry = self.take_lru()?;
        self.stats.evictions += 1;
        trace!(
            len = self.arena.len(),
            maximum_size = ?self.maximum_size(),
            "Evicted least-recently used entry"
        );
        Some(entry)
    }
}

impl<K: Hash + Eq + Clone, V> Default for LruMap<K, V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K: Hash + Eq + Clone, V> Extend<(K, V)> for LruMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for LruMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = Self::unbounded();
        map.extend(entries);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a LruMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
