//! # Cache core
//!
//! Single-threaded eviction engine: a `key → SlotId` index, an
//! [`EvictionOrder`] holding the entries, a capacity bound and an optional
//! eviction callback. [`ConcurrentCache`](crate::concurrent::ConcurrentCache)
//! puts one of these behind a mutex; nothing here synchronizes on its own.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          CacheCore<K, V, O>                          │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>          order: O                      │
//!   │   ┌─────────┬────────┐                 ┌─────────────────────────┐   │
//!   │   │ "a"     │ id_3   │ ──────────────► │ id_3: Entry{"a", v, exp}│   │
//!   │   │ "b"     │ id_0   │ ──────────────► │ id_0: Entry{"b", v, exp}│   │
//!   │   └─────────┴────────┘                 │  ... policy links ...   │   │
//!   │                                        └─────────────────────────┘   │
//!   │   capacity: usize                                                    │
//!   │   on_evict: Option<EvictCallback<K, V>>                              │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Add flow
//!
//! ```text
//!   add(key, value, expires_at)
//!        │
//!        ▼
//!   key live in index? ── yes ──► overwrite value + expiry, touch, return false
//!        │ no (absent, or expired → deleted lazily)
//!        ▼
//!   len == capacity? ── yes ──► pop victim, unlink from index, on_evict(victim)
//!        │
//!        ▼
//!   insert at "new" position (LRU head / LFU freq 1), return evicted
//! ```
//!
//! ## Expiration
//!
//! Expiry is lazy. `get`, `peek`, `contains` and the compound operations read
//! the clock once and delete an entry whose `expires_at` has been reached. That
//! deletion is not an eviction: the callback is not invoked and the ordering is
//! not touched. Entries nobody looks at keep their slot until they are evicted,
//! resized away, removed or purged.
//!
//! ## Callback contract
//!
//! `on_evict` runs synchronously inside the operation that evicted (a capacity
//! overflow in `add`, or a downsizing `resize`). When it runs, the victim is
//! already unlinked from both the index and the ordering.

use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::ds::SlotId;
use crate::entry::{Entry, Expiry};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::policy::MAX_PREALLOC;
use crate::traits::{EvictCallback, EvictionOrder};

/// Single-threaded cache engine generic over its eviction ordering.
///
/// # Example
///
/// ```
/// use evictkit::core::CacheCore;
/// use evictkit::policy::lru::LruOrder;
///
/// let mut core = CacheCore::try_new(LruOrder::new(), 2, None).unwrap();
/// core.add("a", 1, None);
/// core.add("b", 2, None);
/// core.get(&"a");
///
/// // "b" is now least recently used
/// assert!(core.add("c", 3, None));
/// assert!(!core.contains(&"b"));
/// assert_eq!(core.keys(), vec!["a", "c"]);
/// ```
pub struct CacheCore<K, V, O> {
    index: FxHashMap<K, SlotId>,
    order: O,
    capacity: usize,
    on_evict: Option<EvictCallback<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V, O> CacheCore<K, V, O>
where
    K: Eq + Hash + Clone,
    O: EvictionOrder<K, V>,
{
    /// Creates a core around `order`, which must be empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(
        mut order: O,
        capacity: usize,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            warn!("rejected cache construction with zero capacity");
            return Err(ConfigError::zero_capacity());
        }
        order.clear();
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(
                capacity.min(MAX_PREALLOC),
                Default::default(),
            ),
            order,
            capacity,
            on_evict,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    /// Inserts or overwrites `key`. Returns `true` iff an entry was evicted to
    /// make room.
    ///
    /// Overwriting a live key replaces value and expiry and counts as an
    /// access (LRU moves it to the head, LFU bumps its frequency).
    pub fn add(&mut self, key: K, value: V, expires_at: Expiry) -> bool {
        let now = Instant::now();
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(id) = self.live_slot(&key, now) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.order.touch(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return false;
        }

        self.insert_new(key, value, expires_at)
    }

    /// Returns the value and expiry for `key` and records the access.
    ///
    /// An expired entry is deleted and reported as a miss.
    pub fn get(&mut self, key: &K) -> Option<(&V, Expiry)> {
        let now = Instant::now();
        let Some(id) = self.live_slot(key, now) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };
        self.order.touch(id);
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        self.order.get(id).map(|e| (&e.value, e.expires_at))
    }

    /// Like [`get`](Self::get) but leaves recency and frequency alone.
    pub fn peek(&mut self, key: &K) -> Option<(&V, Expiry)> {
        let id = self.live_slot(key, Instant::now())?;
        self.order.get(id).map(|e| (&e.value, e.expires_at))
    }

    /// Returns `true` if `key` is present and not expired. No access is recorded.
    pub fn contains(&mut self, key: &K) -> bool {
        self.live_slot(key, Instant::now()).is_some()
    }

    /// Adds `key` only if it is not already live.
    ///
    /// Returns `(contained, evicted)`. A live key is left untouched and yields
    /// `(true, false)`.
    pub fn contains_or_add(&mut self, key: K, value: V, expires_at: Expiry) -> (bool, bool) {
        if self.live_slot(&key, Instant::now()).is_some() {
            return (true, false);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();
        (false, self.insert_new(key, value, expires_at))
    }

    /// Like [`contains_or_add`](Self::contains_or_add), also returning the
    /// existing value when the key was live.
    pub fn peek_or_add(&mut self, key: K, value: V, expires_at: Expiry) -> (Option<&V>, bool, bool) {
        if let Some(id) = self.live_slot(&key, Instant::now()) {
            return (self.order.get(id).map(|e| &e.value), true, false);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();
        let evicted = self.insert_new(key, value, expires_at);
        (None, false, evicted)
    }

    /// Deletes `key` without invoking the callback. Returns whether an entry
    /// was present, expired or not.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(id) = self.index.remove(key) else {
            return false;
        };
        self.order.remove(id);
        #[cfg(feature = "metrics")]
        self.metrics.record_removed_entry();
        true
    }

    /// Sets a new capacity, evicting (with callback) until the cache fits.
    ///
    /// Returns the number of entries evicted. A capacity of zero is treated as
    /// one, since a resize cannot fail.
    pub fn resize(&mut self, capacity: usize) -> usize {
        let capacity = if capacity == 0 {
            warn!("resize to zero capacity clamped to 1");
            1
        } else {
            capacity
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_resize();

        // Capacity is committed after the overflow is gone; a panicking
        // callback must not leave len above it.
        let old_capacity = self.capacity;
        let mut evicted = 0;
        while self.index.len() > capacity && self.evict_one() {
            evicted += 1;
        }
        self.capacity = capacity;
        self.order.on_resize(capacity);

        if evicted > 0 {
            debug!(old_capacity, new_capacity = capacity, evicted, "resize evicted entries");
        }
        evicted
    }

    /// Drops every entry without invoking the callback.
    pub fn purge(&mut self) {
        self.index.clear();
        self.order.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_purge();
    }

    /// Unexpired keys, least favoured first: the order in which they would be
    /// evicted if nothing else happened.
    pub fn keys(&self) -> Vec<K> {
        let now = Instant::now();
        self.order
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    /// Number of stored entries, including expired ones not yet looked up.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The entry the policy would evict next, expired or not.
    pub fn peek_victim(&self) -> Option<(&K, &V, Expiry)> {
        self.order
            .peek_victim()
            .map(|(_, e)| (&e.key, &e.value, e.expires_at))
    }

    /// Removes and returns the next victim. The callback is not invoked.
    pub fn remove_victim(&mut self) -> Option<Entry<K, V>> {
        let entry = self.order.pop_victim()?;
        self.index.remove(&entry.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_removed_entry();
        Some(entry)
    }

    /// Access frequency of a live entry; `None` for orderings without one.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let now = Instant::now();
        if self.order.get(id)?.is_expired(now) {
            return None;
        }
        self.order.frequency(id)
    }

    /// The ordering structure, read-only.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Whether an eviction callback is installed.
    pub fn has_evict_callback(&self) -> bool {
        self.on_evict.is_some()
    }

    /// Verifies that the index and the ordering hold the same entry set.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: fmt::Debug,
    {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys, order has {} entries",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            let entry = self
                .order
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("key {:?}: stale {:?}", key, id)))?;
            if &entry.key != key {
                return Err(InvariantError::new(format!(
                    "key {:?} maps to {:?} holding key {:?}",
                    key, id, entry.key
                )));
            }
        }
        let mut walked = 0;
        for (id, entry) in self.order.iter() {
            walked += 1;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "ordered entry {:?} at {:?} not indexed",
                    entry.key, id
                )));
            }
        }
        if walked != self.order.len() {
            return Err(InvariantError::new(format!(
                "iteration visited {} entries, order reports {}",
                walked,
                self.order.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self)
    where
        K: fmt::Debug,
    {
        self.order.debug_validate_invariants();
        if let Err(err) = self.check_invariants() {
            panic!("cache invariant violated: {err}");
        }
    }

    /// Looks up `key`, deleting it if expired. Returns the slot of a live entry.
    fn live_slot(&mut self, key: &K, now: Instant) -> Option<SlotId> {
        let id = *self.index.get(key)?;
        let expired = self.order.get(id).is_some_and(|e| e.is_expired(now));
        if !expired {
            return Some(id);
        }
        self.index.remove(key);
        self.order.remove(id);
        trace!("expired entry deleted on lookup");
        #[cfg(feature = "metrics")]
        self.metrics.record_expired_entry();
        None
    }

    /// Inserts a key known not to be in the index, evicting first if full.
    fn insert_new(&mut self, key: K, value: V, expires_at: Expiry) -> bool {
        let evicted = self.index.len() >= self.capacity && self.evict_one();
        let id = self.order.insert(Entry::new(key.clone(), value, expires_at));
        self.index.insert(key, id);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        evicted
    }

    fn evict_one(&mut self) -> bool {
        let Some(victim) = self.order.pop_victim() else {
            return false;
        };
        self.index.remove(&victim.key);
        trace!(len = self.index.len(), capacity = self.capacity, "evicted entry");
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        if let Some(on_evict) = &self.on_evict {
            on_evict(&victim.key, &victim.value, victim.expires_at);
        }
        true
    }
}

#[cfg(feature = "metrics")]
impl<K, V, O> CacheCore<K, V, O> {
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_new: self.metrics.insert_new,
            insert_updates: self.metrics.insert_updates,
            evicted_entries: self.metrics.evicted_entries,
            expired_entries: self.metrics.expired_entries,
            removed_entries: self.metrics.removed_entries,
            purge_calls: self.metrics.purge_calls,
            resize_calls: self.metrics.resize_calls,
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, O> MetricsSnapshotProvider<CacheMetricsSnapshot> for CacheCore<K, V, O> {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, O> fmt::Debug for CacheCore<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("on_evict", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}
