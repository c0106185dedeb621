//! # LFU ordering
//!
//! Frequency ordering for the least-frequently-used policy, built on
//! [`FrequencyBuckets`]. Every entry starts at frequency 1; each access moves it
//! to the head of the next bucket. The victim is the tail of the lowest bucket,
//! so ties between equally cold entries go to the one touched longest ago.
//!
//! ## LFU vs LRU
//!
//! ```text
//!   Access pattern: A, B, A, C, A, D, A, E, A, F  (A accessed 5 times, others 1 each)
//!   Capacity: 3
//!
//!   LRU (recency-based):
//!   ═══════════════════════════════════════════════════════════════════════════
//!     After A,B,A,C: [A, C, B]  (most recent → least recent)
//!     Insert D:      [D, A, C]  ← B evicted
//!     Insert E:      [E, D, A]  ← C evicted
//!     Insert F:      [F, E, D]  ← A evicted, even though accessed 5 times
//!
//!   LFU (frequency-based):
//!   ═══════════════════════════════════════════════════════════════════════════
//!     After A,B,A,C: {A:2, B:1, C:1}
//!     Insert D:      {A:3, C:1, D:1}  ← B evicted (freq=1, touched longest ago)
//!     Insert E:      {A:4, D:1, E:1}  ← C evicted
//!     Insert F:      {A:5, E:1, F:1}  ← D evicted
//!
//!   A survives under LFU.
//! ```
//!
//! Frequencies only grow; there is no aging. A formerly hot entry keeps its
//! count until it is removed, overwritten entries keep theirs and bump it.
//!
//! ## Example
//!
//! ```
//! use evictkit::entry::Entry;
//! use evictkit::policy::lfu::LfuOrder;
//! use evictkit::traits::EvictionOrder;
//!
//! let mut order = LfuOrder::new();
//! let hot = order.insert(Entry::new("hot", 1, None));
//! order.insert(Entry::new("cold", 2, None));
//!
//! order.touch(hot);
//! assert_eq!(order.frequency(hot), Some(2));
//! assert_eq!(order.pop_victim().map(|e| e.key), Some("cold"));
//! ```

use crate::ds::{FrequencyBuckets, SlotId};
use crate::entry::Entry;
use crate::traits::{EntryIter, EvictionOrder};

/// Least-frequently-used ordering structure.
#[derive(Debug)]
pub struct LfuOrder<K, V> {
    buckets: FrequencyBuckets<Entry<K, V>>,
}

impl<K, V> LfuOrder<K, V> {
    pub fn new() -> Self {
        Self {
            buckets: FrequencyBuckets::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
        }
    }

    /// Lowest frequency currently held, if any.
    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }
}

impl<K, V> Default for LfuOrder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionOrder<K, V> for LfuOrder<K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn insert(&mut self, entry: Entry<K, V>) -> SlotId {
        self.buckets.insert(entry)
    }

    #[inline]
    fn touch(&mut self, id: SlotId) -> bool {
        self.buckets.touch(id).is_some()
    }

    #[inline]
    fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.buckets.get(id)
    }

    #[inline]
    fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.buckets.get_mut(id)
    }

    #[inline]
    fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        self.buckets.remove(id)
    }

    #[inline]
    fn peek_victim(&self) -> Option<(SlotId, &Entry<K, V>)> {
        self.buckets.peek_min()
    }

    #[inline]
    fn pop_victim(&mut self) -> Option<Entry<K, V>> {
        self.buckets.pop_min().map(|(entry, _)| entry)
    }

    #[inline]
    fn frequency(&self, id: SlotId) -> Option<u64> {
        self.buckets.frequency(id)
    }

    fn iter(&self) -> EntryIter<'_, K, V> {
        Box::new(self.buckets.iter().map(|(id, entry, _)| (id, entry)))
    }

    fn on_resize(&mut self, capacity: usize) {
        if self.buckets.capacity() > capacity.saturating_mul(2) {
            self.buckets.shrink_to_fit();
        }
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        self.buckets.debug_validate_invariants();
    }
}
