//! Frequency buckets for O(1) LFU ordering.
//!
//! Holds payloads in a `SlotArena` and groups them into buckets of equal access
//! frequency. Buckets form a doubly linked list in ascending frequency order and
//! each bucket is itself a doubly linked list of entries, most recently touched at
//! the head. `min_freq` names the first bucket, so the eviction candidate (tail of
//! the lowest bucket) is always one hop away.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                     FrequencyBuckets<T> Layout                           │
//! │                                                                          │
//! │   entries: SlotArena<Entry<T>>                                           │
//! │   ┌──────┬──────────────────────────────┐                                │
//! │   │ Slot │ Entry                        │                                │
//! │   ├──────┼──────────────────────────────┤                                │
//! │   │ id_0 │ freq:2, prev/next, value     │                                │
//! │   │ id_1 │ freq:1, prev/next, value     │                                │
//! │   │ id_2 │ freq:1, prev/next, value     │                                │
//! │   └──────┴──────────────────────────────┘                                │
//! │                                                                          │
//! │   buckets: FxHashMap<u64, Bucket>  (frequency → in-arena list)           │
//! │                                                                          │
//! │   min_freq = 1                                                           │
//! │       │                                                                  │
//! │       ▼                                                                  │
//! │   freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail                           │
//! │                      MRU          LRU (evict first)                      │
//! │   freq=2: head ──► [id_0] ◄── tail                                       │
//! │                                                                          │
//! │   Bucket links: freq=1 ──next──► freq=2                                  │
//! │                 freq=2 ◄──prev── freq=1                                  │
//! └──────────────────────────────────────────────────────────────────────────┘
//!
//! Touch Flow (increment frequency)
//! ─────────────────────────────────
//!
//!   touch(id_1):
//!     1. Unlink id_1 from the freq=1 bucket
//!     2. If freq=1 is now empty → unlink the bucket, advance min_freq
//!     3. Create freq=2 right after freq=1 if it does not exist
//!     4. Push id_1 to the head of freq=2 (MRU)
//!
//! Eviction Flow (pop_min)
//! ───────────────────────
//!
//!   pop_min():
//!     1. Follow min_freq to the lowest bucket
//!     2. Unlink its tail (least recently touched at that frequency)
//!     3. If the bucket is empty → unlink it, min_freq = bucket.next
//! ```
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                                   |
//! |------------|------|-----------------------------------------|
//! | `insert`   | O(1) | New entry starts at freq=1              |
//! | `touch`    | O(1) | Increment frequency, move to bucket MRU |
//! | `remove`   | O(1) | Unlink by `SlotId`                      |
//! | `pop_min`  | O(1) | LFU victim, LRU tie-break               |
//! | `iter`     | O(n) | Eviction order, least favoured first    |
//!
//! Keys are not tracked here; callers keep their own `key → SlotId` index and
//! store whatever payload they need (the cache stores its [`Entry`](crate::entry::Entry)).
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

/// Link pointers come first; they are touched on every list operation.
#[derive(Debug)]
#[repr(C)]
struct Node<T> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Default bucket pre-allocation for typical frequency distributions.
/// Most entries cluster at low frequencies, so 32 buckets covers the common case.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// O(1) LFU ordering with LRU tie-breaking inside each frequency.
///
/// # Example
///
/// ```
/// use evictkit::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// let a = freq.insert("a");
/// let _b = freq.insert("b");
/// freq.touch(a); // "a" now at freq=2
///
/// assert_eq!(freq.frequency(a), Some(2));
/// assert_eq!(freq.min_freq(), Some(1));
/// assert_eq!(freq.pop_min(), Some(("b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<T> {
    entries: SlotArena<Node<T>>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl<T> FrequencyBuckets<T> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty tracker with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            buckets: FxHashMap::with_capacity_and_hasher(
                DEFAULT_BUCKET_PREALLOC,
                Default::default(),
            ),
            min_freq: 0,
        }
    }

    /// Returns the number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` is a live entry.
    pub fn contains(&self, id: SlotId) -> bool {
        self.entries.contains(id)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.entries.get(id).map(|node| &node.value)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entries.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns the current frequency of `id`.
    #[inline]
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.entries.get(id).map(|node| node.freq)
    }

    /// Returns the minimum frequency currently present.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Inserts `value` at frequency 1 (head of the freq=1 bucket).
    #[inline]
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = self.entries.insert(Node {
            prev: None,
            next: None,
            freq: 1,
            value,
        });

        if !self.buckets.contains_key(&1) {
            let next = self.min_freq();
            self.insert_bucket(1, None, next);
        }
        self.list_push_front(1, id);
        self.min_freq = 1;
        id
    }

    /// Increments the frequency of `id` and returns the new frequency.
    ///
    /// The entry becomes the MRU of its new bucket. Frequencies saturate at
    /// `u64::MAX`; a saturated entry is only refreshed within its bucket.
    #[inline]
    pub fn touch(&mut self, id: SlotId) -> Option<u64> {
        let current_freq = self.entries.get(id)?.freq;
        if current_freq == u64::MAX {
            self.list_remove(current_freq, id)?;
            self.list_push_front(current_freq, id);
            return Some(current_freq);
        }
        let next_freq = current_freq + 1;

        let (prev_freq, next_existing) = {
            let bucket = self.buckets.get(&current_freq)?;
            (bucket.prev, bucket.next)
        };

        self.list_remove(current_freq, id)?;
        let bucket_empty = self.bucket_is_empty(current_freq);
        if bucket_empty {
            self.remove_bucket(current_freq, prev_freq, next_existing);
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if bucket_empty {
                prev_freq
            } else {
                Some(current_freq)
            };
            self.insert_bucket(next_freq, prev, next_existing);
        }

        if let Some(node) = self.entries.get_mut(id) {
            node.freq = next_freq;
        }
        self.list_push_front(next_freq, id);
        if bucket_empty && self.min_freq == current_freq {
            self.min_freq = next_freq;
        }

        Some(next_freq)
    }

    /// Unlinks `id` and returns its payload.
    #[inline]
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let freq = self.entries.get(id)?.freq;
        self.unlink(freq, id)?;
        self.entries.remove(id).map(|node| node.value)
    }

    /// Returns the eviction candidate without removing it.
    pub fn peek_min(&self) -> Option<(SlotId, &T)> {
        let id = self.buckets.get(&self.min_freq)?.tail?;
        self.entries.get(id).map(|node| (id, &node.value))
    }

    /// Removes the eviction candidate and returns `(payload, freq)`.
    ///
    /// The candidate is the least recently touched entry of the lowest
    /// frequency bucket.
    #[inline]
    pub fn pop_min(&mut self) -> Option<(T, u64)> {
        let freq = self.min_freq;
        if freq == 0 {
            return None;
        }
        let id = self.buckets.get(&freq)?.tail?;
        self.unlink(freq, id)?;
        self.entries.remove(id).map(|node| (node.value, node.freq))
    }

    /// Iterates entries in eviction order: ascending frequency, and within a
    /// frequency from least to most recently touched.
    pub fn iter(&self) -> EvictionOrderIter<'_, T> {
        EvictionOrderIter {
            buckets: self,
            bucket: self.min_freq(),
            current: None,
        }
    }

    /// Number of entries the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Reserves room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Releases unused entry and bucket storage.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
        self.buckets.shrink_to_fit();
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);
        assert!(self.buckets.contains_key(&self.min_freq));

        let mut total = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(bucket.head.is_some());
            assert!(bucket.tail.is_some());
            match bucket.prev {
                Some(prev) => {
                    assert!(prev < freq);
                    assert_eq!(self.buckets[&prev].next, Some(freq));
                },
                None => assert_eq!(self.min_freq, freq),
            }
            if let Some(next) = bucket.next {
                assert!(next > freq);
                assert_eq!(self.buckets[&next].prev, Some(freq));
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let node = self.entries.get(id).expect("bucket entry missing");
                assert_eq!(node.freq, freq);
                assert_eq!(node.prev, last);
                last = Some(id);
                current = node.next;
                total += 1;
            }
            assert_eq!(bucket.tail, last);
        }
        assert_eq!(total, self.len());
    }

    /// Unlinks `id` from bucket `freq`, dropping the bucket if it empties.
    fn unlink(&mut self, freq: u64, id: SlotId) -> Option<()> {
        self.list_remove(freq, id)?;
        if self.bucket_is_empty(freq) {
            let (prev, next) = {
                let bucket = self.buckets.get(&freq)?;
                (bucket.prev, bucket.next)
            };
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }
        Some(())
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .is_none_or(|bucket| bucket.head.is_none())
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev_bucket) = prev.and_then(|p| self.buckets.get_mut(&p)) {
            prev_bucket.next = Some(freq);
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(&n)) {
            next_bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev_bucket) = prev.and_then(|p| self.buckets.get_mut(&p)) {
            prev_bucket.next = next;
        }
        if let Some(next_bucket) = next.and_then(|n| self.buckets.get_mut(&n)) {
            next_bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };

        let old_head = bucket.head;
        if let Some(node) = self.entries.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|head| self.entries.get_mut(head)) {
            Some(node) => node.prev = Some(id),
            None => bucket.tail = Some(id),
        }
        bucket.head = Some(id);
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.entries.get(id)?;
            (node.prev, node.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        match prev.and_then(|p| self.entries.get_mut(p)) {
            Some(node) => node.next = next,
            None => bucket.head = next,
        }
        match next.and_then(|n| self.entries.get_mut(n)) {
            Some(node) => node.prev = prev,
            None => bucket.tail = prev,
        }

        if let Some(node) = self.entries.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }
}

impl<T> Default for FrequencyBuckets<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(SlotId, &T, freq)` in eviction order.
pub struct EvictionOrderIter<'a, T> {
    buckets: &'a FrequencyBuckets<T>,
    bucket: Option<u64>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for EvictionOrderIter<'a, T> {
    type Item = (SlotId, &'a T, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current {
                let node = self.buckets.entries.get(id)?;
                self.current = node.prev;
                return Some((id, &node.value, node.freq));
            }
            let bucket = self.buckets.buckets.get(&self.bucket?)?;
            self.current = bucket.tail;
            self.bucket = bucket.next;
        }
    }
}
