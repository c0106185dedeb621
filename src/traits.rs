//! # Ordering seam
//!
//! [`EvictionOrder`] is the contract between the cache core and a policy's
//! ordering structure. The core owns the `key → SlotId` index and the capacity
//! bound; the ordering structure owns the entries themselves and decides which
//! one goes next.
//!
//! ```text
//!   ┌──────────────────────────────┐        ┌──────────────────────────────┐
//!   │ CacheCore<K, V, O>           │        │ O: EvictionOrder<K, V>       │
//!   │                              │        │                              │
//!   │  index: FxHashMap<K, SlotId> │──id──► │  insert(entry) → SlotId      │
//!   │  capacity                    │        │  touch(id)                   │
//!   │  on_evict                    │        │  get / get_mut / remove(id)  │
//!   │                              │ ◄───── │  pop_victim() → Entry        │
//!   └──────────────────────────────┘        │  iter()  (eviction order)    │
//!                                           └──────────────────────────────┘
//! ```
//!
//! | Implementor | Victim | `touch` |
//! |-------------|--------|---------|
//! | [`LruOrder`](crate::policy::lru::LruOrder) | least recently used | move to MRU |
//! | [`LfuOrder`](crate::policy::lfu::LfuOrder) | lowest frequency, LRU tie-break | frequency + 1 |
//! | [`PolicyOrder`](crate::policy::PolicyOrder) | delegates to one of the above | |
//!
//! Every method is O(1) except `iter`, which is O(n), and `on_resize`, which may
//! release memory.

use std::sync::Arc;

use crate::ds::SlotId;
use crate::entry::{Entry, Expiry};

/// Eviction notification, invoked with the victim's key, value and expiry.
///
/// The callback runs synchronously while the cache lock is held. It must not
/// call back into the same cache and should do only bounded work: every writer
/// waits for it.
///
/// By the time it runs the victim has already been unlinked from the key index
/// and the ordering; it receives the entry's last key, value and expiry. If the
/// callback panics the victim stays removed and the cache remains consistent,
/// but the `add` that triggered the eviction does not insert its entry.
pub type EvictCallback<K, V> = Arc<dyn Fn(&K, &V, Expiry) + Send + Sync>;

/// Iterator over `(SlotId, &Entry)` pairs, least favoured first.
pub type EntryIter<'a, K, V> = Box<dyn Iterator<Item = (SlotId, &'a Entry<K, V>)> + 'a>;

/// Policy-specific ordering of cache entries.
pub trait EvictionOrder<K, V> {
    /// Number of entries held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a new entry in the "just inserted" position and returns its handle.
    fn insert(&mut self, entry: Entry<K, V>) -> SlotId;

    /// Records an access: LRU moves to MRU, LFU bumps the frequency.
    ///
    /// Returns `false` if `id` is not live.
    fn touch(&mut self, id: SlotId) -> bool;

    fn get(&self, id: SlotId) -> Option<&Entry<K, V>>;

    fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>>;

    /// Unlinks `id` from any position.
    fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>>;

    /// The entry `pop_victim` would return.
    fn peek_victim(&self) -> Option<(SlotId, &Entry<K, V>)>;

    /// Unlinks and returns the next victim.
    fn pop_victim(&mut self) -> Option<Entry<K, V>>;

    /// Access frequency of `id`, for orderings that track one.
    fn frequency(&self, _id: SlotId) -> Option<u64> {
        None
    }

    /// Entries in eviction order (the order `pop_victim` would drain them).
    fn iter(&self) -> EntryIter<'_, K, V>;

    /// Called after the cache capacity changed and overflow was evicted.
    ///
    /// The order itself never needs rebuilding; implementations only adjust
    /// reserved storage.
    fn on_resize(&mut self, capacity: usize);

    /// Drops every entry.
    fn clear(&mut self);

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self);
}
