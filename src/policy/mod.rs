//! Eviction orderings and the runtime policy selector.
//!
//! [`LruOrder`](lru::LruOrder) and [`LfuOrder`](lfu::LfuOrder) implement
//! [`EvictionOrder`] directly and can be plugged into
//! [`ConcurrentCache::with_order`](crate::concurrent::ConcurrentCache::with_order)
//! for static dispatch. [`PolicyOrder`] wraps either one behind a single type so
//! the policy can be picked at construction time.

pub mod lfu;
pub mod lru;

use std::fmt;

use crate::ds::SlotId;
use crate::entry::Entry;
use crate::traits::{EntryIter, EvictionOrder};

use self::lfu::LfuOrder;
use self::lru::LruOrder;

/// Upper bound on the entries reserved up front; larger caches grow on demand.
pub const MAX_PREALLOC: usize = 4096;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Least Frequently Used eviction, least recently used among ties.
    Lfu,
}

impl CachePolicy {
    pub fn name(self) -> &'static str {
        match self {
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordering chosen at runtime from a [`CachePolicy`].
#[derive(Debug)]
pub enum PolicyOrder<K, V> {
    Lru(LruOrder<K, V>),
    Lfu(LfuOrder<K, V>),
}

impl<K, V> PolicyOrder<K, V> {
    /// Creates the ordering for `policy`, reserving room for up to
    /// [`MAX_PREALLOC`] of its `capacity` entries.
    pub fn new(policy: CachePolicy, capacity: usize) -> Self {
        let capacity = capacity.min(MAX_PREALLOC);
        match policy {
            CachePolicy::Lru => PolicyOrder::Lru(LruOrder::with_capacity(capacity)),
            CachePolicy::Lfu => PolicyOrder::Lfu(LfuOrder::with_capacity(capacity)),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        match self {
            PolicyOrder::Lru(_) => CachePolicy::Lru,
            PolicyOrder::Lfu(_) => CachePolicy::Lfu,
        }
    }
}

impl<K, V> EvictionOrder<K, V> for PolicyOrder<K, V> {
    fn len(&self) -> usize {
        match self {
            PolicyOrder::Lru(lru) => lru.len(),
            PolicyOrder::Lfu(lfu) => lfu.len(),
        }
    }

    fn insert(&mut self, entry: Entry<K, V>) -> SlotId {
        match self {
            PolicyOrder::Lru(lru) => lru.insert(entry),
            PolicyOrder::Lfu(lfu) => lfu.insert(entry),
        }
    }

    fn touch(&mut self, id: SlotId) -> bool {
        match self {
            PolicyOrder::Lru(lru) => lru.touch(id),
            PolicyOrder::Lfu(lfu) => lfu.touch(id),
        }
    }

    fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        match self {
            PolicyOrder::Lru(lru) => lru.get(id),
            PolicyOrder::Lfu(lfu) => lfu.get(id),
        }
    }

    fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        match self {
            PolicyOrder::Lru(lru) => lru.get_mut(id),
            PolicyOrder::Lfu(lfu) => lfu.get_mut(id),
        }
    }

    fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        match self {
            PolicyOrder::Lru(lru) => lru.remove(id),
            PolicyOrder::Lfu(lfu) => lfu.remove(id),
        }
    }

    fn peek_victim(&self) -> Option<(SlotId, &Entry<K, V>)> {
        match self {
            PolicyOrder::Lru(lru) => lru.peek_victim(),
            PolicyOrder::Lfu(lfu) => lfu.peek_victim(),
        }
    }

    fn pop_victim(&mut self) -> Option<Entry<K, V>> {
        match self {
            PolicyOrder::Lru(lru) => lru.pop_victim(),
            PolicyOrder::Lfu(lfu) => lfu.pop_victim(),
        }
    }

    fn frequency(&self, id: SlotId) -> Option<u64> {
        match self {
            PolicyOrder::Lru(lru) => lru.frequency(id),
            PolicyOrder::Lfu(lfu) => lfu.frequency(id),
        }
    }

    fn iter(&self) -> EntryIter<'_, K, V> {
        match self {
            PolicyOrder::Lru(lru) => lru.iter(),
            PolicyOrder::Lfu(lfu) => lfu.iter(),
        }
    }

    fn on_resize(&mut self, capacity: usize) {
        match self {
            PolicyOrder::Lru(lru) => lru.on_resize(capacity),
            PolicyOrder::Lfu(lfu) => lfu.on_resize(capacity),
        }
    }

    fn clear(&mut self) {
        match self {
            PolicyOrder::Lru(lru) => lru.clear(),
            PolicyOrder::Lfu(lfu) => lfu.clear(),
        }
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        match self {
            PolicyOrder::Lru(lru) => lru.debug_validate_invariants(),
            PolicyOrder::Lfu(lfu) => lfu.debug_validate_invariants(),
        }
    }
}
