//! # LRU ordering
//!
//! Recency list for the least-recently-used policy, built on
//! [`IntrusiveList`]. Head is the most recently used entry, tail the victim.
//!
//! ```text
//!   insert(e)      → push at head
//!   touch(id)      → move id to head
//!   pop_victim()   → pop tail
//!   remove(id)     → unlink from anywhere
//!
//!   head (MRU) ─► [k4] ◄──► [k3] ◄──► [k1] ◄── tail (LRU, next victim)
//! ```
//!
//! All operations are O(1) given the entry's `SlotId`; nothing ever scans the
//! list except [`EvictionOrder::iter`], which walks tail to head.
//!
//! ## Example
//!
//! ```
//! use evictkit::entry::Entry;
//! use evictkit::policy::lru::LruOrder;
//! use evictkit::traits::EvictionOrder;
//!
//! let mut order = LruOrder::new();
//! let a = order.insert(Entry::new("a", 1, None));
//! order.insert(Entry::new("b", 2, None));
//!
//! order.touch(a);
//! assert_eq!(order.pop_victim().map(|e| e.key), Some("b"));
//! ```

use crate::ds::{IntrusiveList, SlotId};
use crate::entry::Entry;
use crate::traits::{EntryIter, EvictionOrder};

/// Least-recently-used ordering structure.
#[derive(Debug)]
pub struct LruOrder<K, V> {
    list: IntrusiveList<Entry<K, V>>,
}

impl<K, V> LruOrder<K, V> {
    pub fn new() -> Self {
        Self {
            list: IntrusiveList::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
        }
    }
}

impl<K, V> Default for LruOrder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionOrder<K, V> for LruOrder<K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    fn insert(&mut self, entry: Entry<K, V>) -> SlotId {
        self.list.push_front(entry)
    }

    #[inline]
    fn touch(&mut self, id: SlotId) -> bool {
        self.list.move_to_front(id)
    }

    #[inline]
    fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.list.get(id)
    }

    #[inline]
    fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.list.get_mut(id)
    }

    #[inline]
    fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        self.list.remove(id)
    }

    fn peek_victim(&self) -> Option<(SlotId, &Entry<K, V>)> {
        let id = self.list.back_id()?;
        self.list.get(id).map(|entry| (id, entry))
    }

    #[inline]
    fn pop_victim(&mut self) -> Option<Entry<K, V>> {
        self.list.pop_back()
    }

    fn iter(&self) -> EntryIter<'_, K, V> {
        Box::new(self.list.iter_rev())
    }

    fn on_resize(&mut self, capacity: usize) {
        if self.list.node_capacity() > capacity.saturating_mul(2) {
            self.list.shrink_to_fit();
        }
    }

    fn clear(&mut self) {
        self.list.clear();
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<K: Copy, V>(order: &LruOrder<K, V>) -> Vec<K> {
        order.iter().map(|(_, e)| e.key).collect()
    }

    #[test]
    fn lru_order_evicts_oldest_first() {
        let mut order = LruOrder::new();
        for i in 0..4 {
            order.insert(Entry::new(i, i * 10, None));
        }
        assert_eq!(keys(&order), vec![0, 1, 2, 3]);
        assert_eq!(order.peek_victim().map(|(_, e)| e.key), Some(0));
        assert_eq!(order.pop_victim().map(|e| e.key), Some(0));
        assert_eq!(order.pop_victim().map(|e| e.key), Some(1));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn lru_order_touch_moves_to_mru() {
        let mut order = LruOrder::new();
        let a = order.insert(Entry::new("a", 1, None));
        order.insert(Entry::new("b", 2, None));
        order.insert(Entry::new("c", 3, None));

        assert!(order.touch(a));
        assert_eq!(keys(&order), vec!["b", "c", "a"]);
        assert_eq!(order.frequency(a), None);
    }

    #[test]
    fn lru_order_remove_from_middle() {
        let mut order = LruOrder::new();
        order.insert(Entry::new(1, (), None));
        let b = order.insert(Entry::new(2, (), None));
        order.insert(Entry::new(3, (), None));

        assert_eq!(order.remove(b).map(|e| e.key), Some(2));
        assert!(order.get(b).is_none());
        assert!(!order.touch(b));
        assert_eq!(keys(&order), vec![1, 3]);
        order.debug_validate_invariants();
    }

    #[test]
    fn lru_order_get_mut_and_clear() {
        let mut order = LruOrder::with_capacity(2);
        let id = order.insert(Entry::new("k", 1, None));
        if let Some(entry) = order.get_mut(id) {
            entry.value = 2;
        }
        assert_eq!(order.get(id).map(|e| e.value), Some(2));

        order.on_resize(64);
        assert_eq!(order.get(id).map(|e| e.value), Some(2));

        order.clear();
        assert!(order.is_empty());
        assert!(order.pop_victim().is_none());
    }
}
