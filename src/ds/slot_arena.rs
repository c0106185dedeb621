//! Slot arena with stable indices.
//!
//! Backing storage for the intrusive structures in [`crate::ds`]. Nodes live in a
//! `Vec<Option<T>>` and are addressed by [`SlotId`]; freed slots are recycled
//! through a free list, so ids stay stable for the lifetime of a node and no
//! node ever owns a pointer to another.
//!
//! A `SlotId` is only meaningful to the arena that issued it. Once a slot is
//! removed its id may be handed out again by a later `insert`, so owners must
//! drop every copy of an id when they remove its slot.

/// Stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its id, reusing a freed slot when one exists.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Frees the slot and returns its value; `None` if the slot is already free.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots allocated without reallocating, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Reserves room so that `additional` more live values fit without growing.
    pub fn reserve(&mut self, additional: usize) {
        let reusable = self.free_list.len();
        if additional > reusable {
            self.slots.reserve(additional - reusable);
        }
    }

    /// Drops every value and forgets all ids.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Releases trailing free slots and excess capacity.
    pub fn shrink_to_fit(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let live_end = self.slots.len();
        self.free_list.retain(|&idx| idx < live_end);
        self.slots.shrink_to_fit();
        self.free_list.shrink_to_fit();
    }

    /// Iterates live slots in index order (not list order).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arena_insert_remove_reuse() {
        let mut arena = SlotArena::new();
        let id1 = arena.insert("a");
        let id2 = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id1), Some(&"a"));
        assert_eq!(arena.get(id2), Some(&"b"));

        assert_eq!(arena.remove(id1), Some("a"));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.remove(id1), None);

        let id3 = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id3), Some(&"c"));
        assert_eq!(id1.index(), id3.index());
    }

    #[test]
    fn slot_arena_shrink_keeps_live_ids() {
        let mut arena = SlotArena::with_capacity(8);
        let ids: Vec<_> = (0..6).map(|i| arena.insert(i)).collect();
        for id in &ids[3..] {
            arena.remove(*id);
        }
        arena.remove(ids[1]);
        arena.shrink_to_fit();

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(ids[0]), Some(&0));
        assert_eq!(arena.get(ids[2]), Some(&2));

        // Slot 1 is still free and gets reused before the vector grows.
        let reused = arena.insert(10);
        assert_eq!(reused, ids[1]);
        let fresh = arena.insert(11);
        assert_eq!(fresh.index(), 3);
    }

    #[test]
    fn slot_arena_iter_skips_free_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        let c = arena.insert('c');
        arena.remove(b);

        let live: Vec<_> = arena.iter().map(|(id, v)| (id, *v)).collect();
        assert_eq!(live, vec![(a, 'a'), (c, 'c')]);
        assert!(!arena.contains(b));

        arena.clear();
        assert!(arena.is_empty());
        assert!(!arena.contains(a));
    }
}
