//! Arena storage for entries and index nodes.
//!
//! Links between entries and index nodes are `u32` slot handles rather than
//! pointers. The base chain owns its entries and each index level owns the
//! nodes linked into it; the entry handle an index node holds is a plain
//! reference with no ownership attached. Freed slots go on a free list and
//! are reused by the next allocation.

/// Slot handle. u32 saves space vs usize on 64-bit.
pub(crate) type Idx = u32;

/// Null handle marker.
pub(crate) const NULL: Idx = Idx::MAX;

/// Slot of the base-chain sentinel. It has no key and is never removed.
pub(crate) const SENTINEL: Idx = 0;

/// One stored key and payload in the base chain.
pub(crate) struct Entry<K, P> {
    /// `None` for the sentinel and for freed slots.
    pub item: Option<(K, P)>,
    /// Next entry in key order.
    pub next: Idx,
    /// Logically deleted.
    pub deleted: bool,
    /// Physically unlinked from the base chain.
    pub detached: bool,
    /// Number of index nodes still referencing this entry.
    pub refs: u8,
}

impl<K, P> Entry<K, P> {
    pub fn new(key: K, payload: P, next: Idx) -> Entry<K, P> {
        return Entry {
            item: Some((key, payload)),
            next,
            deleted: false,
            detached: false,
            refs: 0,
        };
    }

    pub fn sentinel() -> Entry<K, P> {
        return Entry {
            item: None,
            next: NULL,
            deleted: false,
            detached: false,
            refs: 0,
        };
    }

    /// Whether the slot can be handed back to the arena.
    pub fn is_reclaimable(&self) -> bool {
        return self.detached && self.refs == 0;
    }
}

/// A shortcut at some level above the base chain.
pub(crate) struct IndexNode<V> {
    /// The entry this node indexes.
    pub entry: Idx,
    /// The node for the same entry one level down, or `NULL` at level 1.
    pub down: Idx,
    /// Next node at the same level.
    pub right: Idx,
    /// Augmentation over the span ending at `entry`.
    pub value: V,
}

/// Entry point of the topmost level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Head {
    /// Head index node of the top level. Its `down` chain reaches the head
    /// of every lower level; all of them index the sentinel.
    pub node: Idx,
    /// Number of index levels (at least 1).
    pub level: usize,
}

/// A vector of slots with a free list.
pub(crate) struct Arena<T> {
    slots: Vec<T>,
    free: Vec<Idx>,
}

impl<T> Arena<T> {
    pub fn new() -> Arena<T> {
        return Arena {
            slots: Vec::new(),
            free: Vec::new(),
        };
    }

    pub fn alloc(&mut self, value: T) -> Idx {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = value;
            return idx;
        }
        let idx = self.slots.len() as Idx;
        debug_assert!(idx != NULL, "arena exhausted");
        self.slots.push(value);
        return idx;
    }

    /// Return a slot to the free list. The caller has already cleared
    /// anything the slot owned.
    pub fn free(&mut self, idx: Idx) {
        self.free.push(idx);
    }

    #[inline]
    pub fn get(&self, idx: Idx) -> &T {
        return &self.slots[idx as usize];
    }

    #[inline]
    pub fn get_mut(&mut self, idx: Idx) -> &mut T {
        return &mut self.slots[idx as usize];
    }

    /// Slots currently in use.
    pub fn live(&self) -> usize {
        return self.slots.len() - self.free.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_freed_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.live(), 2);
        arena.free(a);
        assert_eq!(arena.live(), 1);
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(*arena.get(c), 3);
        assert_eq!(*arena.get(b), 2);
    }

    #[test]
    fn entry_reclaimable_only_when_detached_and_unreferenced() {
        let mut entry: Entry<u8, ()> = Entry::new(1, (), NULL);
        assert!(!entry.is_reclaimable());
        entry.detached = true;
        entry.refs = 1;
        assert!(!entry.is_reclaimable());
        entry.refs = 0;
        assert!(entry.is_reclaimable());
    }
}
