//! The parameterized skip-list engine.
//!
//! A `SkipIndex` is a singly linked base chain of entries in key order,
//! starting at a keyless sentinel, with a stack of sparser index levels
//! above it. Each index node points right along its level and down to the
//! node for the same entry one level lower; level 1 nodes point down to
//! nothing and reference the base entry directly.
//!
//! Every non-head index node carries the augmentation of its span, the
//! live entries after its left neighbour's entry up to and including its
//! own. Insert and delete patch those values bottom-up on the search path,
//! so each level is exact by the time the level above it is repaired.
//!
//! Entries and nodes live in two arenas addressed by `u32` handles. The
//! base chain and the index levels never share ownership: an index node
//! only counts towards its entry's `refs`, and an entry slot is reused once
//! it is both unlinked from the base chain and unreferenced.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use rand_core::RngCore;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::augment::Augment;
use crate::config::Config;
use crate::config::Duplicates;
use crate::config::Sweep;
use crate::error::IndexError;
use crate::error::IndexResult;
use crate::level::XorShift;
use crate::level::level_for;

pub(crate) mod arena;
pub(crate) mod walk;

use arena::Arena;
use arena::Entry;
use arena::Head;
use arena::Idx;
use arena::IndexNode;
use arena::NULL;
use arena::SENTINEL;
pub(crate) use walk::Landing;
pub(crate) use walk::Path;
pub(crate) use walk::Step;

/// A key comparator.
pub type Order<K> = fn(&K, &K) -> Ordering;

/// A skip list over `(K, P)` entries whose index nodes carry the
/// augmentation `A`.
pub struct SkipIndex<K, P, A: Augment<K, P>> {
    entries: Arena<Entry<K, P>>,
    nodes: Arena<IndexNode<A::Value>>,
    head: Head,
    len: usize,
    order: Order<K>,
    rng: Box<dyn RngCore + Send + Sync>,
    duplicates: Duplicates,
    config: Config,
    _augment: PhantomData<fn() -> A>,
}

impl<K: Ord, P, A: Augment<K, P>> SkipIndex<K, P, A> {
    /// An empty index ordered by `K`'s `Ord`, with the default config.
    pub fn new(duplicates: Duplicates) -> SkipIndex<K, P, A> {
        return SkipIndex::build(
            <K as Ord>::cmp,
            duplicates,
            Config::default(),
            Box::new(XorShift::from_entropy()),
        );
    }
}

impl<K, P, A: Augment<K, P>> SkipIndex<K, P, A> {
    /// An empty index with a custom comparator. The level source is seeded
    /// from `config.seed`, or from the operating system when unset.
    pub fn with_order(order: Order<K>, duplicates: Duplicates, config: Config) -> IndexResult<SkipIndex<K, P, A>> {
        let rng = match config.seed {
            Some(seed) => XorShift::new(seed),
            None => XorShift::from_entropy(),
        };
        return SkipIndex::with_rng(order, duplicates, config, rng);
    }

    /// An empty index drawing levels from `rng`. Only the low 32 bits of
    /// each draw matter; see [`crate::level::level_for`].
    pub fn with_rng<R>(order: Order<K>, duplicates: Duplicates, config: Config, rng: R) -> IndexResult<SkipIndex<K, P, A>>
    where
        R: RngCore + Send + Sync + 'static,
    {
        if config.sweep == Sweep::Deferred && !A::TOLERATES_TOMBSTONES {
            return Err(IndexError::UnsupportedSweep { strategy: A::NAME });
        }
        return Ok(SkipIndex::build(order, duplicates, config, Box::new(rng)));
    }

    fn build(
        order: Order<K>,
        duplicates: Duplicates,
        config: Config,
        rng: Box<dyn RngCore + Send + Sync>,
    ) -> SkipIndex<K, P, A> {
        let mut entries = Arena::new();
        let sentinel = entries.alloc(Entry::sentinel());
        debug_assert_eq!(sentinel, SENTINEL);

        let mut nodes = Arena::new();
        let head = nodes.alloc(IndexNode {
            entry: SENTINEL,
            down: NULL,
            right: NULL,
            value: A::identity(),
        });

        return SkipIndex {
            entries,
            nodes,
            head: Head { node: head, level: 1 },
            len: 0,
            order,
            rng,
            duplicates,
            config,
            _augment: PhantomData,
        };
    }

    // --- accessors ---

    /// Number of live entries.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of index levels above the base chain. Never below 1.
    pub fn height(&self) -> usize {
        return self.head.level;
    }

    pub fn config(&self) -> &Config {
        return &self.config;
    }

    pub fn duplicates(&self) -> Duplicates {
        return self.duplicates;
    }

    /// Live entries in key order.
    pub fn iter(&self) -> Iter<'_, K, P, A> {
        return Iter {
            index: self,
            at: SENTINEL,
        };
    }

    // --- crate-internal views used by the queries ---

    #[inline]
    pub(crate) fn compare(&self, a: &K, b: &K) -> Ordering {
        return (self.order)(a, b);
    }

    #[inline]
    pub(crate) fn head(&self) -> Head {
        return self.head;
    }

    #[inline]
    pub(crate) fn node(&self, idx: Idx) -> &IndexNode<A::Value> {
        return self.nodes.get(idx);
    }

    #[inline]
    fn node_mut(&mut self, idx: Idx) -> &mut IndexNode<A::Value> {
        return self.nodes.get_mut(idx);
    }

    #[inline]
    pub(crate) fn entry(&self, idx: Idx) -> &Entry<K, P> {
        return self.entries.get(idx);
    }

    #[inline]
    fn entry_mut(&mut self, idx: Idx) -> &mut Entry<K, P> {
        return self.entries.get_mut(idx);
    }

    /// Key of a live or tombstoned entry. Never called on the sentinel.
    #[inline]
    pub(crate) fn key(&self, idx: Idx) -> &K {
        let (key, _) = self
            .entry(idx)
            .item
            .as_ref()
            .expect("keyed entry slot is occupied");
        return key;
    }

    #[inline]
    pub(crate) fn item(&self, idx: Idx) -> Option<(&K, &P)> {
        return self.entry(idx).item.as_ref().map(|(k, p)| (k, p));
    }

    /// The first node right of `idx` whose entry is not tombstoned.
    #[inline]
    pub(crate) fn live_right(&self, idx: Idx) -> Idx {
        let mut r = self.node(idx).right;
        while r != NULL && self.entry(self.node(r).entry).deleted {
            r = self.node(r).right;
        }
        return r;
    }

    /// The next base entry after `idx` that is not tombstoned.
    #[inline]
    pub(crate) fn live_next(&self, idx: Idx) -> Idx {
        let mut e = self.entry(idx).next;
        while e != NULL && self.entry(e).deleted {
            e = self.entry(e).next;
        }
        return e;
    }

    // --- span arithmetic ---

    /// Fold of the live base entries in `(from, to]`.
    fn fold_base(&self, from: Idx, to: Idx) -> A::Value {
        let mut acc = A::identity();
        let mut e = self.entry(from).next;
        while e != NULL {
            let entry = self.entry(e);
            if !entry.deleted {
                if let Some((key, payload)) = entry.item.as_ref() {
                    acc = A::combine(&acc, &A::of(key, payload));
                }
            }
            if e == to {
                break;
            }
            e = entry.next;
        }
        return acc;
    }

    /// The span value between two nodes of one level, recomputed from the
    /// level below, which must already be exact.
    fn compose(&self, from: Idx, to: Idx) -> A::Value {
        let from_node = self.node(from);
        if from_node.down == NULL {
            return self.fold_base(from_node.entry, self.node(to).entry);
        }

        let stop = self.node(to).down;
        let mut acc = A::identity();
        let mut x = from_node.down;
        loop {
            x = self.node(x).right;
            if x == NULL {
                break;
            }
            acc = A::combine(&acc, &self.node(x).value);
            if x == stop {
                break;
            }
        }
        return acc;
    }

    // --- insert ---

    /// Insert an entry. Returns `Ok(false)` only when the duplicate policy
    /// is `Reject` and an equal key is already present. A payload the
    /// strategy refuses is an error and leaves the index untouched.
    pub fn insert(&mut self, key: K, payload: P) -> IndexResult<bool> {
        A::admit(&payload)?;
        return Ok(self.link(key, payload));
    }

    /// Insert a payload the strategy has already admitted.
    pub(crate) fn link(&mut self, key: K, payload: P) -> bool {
        if self.config.sweep == Sweep::Deferred {
            self.sweep_path(&key);
        }

        let mut path = Path::new();
        let order = self.order;
        let landing = self.walk_path(&mut path, |k, _| {
            if order(&key, k) == Ordering::Greater { Step::Right } else { Step::Down }
        });

        // Find the base predecessor, clearing tombstones on the way.
        let mut b = self.node(landing.node).entry;
        loop {
            let n = self.entry(b).next;
            if n == NULL {
                break;
            }
            if self.entry(n).deleted {
                self.unlink_base(b, n);
                continue;
            }
            match order(&key, self.key(n)) {
                Ordering::Greater => b = n,
                Ordering::Equal if self.duplicates == Duplicates::Reject => return false,
                _ => break,
            }
        }

        let next = self.entry(b).next;
        let z = self.entries.alloc(Entry::new(key, payload, next));
        self.entry_mut(b).next = z;
        self.len += 1;

        // Every span that now covers z grows by one entry.
        let single = match self.entry(z).item.as_ref() {
            Some((k, p)) => A::of(k, p),
            None => A::identity(),
        };
        for level in 1..=self.head.level {
            let r = self.node(path[level]).right;
            if r != NULL {
                let grown = A::combine(&self.node(r).value, &single);
                self.node_mut(r).value = grown;
            }
        }

        let drawn = level_for(self.rng.next_u32());
        let Some(mut level) = drawn else {
            trace_log!(len = self.len, "insert unindexed");
            self.debug_validate();
            return true;
        };
        if level > self.head.level {
            level = self.head.level + 1;
            self.grow(&mut path);
        }

        let mut below = NULL;
        for lv in 1..=level {
            let q = path[lv];
            let s = self.node(q).right;
            let node = self.nodes.alloc(IndexNode {
                entry: z,
                down: below,
                right: s,
                value: A::identity(),
            });
            let value = self.compose(q, node);
            self.node_mut(node).value = value;
            self.node_mut(q).right = node;
            self.entry_mut(z).refs += 1;

            if s != NULL {
                let shrunk = match A::retract(&self.node(s).value, &self.node(node).value) {
                    Some(v) => v,
                    None => self.compose(node, s),
                };
                self.node_mut(s).value = shrunk;
            }
            below = node;
        }

        trace_log!(tower = level, len = self.len, "insert");
        self.debug_validate();
        return true;
    }

    /// Add one empty level on top of the head and record it in `path`.
    fn grow(&mut self, path: &mut Path) {
        let top = self.nodes.alloc(IndexNode {
            entry: SENTINEL,
            down: self.head.node,
            right: NULL,
            value: A::identity(),
        });
        self.head = Head {
            node: top,
            level: self.head.level + 1,
        };
        path.push(top);
        debug_log!(height = self.head.level, "head grew");
    }

    // --- delete ---

    /// Remove the first entry equal to `key`. Returns `false` if there is
    /// none.
    pub fn delete(&mut self, key: &K) -> bool {
        let removed = match self.config.sweep {
            Sweep::Eager => self.delete_eager(key),
            Sweep::Deferred => self.delete_deferred(key),
        };
        if removed {
            self.try_reduce_level();
            trace_log!(len = self.len, "delete");
        }
        self.debug_validate();
        return removed;
    }

    fn delete_eager(&mut self, key: &K) -> bool {
        let mut path = Path::new();
        let order = self.order;
        let landing = self.walk_path(&mut path, |k, _| {
            if order(key, k) == Ordering::Greater { Step::Right } else { Step::Down }
        });

        let mut b = self.node(landing.node).entry;
        let target = loop {
            let n = self.entry(b).next;
            if n == NULL {
                return false;
            }
            match order(key, self.key(n)) {
                Ordering::Greater => b = n,
                Ordering::Equal => break n,
                Ordering::Less => return false,
            }
        };

        let single = match self.entry(target).item.as_ref() {
            Some((k, p)) => A::of(k, p),
            None => A::identity(),
        };
        let after = self.entry(target).next;
        self.entry_mut(b).next = after;
        let entry = self.entry_mut(target);
        entry.deleted = true;
        entry.detached = true;
        self.len -= 1;

        // Bottom-up, so `compose` always reads an exact lower level.
        for level in 1..=self.head.level {
            let q = path[level];
            let r = self.node(q).right;
            if r == NULL {
                continue;
            }

            if self.node(r).entry == target {
                let s = self.node(r).right;
                if s != NULL {
                    let merged = match A::retract(&self.node(r).value, &single) {
                        Some(rest) => A::combine(&rest, &self.node(s).value),
                        None => self.compose(q, s),
                    };
                    self.node_mut(s).value = merged;
                }
                self.node_mut(q).right = s;
                self.release_node(r);
            } else {
                let shrunk = match A::retract(&self.node(r).value, &single) {
                    Some(v) => v,
                    None => self.compose(q, r),
                };
                self.node_mut(r).value = shrunk;
            }
        }

        self.release_entry(target);
        return true;
    }

    fn delete_deferred(&mut self, key: &K) -> bool {
        self.sweep_path(key);

        let mut path = Path::new();
        let order = self.order;
        let landing = self.walk_path(&mut path, |k, _| {
            if order(key, k) == Ordering::Greater { Step::Right } else { Step::Down }
        });

        let mut b = self.node(landing.node).entry;
        loop {
            let n = self.entry(b).next;
            if n == NULL {
                return false;
            }
            if self.entry(n).deleted {
                self.unlink_base(b, n);
                continue;
            }
            match order(key, self.key(n)) {
                Ordering::Greater => b = n,
                Ordering::Equal => {
                    self.entry_mut(n).deleted = true;
                    self.len -= 1;
                    return true;
                }
                Ordering::Less => return false,
            }
        }
    }

    /// Unlink every tombstoned index node met on the search path for `key`.
    fn sweep_path(&mut self, key: &K) {
        let mut q = self.head.node;
        loop {
            let r = self.node(q).right;
            if r != NULL {
                let e = self.node(r).entry;
                if self.entry(e).deleted {
                    let s = self.node(r).right;
                    self.node_mut(q).right = s;
                    self.release_node(r);
                    self.release_entry(e);
                    continue;
                }
                if (self.order)(key, self.key(e)) == Ordering::Greater {
                    q = r;
                    continue;
                }
            }
            let down = self.node(q).down;
            if down == NULL {
                return;
            }
            q = down;
        }
    }

    /// Unlink tombstoned entry `n` that follows `b` in the base chain.
    fn unlink_base(&mut self, b: Idx, n: Idx) {
        let next = self.entry(n).next;
        self.entry_mut(b).next = next;
        self.entry_mut(n).detached = true;
        self.release_entry(n);
    }

    fn release_node(&mut self, idx: Idx) {
        let e = self.node(idx).entry;
        let entry = self.entry_mut(e);
        entry.refs -= 1;
        self.nodes.free(idx);
    }

    fn release_entry(&mut self, idx: Idx) {
        if self.entry(idx).is_reclaimable() {
            self.entry_mut(idx).item = None;
            self.entries.free(idx);
        }
    }

    /// Drop the top level when it and the two below it are empty and the
    /// height is above the configured floor.
    fn try_reduce_level(&mut self) {
        if self.head.level <= self.config.reduce_floor {
            return;
        }
        let top = self.head.node;
        let second = self.node(top).down;
        let third = self.node(second).down;
        if self.node(top).right != NULL || self.node(second).right != NULL || self.node(third).right != NULL {
            return;
        }
        self.head = Head {
            node: second,
            level: self.head.level - 1,
        };
        self.nodes.free(top);
        debug_log!(height = self.head.level, "head reduced");
    }

    // --- validation ---

    /// Check every structural invariant, recomputing each span value from
    /// the base chain. Linear in the size of the index.
    pub fn validate(&self) -> IndexResult<()> {
        let tolerant = A::TOLERATES_TOMBSTONES;

        // Base chain.
        let mut position: FxHashMap<Idx, usize> = FxHashMap::default();
        position.insert(SENTINEL, 0);
        let mut live = 0;
        let mut last_live: Option<Idx> = None;
        let mut steps = 0;
        let mut e = self.entry(SENTINEL).next;
        while e != NULL {
            steps += 1;
            if steps > self.entries.live() {
                return Err(IndexError::corrupted("base chain has a cycle"));
            }
            let entry = self.entry(e);
            if entry.item.is_none() {
                return Err(IndexError::corrupted(format!("freed entry {e} in base chain")));
            }
            if entry.detached {
                return Err(IndexError::corrupted(format!("detached entry {e} in base chain")));
            }
            if entry.deleted && !tolerant {
                return Err(IndexError::corrupted(format!("tombstone {e} left in base chain")));
            }
            position.insert(e, steps);
            if !entry.deleted {
                if let Some(p) = last_live {
                    match self.compare(self.key(p), self.key(e)) {
                        Ordering::Greater => {
                            return Err(IndexError::corrupted(format!("base chain out of order at {e}")));
                        }
                        Ordering::Equal if self.duplicates == Duplicates::Reject => {
                            return Err(IndexError::corrupted(format!("duplicate key at {e}")));
                        }
                        _ => {}
                    }
                }
                last_live = Some(e);
                live += 1;
            }
            e = entry.next;
        }
        if live != self.len {
            return Err(IndexError::corrupted(format!("len is {} but base chain holds {live}", self.len)));
        }

        // Head chain, collected bottom-up.
        let mut heads = Vec::with_capacity(self.head.level);
        let mut h = self.head.node;
        for _ in 0..self.head.level {
            if h == NULL {
                return Err(IndexError::corrupted("head chain shorter than height"));
            }
            if self.node(h).entry != SENTINEL {
                return Err(IndexError::corrupted(format!("head node {h} does not index the sentinel")));
            }
            heads.push(h);
            h = self.node(h).down;
        }
        if h != NULL {
            return Err(IndexError::corrupted("head chain longer than height"));
        }
        heads.reverse();

        // Index levels, bottom-up.
        let mut refs: FxHashMap<Idx, usize> = FxHashMap::default();
        let mut below: FxHashSet<Idx> = FxHashSet::default();
        let mut node_count = 0;
        for (i, &head) in heads.iter().enumerate() {
            let level = i + 1;
            let mut members: FxHashSet<Idx> = FxHashSet::default();
            members.insert(head);
            node_count += 1;

            let mut last_pos = 0;
            let mut left_entry = SENTINEL;
            let mut n = self.node(head).right;
            while n != NULL {
                if members.contains(&n) {
                    return Err(IndexError::corrupted(format!("level {level} has a cycle")));
                }
                let node = self.node(n);
                members.insert(n);
                node_count += 1;
                *refs.entry(node.entry).or_default() += 1;

                if level == 1 {
                    if node.down != NULL {
                        return Err(IndexError::corrupted(format!("level 1 node {n} points down")));
                    }
                } else if !below.contains(&node.down) || self.node(node.down).entry != node.entry {
                    return Err(IndexError::corrupted(format!("node {n} at level {level} has no tower below it")));
                }

                if self.entry(node.entry).deleted {
                    if !tolerant {
                        return Err(IndexError::corrupted(format!("node {n} indexes a deleted entry")));
                    }
                    n = node.right;
                    continue;
                }

                let Some(&pos) = position.get(&node.entry) else {
                    return Err(IndexError::corrupted(format!("node {n} indexes an entry outside the base chain")));
                };
                if pos <= last_pos {
                    return Err(IndexError::corrupted(format!("level {level} out of order at node {n}")));
                }
                let expected = self.fold_base(left_entry, node.entry);
                if !A::same(&expected, &node.value) {
                    return Err(IndexError::corrupted(format!(
                        "node {n} at level {level} holds {:?}, span is {:?}",
                        node.value, expected
                    )));
                }
                last_pos = pos;
                left_entry = node.entry;
                n = node.right;
            }

            let head_down = self.node(head).down;
            if (level == 1 && head_down != NULL) || (level > 1 && !below.contains(&head_down)) {
                return Err(IndexError::corrupted(format!("head at level {level} is not above the head below")));
            }
            below = members;
        }
        if node_count != self.nodes.live() {
            return Err(IndexError::corrupted(format!(
                "{} node slots in use but {node_count} linked",
                self.nodes.live()
            )));
        }

        // Reference counts.
        for (&e, &count) in &refs {
            if self.entry(e).refs as usize != count {
                return Err(IndexError::corrupted(format!(
                    "entry {e} counts {} refs but {count} nodes index it",
                    self.entry(e).refs
                )));
            }
        }
        let mut held = position.len();
        for &e in position.keys() {
            if !refs.contains_key(&e) && self.entry(e).refs != 0 {
                return Err(IndexError::corrupted(format!("entry {e} has refs but no index node")));
            }
        }
        for e in refs.keys() {
            if !position.contains_key(e) {
                held += 1;
            }
        }
        if held != self.entries.live() {
            return Err(IndexError::corrupted(format!(
                "{} entry slots in use but {held} reachable",
                self.entries.live()
            )));
        }

        return Ok(());
    }

    #[cfg(test)]
    fn debug_validate(&self) {
        if let Err(err) = self.validate() {
            panic!("{err}");
        }
    }

    #[cfg(not(test))]
    #[inline(always)]
    fn debug_validate(&self) {}
}

impl<K: fmt::Debug, P: fmt::Debug, A: Augment<K, P>> fmt::Debug for SkipIndex<K, P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("SkipIndex")
            .field("strategy", &A::NAME)
            .field("len", &self.len)
            .field("height", &self.head.level)
            .field("entries", &DebugEntries(self))
            .finish();
    }
}

struct DebugEntries<'a, K, P, A: Augment<K, P>>(&'a SkipIndex<K, P, A>);

impl<K: fmt::Debug, P: fmt::Debug, A: Augment<K, P>> fmt::Debug for DebugEntries<'_, K, P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.0.iter()).finish();
    }
}

/// In-order iterator over live entries.
pub struct Iter<'a, K, P, A: Augment<K, P>> {
    index: &'a SkipIndex<K, P, A>,
    at: Idx,
}

impl<'a, K, P, A: Augment<K, P>> Iterator for Iter<'a, K, P, A> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        if self.at == NULL {
            return None;
        }
        self.at = self.index.live_next(self.at);
        if self.at == NULL {
            return None;
        }
        return self.index.item(self.at);
    }
}
