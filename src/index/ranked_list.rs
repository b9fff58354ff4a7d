//! A sorted multiset with rank and select.

use std::fmt;

use rand_core::RngCore;

use crate::augment::Distance;
use crate::config::Config;
use crate::config::Duplicates;
use crate::engine::Order;
use crate::engine::SkipIndex;
use crate::error::IndexResult;

/// Keys in sorted order, addressable by 1-based position. Equal keys are
/// kept in stack order: the newest copy ranks first.
pub struct RankedList<K> {
    inner: SkipIndex<K, (), Distance>,
}

impl<K: Ord> RankedList<K> {
    pub fn new() -> RankedList<K> {
        return RankedList {
            inner: SkipIndex::new(Duplicates::Stack),
        };
    }

    pub fn with_config(config: Config) -> IndexResult<RankedList<K>> {
        return RankedList::with_order(<K as Ord>::cmp, config);
    }
}

impl<K> RankedList<K> {
    pub fn with_order(order: Order<K>, config: Config) -> IndexResult<RankedList<K>> {
        let inner = SkipIndex::with_order(order, Duplicates::Stack, config)?;
        return Ok(RankedList { inner });
    }

    pub fn with_rng<R>(order: Order<K>, config: Config, rng: R) -> IndexResult<RankedList<K>>
    where
        R: RngCore + Send + Sync + 'static,
    {
        let inner = SkipIndex::with_rng(order, Duplicates::Stack, config, rng)?;
        return Ok(RankedList { inner });
    }

    pub fn insert(&mut self, key: K) {
        self.inner.link(key, ());
    }

    pub fn delete(&mut self, key: &K) -> bool {
        return self.inner.delete(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        return self.inner.contains(key);
    }

    /// 1-based position of the first copy of `key`.
    pub fn rank(&self, key: &K) -> Option<usize> {
        return self.inner.rank(key);
    }

    /// The key at 1-based position `rank`. `Ok(None)` past the end;
    /// `InvalidRank` for 0.
    pub fn select(&self, rank: usize) -> IndexResult<Option<&K>> {
        return Ok(self.inner.select(rank)?.map(|(k, _)| k));
    }

    /// Number of keys in `[lo, hi]`.
    pub fn count_range(&self, lo: &K, hi: &K) -> IndexResult<usize> {
        return self.inner.count_range(lo, hi);
    }

    pub fn len(&self) -> usize {
        return self.inner.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.inner.is_empty();
    }

    pub fn height(&self) -> usize {
        return self.inner.height();
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        return self.inner.iter().map(|(k, _)| k);
    }

    pub fn validate(&self) -> IndexResult<()> {
        return self.inner.validate();
    }
}

impl<K: Ord> Default for RankedList<K> {
    fn default() -> Self {
        return RankedList::new();
    }
}

impl<K: Ord> FromIterator<K> for RankedList<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut list = RankedList::new();
        for key in iter {
            list.insert(key);
        }
        return list;
    }
}

impl<K: fmt::Debug> fmt::Debug for RankedList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}
