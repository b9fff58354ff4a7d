//! A plain ordered set.

use std::fmt;

use rand_core::RngCore;

use crate::augment::Plain;
use crate::config::Config;
use crate::config::Duplicates;
use crate::engine::Order;
use crate::engine::SkipIndex;
use crate::error::IndexResult;

/// An ordered set of unique keys. The only variant that accepts deferred
/// sweeping.
pub struct OrderedSet<K> {
    inner: SkipIndex<K, (), Plain>,
}

impl<K: Ord> OrderedSet<K> {
    pub fn new() -> OrderedSet<K> {
        return OrderedSet {
            inner: SkipIndex::new(Duplicates::Reject),
        };
    }

    pub fn with_config(config: Config) -> IndexResult<OrderedSet<K>> {
        return OrderedSet::with_order(<K as Ord>::cmp, config);
    }
}

impl<K> OrderedSet<K> {
    pub fn with_order(order: Order<K>, config: Config) -> IndexResult<OrderedSet<K>> {
        let inner = SkipIndex::with_order(order, Duplicates::Reject, config)?;
        return Ok(OrderedSet { inner });
    }

    pub fn with_rng<R>(order: Order<K>, config: Config, rng: R) -> IndexResult<OrderedSet<K>>
    where
        R: RngCore + Send + Sync + 'static,
    {
        let inner = SkipIndex::with_rng(order, Duplicates::Reject, config, rng)?;
        return Ok(OrderedSet { inner });
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: K) -> bool {
        return self.inner.link(key, ());
    }

    pub fn delete(&mut self, key: &K) -> bool {
        return self.inner.delete(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        return self.inner.contains(key);
    }

    /// The stored key equal to `key`.
    pub fn search(&self, key: &K) -> Option<&K> {
        return self.inner.search(key).map(|(k, _)| k);
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

impl<K: Ord> Default for OrderedSet<K> {
    fn default() -> Self {
        return OrderedSet::new();
    }
}

impl<K: Ord> FromIterator<K> for OrderedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for key in iter {
            set.insert(key);
        }
        return set;
    }
}

impl<K: fmt::Debug> fmt::Debug for OrderedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_set().entries(self.iter()).finish();
    }
}
