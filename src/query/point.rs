//! Membership and lookup. Works with every strategy.

use std::cmp::Ordering;

use crate::augment::Augment;
use crate::engine::SkipIndex;
use crate::engine::Step;
use crate::engine::arena::NULL;

impl<K, P, A: Augment<K, P>> SkipIndex<K, P, A> {
    /// The first live entry equal to `key`. Under the stack duplicate
    /// policy that is the most recently inserted one.
    pub fn search(&self, key: &K) -> Option<(&K, &P)> {
        let landing = self.walk(|k, _| {
            if self.compare(key, k) == Ordering::Greater { Step::Right } else { Step::Down }
        });

        let mut e = self.node(landing.node).entry;
        loop {
            e = self.live_next(e);
            if e == NULL {
                return None;
            }
            match self.compare(key, self.key(e)) {
                Ordering::Greater => continue,
                Ordering::Equal => return self.item(e),
                Ordering::Less => return None,
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        return self.search(key).is_some();
    }
}
