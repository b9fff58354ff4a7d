//! Shared helpers for the integration tests.

#![allow(dead_code)]

use ordex::RangeAggregate;
use proptest::prelude::*;

/// One mutation against an index under test.
#[derive(Clone, Debug)]
pub enum Op {
    Insert(i32),
    Delete(i32),
}

/// Inserts and deletes over a small key space, so deletes often hit and
/// duplicates are common.
pub fn ops(keys: i32, len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (0..keys).prop_map(Op::Insert),
        2 => (0..keys).prop_map(Op::Delete),
    ];
    return prop::collection::vec(op, 0..len);
}

/// A sorted vector kept in the same order as a stack-policy index: a new
/// duplicate goes before the existing copies.
#[derive(Clone, Debug, Default)]
pub struct Model<T> {
    pub items: Vec<(i32, T)>,
}

impl<T: Clone> Model<T> {
    pub fn insert(&mut self, key: i32, value: T) {
        let at = self.items.partition_point(|(k, _)| *k < key);
        self.items.insert(at, (key, value));
    }

    pub fn delete(&mut self, key: i32) -> bool {
        let at = self.items.partition_point(|(k, _)| *k < key);
        if at < self.items.len() && self.items[at].0 == key {
            self.items.remove(at);
            return true;
        }
        return false;
    }

    pub fn keys(&self) -> Vec<i32> {
        return self.items.iter().map(|(k, _)| *k).collect();
    }
}

/// Linear-scan aggregate of `[lo, hi]`.
pub fn scan_aggregate(items: &[(i32, f64)], lo: i32, hi: i32) -> RangeAggregate {
    let mut acc = RangeAggregate::EMPTY;
    for &(key, value) in items {
        if lo <= key && key <= hi {
            acc = acc.merge(&RangeAggregate::single(value));
        }
    }
    return acc;
}
