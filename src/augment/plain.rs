//! No augmentation: a plain ordered set.

use super::Augment;

/// Index nodes carry nothing; the index only accelerates search.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl<K, P> Augment<K, P> for Plain {
    type Value = ();

    const NAME: &'static str = "plain";
    const TOLERATES_TOMBSTONES: bool = true;

    fn identity() {}

    fn of(_key: &K, _payload: &P) {}

    fn combine(_left: &(), _right: &()) {}

    fn retract(_whole: &(), _part: &()) -> Option<()> {
        return Some(());
    }

    fn same(_a: &(), _b: &()) -> bool {
        return true;
    }
}
