//! The four index variants.
//!
//! Each is a thin wrapper over a `SkipIndex` that fixes the augmentation,
//! the payload type and the duplicate policy, and exposes only the queries
//! that augmentation can answer.

mod interval_set;
mod ordered_set;
mod range_map;
mod ranked_list;

pub use interval_set::IntervalSet;
pub use ordered_set::OrderedSet;
pub use range_map::RangeAggregateMap;
pub use ranked_list::RankedList;
