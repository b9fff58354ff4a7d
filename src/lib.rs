//! Ordex - augmented skip lists for ordered search.
//!
//! One skip-list engine, parameterized by what each index node remembers
//! about the entries it skips over, answers four kinds of query:
//!
//! - [`OrderedSet`]: membership.
//! - [`IntervalSet`]: overlap and stabbing search.
//! - [`RankedList`]: rank and select.
//! - [`RangeAggregateMap`]: count, sum, min and max over a key range.
//!
//! # Quick Start
//!
//! ```
//! use ordex::Interval;
//! use ordex::IntervalSet;
//! use ordex::RangeAggregateMap;
//! use ordex::RankedList;
//!
//! let list: RankedList<u32> = [60, 20, 10, 40].into_iter().collect();
//! assert_eq!(list.rank(&40), Some(3));
//! assert_eq!(list.select(1).unwrap(), Some(&10));
//!
//! let mut map = RangeAggregateMap::new();
//! map.insert(1, 4.0).unwrap();
//! map.insert(5, -2.0).unwrap();
//! map.insert(9, 7.5).unwrap();
//! let window = map.range_aggregate(&0, &6).unwrap();
//! assert_eq!((window.count, window.sum(), window.min), (2, 2.0, -2.0));
//!
//! let mut spans = IntervalSet::new();
//! spans.insert(Interval::new(1, 5).unwrap());
//! spans.insert(Interval::new(10, 20).unwrap());
//! assert!(spans.overlap_search(&Interval::new(6, 9).unwrap()).is_none());
//! ```

#[macro_use]
mod tracing_helpers;

pub mod augment;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod level;
mod query;

pub use augment::Augment;
pub use augment::Counted;
pub use augment::Interval;
pub use augment::RangeAggregate;
pub use config::Config;
pub use config::Duplicates;
pub use config::Sweep;
pub use engine::SkipIndex;
pub use error::IndexError;
pub use error::IndexResult;
pub use index::IntervalSet;
pub use index::OrderedSet;
pub use index::RangeAggregateMap;
pub use index::RankedList;
