//! Queries over a `SkipIndex`.
//!
//! Each query is an `impl` block on the engine, bounded by the augmentation
//! it reads. All of them are a single call to the shared walk followed by a
//! short scan of the base chain.

mod order;
mod overlap;
mod point;
mod range;
