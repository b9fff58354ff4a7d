//! Error types for index operations.
//!
//! Validation failures are the only errors an index reports. Lookups that
//! find nothing (deleting an absent key, ranking a missing key, selecting
//! past the end, an overlap query with no match) are normal results and
//! come back as `Option` or `bool`.

use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised by index construction, mutation, and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// An interval was built with its low bound above its high bound.
    #[error("invalid interval: low bound is greater than high bound")]
    InvalidInterval,

    /// A range query was issued with `lo > hi`.
    #[error("invalid range: lower bound is greater than upper bound")]
    InvalidRange,

    /// Ranks are 1-based; `select(0)` has no answer.
    #[error("invalid rank {0}: ranks start at 1")]
    InvalidRank(usize),

    /// An aggregate payload that cannot be ordered (NaN).
    #[error("invalid payload: {0} cannot be aggregated")]
    InvalidPayload(f64),

    /// Deferred tombstone sweeping leaves spans stale, so only the plain
    /// strategy accepts it.
    #[error("deferred sweep is not supported by the {strategy} strategy")]
    UnsupportedSweep {
        /// Name of the augmentation strategy that rejected the policy.
        strategy: &'static str,
    },

    /// A structural check found the index in an inconsistent state.
    #[error("corrupted index: {reason}")]
    Corrupted {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl IndexError {
    pub(crate) fn corrupted(reason: impl Into<String>) -> IndexError {
        return IndexError::Corrupted {
            reason: reason.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            IndexError::InvalidRank(0).to_string(),
            "invalid rank 0: ranks start at 1"
        );
        let err = IndexError::UnsupportedSweep { strategy: "distance" };
        assert!(err.to_string().contains("distance"));
    }

    #[test]
    fn corrupted_carries_reason() {
        let err = IndexError::corrupted("level 2 out of order");
        assert_eq!(
            err,
            IndexError::Corrupted {
                reason: "level 2 out of order".to_string()
            }
        );
    }
}
