//! Configuration for an index instance.

/// How deletions clean up after themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sweep {
    /// Unlink the entry and every index node that references it inside the
    /// delete call, repairing spans on the way. Required whenever index
    /// nodes carry augmentation values.
    #[default]
    Eager,
    /// Only set the tombstone. The next mutating traversal that passes the
    /// entry or one of its index nodes unlinks it. Plain ordered sets only.
    Deferred,
}

/// What an insert does when an equal key is already present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Duplicates {
    /// Keep the existing entry and report that nothing was inserted.
    Reject,
    /// Insert the new entry before every existing entry with the same key,
    /// so equal keys come back in stack order.
    Stack,
}

/// Default minimum height before the head is allowed to shrink.
pub const DEFAULT_REDUCE_FLOOR: usize = 3;

/// Configuration for a `SkipIndex`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Deletion policy.
    pub sweep: Sweep,

    /// Seed for the default level source. `None` seeds from the operating
    /// system.
    pub seed: Option<u64>,

    /// The head only drops its top level while the height is above this
    /// floor and the top three levels are all empty.
    pub reduce_floor: usize,
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            sweep: Sweep::Eager,
            seed: None,
            reduce_floor: DEFAULT_REDUCE_FLOOR,
        };
    }
}

impl Config {
    pub fn new() -> Config {
        return Config::default();
    }

    /// Sets the deletion policy.
    pub fn with_sweep(mut self, sweep: Sweep) -> Config {
        self.sweep = sweep;
        return self;
    }

    /// Sets a fixed seed for the default level source.
    pub fn with_seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        return self;
    }

    /// Sets the height floor for head reduction. Values below 2 are raised
    /// to 2, since the check looks at the top three levels.
    pub fn with_reduce_floor(mut self, floor: usize) -> Config {
        self.reduce_floor = floor.max(2);
        return self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.sweep, Sweep::Eager);
        assert_eq!(config.seed, None);
        assert_eq!(config.reduce_floor, DEFAULT_REDUCE_FLOOR);
    }

    #[test]
    fn builder_chains() {
        let config = Config::new()
            .with_sweep(Sweep::Deferred)
            .with_seed(9)
            .with_reduce_floor(0);
        assert_eq!(config.sweep, Sweep::Deferred);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.reduce_floor, 2);
    }
}
