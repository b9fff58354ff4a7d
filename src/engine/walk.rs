//! The shared top-down traversal.
//!
//! Every search in the index has the same shape: start at the head of the
//! top level, move right while the next node's span is irrelevant, drop a
//! level otherwise, and finish at level 1 with a base-chain starting point.
//! Queries differ only in the test that decides between right and down, so
//! that test is a callback and the loop exists once.
//!
//! ```text
//! L3  H ------------------------> 40 -----------------> nil
//!     |                           |
//! L2  H ---------> 20 ----------> 40 --------> 60 ----> nil
//!     |            |              |            |
//! L1  H --> 10 --> 20 ----------> 40 --> 50 -> 60 ----> nil
//!     |     |      |              |      |     |
//! L0  S  -> 10 --> 20 --> 30 ---> 40 --> 50 -> 60 -> 70
//! ```
//!
//! Searching for 35 with "right while key > next": H(L3), down to H(L2),
//! right to 20, down to 20(L1), down to base at 20, then the caller scans
//! 30, 40.

use smallvec::SmallVec;

use super::SkipIndex;
use super::arena::Idx;
use super::arena::NULL;
use crate::augment::Augment;

/// The decision for one candidate successor during a walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Move onto the candidate.
    Right,
    /// Stay, and continue one level lower (or finish at level 1).
    Down,
    /// End the walk with the candidate as the answer.
    Stop,
}

/// The node the walk stood on at each level, indexed by level. Slot 0 is
/// unused.
pub(crate) type Path = SmallVec<[Idx; 36]>;

/// Where a walk finished.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Landing {
    /// The node the walk stood on when it ended.
    pub node: Idx,
    /// The live right neighbour of `node` that was examined last, or `NULL`.
    pub next: Idx,
    /// Whether the callback ended the walk with `Step::Stop`.
    pub stopped: bool,
}

impl<K, P, A: Augment<K, P>> SkipIndex<K, P, A> {
    /// Walk from the head towards the base, asking `decide` about every
    /// live successor. Nodes whose entry is tombstoned are stepped over
    /// without consulting the callback.
    pub(crate) fn walk<F>(&self, decide: F) -> Landing
    where
        F: FnMut(&K, &A::Value) -> Step,
    {
        let mut path = Path::new();
        return self.walk_path(&mut path, decide);
    }

    /// Like `walk`, also recording the node at every level in `path`.
    pub(crate) fn walk_path<F>(&self, path: &mut Path, mut decide: F) -> Landing
    where
        F: FnMut(&K, &A::Value) -> Step,
    {
        path.clear();
        path.resize(self.head.level + 1, NULL);

        let mut q = self.head.node;
        let mut level = self.head.level;
        loop {
            let r = self.live_right(q);
            let step = if r == NULL {
                Step::Down
            } else {
                let node = self.node(r);
                decide(self.key(node.entry), &node.value)
            };

            match step {
                Step::Right => {
                    q = r;
                }
                Step::Stop => {
                    path[level] = q;
                    return Landing {
                        node: q,
                        next: r,
                        stopped: true,
                    };
                }
                Step::Down => {
                    path[level] = q;
                    if level == 1 {
                        return Landing {
                            node: q,
                            next: r,
                            stopped: false,
                        };
                    }
                    q = self.node(q).down;
                    level -= 1;
                }
            }
        }
    }
}
