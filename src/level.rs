//! Random-bit sources for level assignment.
//!
//! Each insertion consumes one 32-bit draw. The lowest bit gates indexing:
//! only entries whose draw has a clear low bit receive index nodes, which
//! halves the indexed density compared to a classic skip list. The level of
//! an indexed entry is one plus the run of set bits that follows.
//!
//! ```text
//! draw 0b...0111_0110
//!              ^^^ ^
//!              |   gate bit clear, entry is indexed
//!              three consecutive ones, level 4
//! ```
//!
//! Any `rand_core::RngCore` can drive an index. `XorShift` is the default,
//! and `ReplayBits` replays a fixed list of draws so that tests can pin the
//! exact shape of the structure.

use rand_core::OsRng;
use rand_core::RngCore;
use rand_core::SeedableRng;
use rand_core::impls;

/// Fallback seed for a zero state, which xorshift cannot leave.
const ZERO_SEED_REPLACEMENT: u64 = 0x12345678_9abcdef0;

/// Decide the level for an entry from a single 32-bit draw.
///
/// Returns `None` when the entry should not be indexed at all.
pub fn level_for(bits: u32) -> Option<usize> {
    if bits & 1 != 0 {
        return None;
    }
    return Some(1 + (bits >> 1).trailing_ones() as usize);
}

/// A draw that produces the given level, for building fixed shapes.
///
/// `level_bits(0)` is a draw that leaves the entry unindexed.
pub fn level_bits(level: usize) -> u32 {
    if level == 0 {
        return 1;
    }
    let ones = (level - 1).min(31) as u32;
    let run = (1u32 << ones) - 1;
    return run << 1;
}

/// Marsaglia xorshift64, the default level source.
#[derive(Clone, Debug)]
pub struct XorShift {
    state: u64,
}

impl XorShift {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> XorShift {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        return XorShift { state };
    }

    /// Create a generator seeded from the operating system.
    pub fn from_entropy() -> XorShift {
        return XorShift::new(OsRng.next_u64());
    }
}

impl RngCore for XorShift {
    fn next_u32(&mut self) -> u32 {
        return (self.next_u64() >> 32) as u32;
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        return self.state;
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        return Ok(());
    }
}

impl SeedableRng for XorShift {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> XorShift {
        return XorShift::new(u64::from_le_bytes(seed));
    }
}

/// Replays a fixed sequence of 32-bit draws, cycling when exhausted.
///
/// An empty sequence answers every draw with an odd value, so nothing is
/// ever indexed.
#[derive(Clone, Debug, Default)]
pub struct ReplayBits {
    draws: Vec<u32>,
    pos: usize,
}

impl ReplayBits {
    pub fn new(draws: Vec<u32>) -> ReplayBits {
        return ReplayBits { draws, pos: 0 };
    }

    /// Replay draws that produce exactly these levels, in order.
    pub fn from_levels(levels: &[usize]) -> ReplayBits {
        return ReplayBits::new(levels.iter().map(|&l| level_bits(l)).collect());
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        return self.pos;
    }
}

impl RngCore for ReplayBits {
    fn next_u32(&mut self) -> u32 {
        if self.draws.is_empty() {
            return 1;
        }
        let bits = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        return bits;
    }

    fn next_u64(&mut self) -> u64 {
        return impls::next_u64_via_u32(self);
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        return Ok(());
    }
}
