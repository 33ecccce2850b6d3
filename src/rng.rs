//! Uniform index drawing for selections.

use crate::error::GameError;

/// Source of uniformly distributed indices.
pub trait IndexSource {
    /// `Some(i)` with `i` uniform in `[0, upper)`; `None` when `upper == 0`.
    fn next_index(&mut self, upper: usize) -> Option<usize>;
}

/// xorshift64* generator. Not crypto secure; good enough to pick a creature.
#[derive(Clone, Debug)]
pub struct XorShiftIndexSource {
    state: u64,
}

impl XorShiftIndexSource {
    pub fn from_seed(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Seeds from the platform entropy source (`crypto.getRandomValues` in the browser).
    pub fn from_entropy() -> Result<Self, GameError> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf)?;
        Ok(Self::from_seed(u64::from_le_bytes(buf)))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl IndexSource for XorShiftIndexSource {
    fn next_index(&mut self, upper: usize) -> Option<usize> {
        if upper == 0 {
            return None;
        }
        let upper = upper as u64;
        // Reject the tail that would bias `% upper` toward small values.
        let zone = u64::MAX - (u64::MAX % upper);
        loop {
            let v = self.next_u64();
            if v < zone {
                return Some((v % upper) as usize);
            }
        }
    }
}
