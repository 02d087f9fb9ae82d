//! Seeded linear-congruential random source.
//!
//! Every terrain pass draws from one [`Lcg`], so the same seed and parameters
//! reproduce the same island bit for bit. The generator implements
//! [`rand::RngCore`] and [`rand::SeedableRng`] and plugs into anything that
//! takes `&mut impl Rng`.

use rand::{RngCore, SeedableRng};

/// Linear-congruential generator: `next = (MULTIPLIER * state + INCREMENT) mod 2^32`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Multiplier of the recurrence (Numerical Recipes constants).
    pub const MULTIPLIER: u32 = 1_664_525;
    /// Increment of the recurrence.
    pub const INCREMENT: u32 = 1_013_904_223;

    /// Create a generator whose first output is derived from `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Uniform float in `[0, 1)` using a single step of the recurrence.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
