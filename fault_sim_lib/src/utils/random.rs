//! Random source used when synthesizing fault values.
//!
//! The relay never reaches for a global generator; it owns a [`FaultRandom`]
//! so tests can drive it with a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Source of uniformly distributed fault values.
pub trait FaultRandom {
    /// Sample a value uniformly from `range` (upper bound exclusive).
    fn random_range(&mut self, range: Range<f64>) -> f64;
}

/// [`FaultRandom`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngFaultRandom<R: Rng> {
    rng: R,
}

impl<R: Rng> RngFaultRandom<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngFaultRandom<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible generator, used when the node config pins a seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> FaultRandom for RngFaultRandom<R> {
    fn random_range(&mut self, range: Range<f64>) -> f64 {
        self.rng.random_range(range)
    }
}
