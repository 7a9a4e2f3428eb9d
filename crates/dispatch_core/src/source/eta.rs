//! ETA source for responder assignment.
//!
//! # Invariants
//! - Every produced value lies in `ETA_MIN_MINUTES..=ETA_MAX_MINUTES`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ETA_MIN_MINUTES: u32 = 3;
pub const ETA_MAX_MINUTES: u32 = 12;

/// Produces the estimated arrival time, in minutes, for one assignment.
pub trait EtaSource {
    fn next_eta_minutes(&mut self) -> u32;
}

/// Uniform random ETA in the bounded range.
#[derive(Debug, Clone)]
pub struct RandomEta {
    rng: StdRng,
}

impl RandomEta {
    /// Seeds from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EtaSource for RandomEta {
    fn next_eta_minutes(&mut self) -> u32 {
        self.rng.gen_range(ETA_MIN_MINUTES..=ETA_MAX_MINUTES)
    }
}

/// Always returns the same ETA, clamped into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEta(u32);

impl FixedEta {
    pub fn new(minutes: u32) -> Self {
        Self(minutes.clamp(ETA_MIN_MINUTES, ETA_MAX_MINUTES))
    }
}

impl EtaSource for FixedEta {
    fn next_eta_minutes(&mut self) -> u32 {
        self.0
    }
}
