//! Injected runtime sources.
//!
//! # Responsibility
//! - Abstract wall-clock time and ETA randomness behind small traits.
//! - Let tests pin both to fixed values.

pub mod clock;
pub mod eta;
