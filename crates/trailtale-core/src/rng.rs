//! Random number generator abstraction for determinism.
//!
//! The roster shuffle is the only randomized step in a hunt; routing it
//! through this trait lets tests inject a scripted sequence and replay
//! the exact same assignment order.

use rand::Rng;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by the thread-local generator.
#[derive(Debug, Clone, Copy)]
pub struct ThreadRngSource;

impl DeterministicRng for ThreadRngSource {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}
