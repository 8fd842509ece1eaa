//! Seeded random number generation.
//!
//! All randomness in the crate flows from [`ChaCha8Rng`] so that a fixed seed
//! reproduces the same pairings on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The generator type used by schedulers, coordinators and workers.
pub type CoevoRng = ChaCha8Rng;

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> CoevoRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, drawing a fresh one when absent.
pub fn rng_from_config(seed: Option<u64>) -> CoevoRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws one independent seed per worker from the master generator.
///
/// Seeds are drawn before dispatch, so the per-worker streams depend only on
/// the master state and the worker count.
pub fn worker_seeds<R: Rng + ?Sized>(master: &mut R, workers: usize) -> Vec<u64> {
    (0..workers).map(|_| master.random()).collect()
}
