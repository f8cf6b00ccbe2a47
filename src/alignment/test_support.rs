//! Synthetic signatures for unit tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic noise-like peak envelope that never touches zero
pub(crate) fn noise(len: usize, seed: u64) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(1000..20000)).collect()
}
