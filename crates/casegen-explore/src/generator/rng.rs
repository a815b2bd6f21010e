//! Seeding with ChaCha8.
//!
//! A run seed is an arbitrary string (typically a run identifier). It is
//! hashed with BLAKE3 into the 32-byte ChaCha8 seed, so the same string
//! always yields the same stream.
//!
//! Per-field sources hash `(run_seed, field_id)` instead, so fields can be
//! generated in any order, or in parallel, and still reproduce.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create the deterministic RNG for a whole run.
pub fn run_rng(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::from_seed(*blake3::hash(seed.as_bytes()).as_bytes())
}

/// Create an independent deterministic RNG for one field of a run.
pub fn field_rng(seed: &str, field_id: &str) -> ChaCha8Rng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    hasher.update(&[0]);
    hasher.update(field_id.as_bytes());
    ChaCha8Rng::from_seed(*hasher.finalize().as_bytes())
}
