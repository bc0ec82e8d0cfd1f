//! Random source for roulette and tournament tie-breaks
//!
//! Selection randomness is non-cryptographic but must be reproducible on
//! request: a seeded run replays exactly. Runs without a configured seed draw
//! one from the thread-local generator, so the audit log can still replay them.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// ChaCha20 stream with a known seed
#[derive(Debug, Clone)]
pub struct SelectionRng {
    rng: ChaCha20Rng,
    seed: u64,
}

/// A seed from the thread-local generator
pub fn fresh_seed() -> u64 {
    rand::rng().random()
}

impl SelectionRng {
    /// `seed.to_le_bytes()` fills the first 8 bytes of the ChaCha key, the rest is zero.
    pub fn seeded(seed: u64) -> Self {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(key),
            seed,
        }
    }

    /// Use `seed` when given, otherwise a fresh one
    pub fn seeded_or_fresh(seed: Option<u64>) -> Self {
        Self::seeded(seed.unwrap_or_else(fresh_seed))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for SelectionRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
