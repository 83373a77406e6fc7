use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// A value-typed random source. Drawing bytes consumes the value and yields a
/// successor, so a connection seeded for test replays the exact same stream;
/// the session installs the successor through its `with_prng` transaction.
#[derive(Clone, Debug)]
pub struct Prng(ChaCha20Rng);

impl Prng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(ChaCha20Rng::from_seed(seed))
    }

    pub fn from_entropy() -> Self {
        Self(ChaCha20Rng::from_entropy())
    }

    pub fn random_bytes(mut self, count: usize) -> (Vec<u8>, Prng) {
        let mut bytes = vec![0; count];
        self.0.fill_bytes(&mut bytes);
        (bytes, self)
    }
}
