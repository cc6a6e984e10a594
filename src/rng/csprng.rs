//! ChaCha20-based CSPRNG
//!
//! Expands a 256-bit seed with the ChaCha20 block function and rekeys
//! after every request, so a captured state does not reveal earlier
//! output. It implements the `rand` traits and can be passed anywhere
//! the crate asks for an `RngCore + CryptoRng`.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encryption::chacha20::{BLOCK_BYTES, block};

/// Cryptographically secure pseudorandom number generator.
///
/// Internally a ChaCha20 key, a fixed zero nonce and a block counter.
/// After each request the first 32 bytes of a fresh block become the
/// new key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Csprng {
    key: [u8; 32],
    nonce: [u8; 12],
    counter: u32,
}

impl Csprng {
    /// Creates a generator seeded from the operating system.
    pub fn from_os() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);

        <Self as SeedableRng>::from_seed(seed)
    }

    fn rekey(&mut self) {
        let mut fresh = block(&self.key, self.counter, &self.nonce);

        self.counter = self.counter.wrapping_add(1);
        self.key.copy_from_slice(&fresh[..32]);
        fresh.zeroize();
    }
}

impl Default for Csprng {
    fn default() -> Self {
        Self::from_os()
    }
}

impl SeedableRng for Csprng {
    type Seed = [u8; 32];

    /// The seed must be uniformly random and unpredictable.
    fn from_seed(mut seed: Self::Seed) -> Self {
        let key = seed;
        seed.zeroize();

        Self {
            key,
            nonce: [0u8; 12],
            counter: 0,
        }
    }
}

impl RngCore for Csprng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        for chunk in out.chunks_mut(BLOCK_BYTES) {
            let mut stream = block(&self.key, self.counter, &self.nonce);
            self.counter = self.counter.wrapping_add(1);

            chunk.copy_from_slice(&stream[..chunk.len()]);
            stream.zeroize();
        }

        self.rekey();
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(out);
        Ok(())
    }
}

impl CryptoRng for Csprng {}

/// Returns `N` bytes from `rng`.
pub fn random_array<const N: usize, R: RngCore + CryptoRng>(rng: &mut R) -> [u8; N] {
    let mut out = [0u8; N];
    rng.fill_bytes(&mut out);
    out
}
