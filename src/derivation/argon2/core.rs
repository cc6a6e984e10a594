use core::fmt;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use super::boundary::{finalize, init, seed_lanes};
use super::memory::{FillContext, MemoryLayout};
use super::params::{Argon2Params, MIN_SALT_LENGTH};
use crate::error::{Error, Result};

/// Length of the salt generated by [`Argon2::derive_with_random_salt`].
pub const RANDOM_SALT_BYTES: usize = 64;

/// A validated Argon2 instance.
///
/// # Example
///
/// ```rust, ignore
/// use purecrypt::derivation::argon2::{Argon2, Argon2Params};
///
/// let argon2 = Argon2::new(Argon2Params::moderate())?;
/// let tag = argon2.derive(b"my_password", b"random_salt_16b!")?;
/// ```
#[derive(Debug, Clone)]
pub struct Argon2 {
    params: Argon2Params,
}

/// Tag derived under a freshly generated salt.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct ArgonOutput {
    pub tag: Vec<u8>,
    pub salt: Vec<u8>,
}

impl fmt::Debug for ArgonOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgonOutput")
            .field("tag", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

impl Argon2 {
    /// Validates `params` and builds an instance.
    ///
    /// # Errors
    /// `Error::InvalidParameter` if any parameter is out of range.
    pub fn new(params: Argon2Params) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    /// Derives a tag of `tag_length` bytes from `password` and `salt`.
    ///
    /// # Errors
    /// - `Error::InvalidParameter` if the salt is shorter than 8 bytes
    /// - `Error::ResourceExhausted` if the block matrix cannot be allocated
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        if salt.len() < MIN_SALT_LENGTH {
            return Err(Error::InvalidParameter("salt must be at least 8 bytes"));
        }

        let params = &self.params;
        let layout = MemoryLayout::new(params);

        tracing::debug!(
            variant = ?params.variant,
            memory_blocks = layout.total_blocks,
            iterations = params.iterations,
            parallelism = params.parallelism,
            tag_length = params.tag_length,
            "argon2 derivation started"
        );

        let mut matrix = layout.allocate()?;

        let h0 = init(password, salt, params)?;
        seed_lanes(&mut matrix, &layout, &h0)?;
        drop(h0);

        let ctx = FillContext {
            iterations: params.iterations,
            variant: params.variant,
        };
        layout.fill(&mut matrix, &ctx)?;

        let tag = finalize(&matrix, &layout, params.tag_length)?;

        tracing::debug!(variant = ?params.variant, "argon2 derivation finished");

        Ok(tag)
    }

    /// Derives a tag under a fresh 64-byte salt drawn from `rng`.
    pub fn derive_with_random_salt<R: RngCore + CryptoRng>(
        &self,
        password: &[u8],
        rng: &mut R,
    ) -> Result<ArgonOutput> {
        let mut salt = vec![0u8; RANDOM_SALT_BYTES];
        rng.fill_bytes(&mut salt);

        let tag = self.derive(password, &salt)?;
        Ok(ArgonOutput { tag, salt })
    }
}

/// Validates `params` and derives a tag in one call.
pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    Argon2::new(params.clone())?.derive(password, salt)
}

/// Validates `params` and derives a tag under a fresh random salt.
pub fn derive_with_random_salt<R: RngCore + CryptoRng>(
    password: &[u8],
    params: &Argon2Params,
    rng: &mut R,
) -> Result<ArgonOutput> {
    Argon2::new(params.clone())?.derive_with_random_salt(password, rng)
}
