//! Parameter definitions and validation for Argon2.

use core::fmt;

use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Largest permitted degree of parallelism (2^24 - 1).
pub const MAX_PARALLELISM: u32 = 0x00ff_ffff;

/// Smallest permitted tag, in bytes.
pub const MIN_TAG_LENGTH: usize = 4;

/// Largest tag this crate will produce, in bytes.
pub const MAX_TAG_LENGTH: usize = 1024;

/// Smallest accepted salt, in bytes.
pub const MIN_SALT_LENGTH: usize = 8;

/// Argon2 variant. The discriminant is the `y` value hashed into H0 and
/// into every address block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argon2Type {
    /// Data-dependent addressing throughout.
    Argon2d = 0,
    /// Data-independent addressing throughout.
    Argon2i = 1,
    /// Data-independent for the first half of the first pass, then
    /// data-dependent.
    Argon2id = 2,
}

impl Argon2Type {
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// Configuration parameters for Argon2.
///
/// The presets trade derivation time for resistance:
///
/// | preset        | memory  | passes | lanes |
/// |---------------|---------|--------|-------|
/// | `moderate`    | 32 MiB  | 3      | 2     |
/// | `interactive` | 64 MiB  | 3      | 4     |
/// | `sensitive`   | 256 MiB | 4      | 4     |
#[derive(Clone)]
pub struct Argon2Params {
    /// Memory size in KiB (minimum 8 × parallelism).
    pub memory_kib: u32,
    /// Number of passes over memory (minimum 1).
    pub iterations: u32,
    /// Number of lanes (1..=2^24-1).
    pub parallelism: u32,
    /// Length of the output tag in bytes (4..=1024).
    pub tag_length: usize,
    /// Optional secret key K.
    pub secret: Option<Zeroizing<Vec<u8>>>,
    /// Optional associated data X.
    pub associated_data: Option<Vec<u8>>,
    pub variant: Argon2Type,
}

impl Argon2Params {
    /// Argon2id, 64 MiB, 3 passes, 4 lanes, 32-byte tag.
    pub fn interactive() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 4,
            tag_length: 32,
            secret: None,
            associated_data: None,
            variant: Argon2Type::Argon2id,
        }
    }

    /// Argon2id, 32 MiB, 3 passes, 2 lanes, 32-byte tag.
    pub fn moderate() -> Self {
        Self {
            memory_kib: 32 * 1024,
            parallelism: 2,
            ..Self::interactive()
        }
    }

    /// Argon2id, 256 MiB, 4 passes, 4 lanes, 32-byte tag.
    pub fn sensitive() -> Self {
        Self {
            memory_kib: 256 * 1024,
            iterations: 4,
            ..Self::interactive()
        }
    }

    pub fn with_variant(mut self, variant: Argon2Type) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        self.secret = Some(Zeroizing::new(secret.to_vec()));
        self
    }

    pub fn with_associated_data(mut self, associated_data: &[u8]) -> Self {
        self.associated_data = Some(associated_data.to_vec());
        self
    }

    /// Checks every bound Argon2 places on its parameters.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism < 1 || self.parallelism > MAX_PARALLELISM {
            return Err(Error::InvalidParameter(
                "parallelism must be between 1 and 2^24-1",
            ));
        }

        if self.iterations < 1 {
            return Err(Error::InvalidParameter("iterations must be at least 1"));
        }

        if u64::from(self.memory_kib) < 8 * u64::from(self.parallelism) {
            return Err(Error::InvalidParameter(
                "memory must be at least 8 KiB per lane",
            ));
        }

        if !(MIN_TAG_LENGTH..=MAX_TAG_LENGTH).contains(&self.tag_length) {
            return Err(Error::InvalidParameter(
                "tag length must be between 4 and 1024 bytes",
            ));
        }

        let secret_len = self.secret.as_ref().map_or(0, |s| s.len());
        let ad_len = self.associated_data.as_ref().map_or(0, Vec::len);
        if u32::try_from(secret_len).is_err() || u32::try_from(ad_len).is_err() {
            return Err(Error::InvalidParameter(
                "secret and associated data must fit in 2^32-1 bytes",
            ));
        }

        Ok(())
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self::interactive()
    }
}

impl fmt::Debug for Argon2Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Params")
            .field("memory_kib", &self.memory_kib)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .field("tag_length", &self.tag_length)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field(
                "associated_data_len",
                &self.associated_data.as_ref().map(Vec::len),
            )
            .field("variant", &self.variant)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for params in [
            Argon2Params::interactive(),
            Argon2Params::moderate(),
            Argon2Params::sensitive(),
            Argon2Params::default(),
        ] {
            assert!(params.validate().is_ok());
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = Argon2Params {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            ..Argon2Params::default()
        };

        let cases = [
            Argon2Params { parallelism: 0, ..base.clone() },
            Argon2Params { parallelism: MAX_PARALLELISM + 1, ..base.clone() },
            Argon2Params { iterations: 0, ..base.clone() },
            Argon2Params { memory_kib: 7, ..base.clone() },
            Argon2Params { memory_kib: 31, parallelism: 4, ..base.clone() },
            Argon2Params { tag_length: 3, ..base.clone() },
            Argon2Params { tag_length: 1025, ..base.clone() },
        ];

        for params in cases {
            assert!(
                matches!(params.validate(), Err(Error::InvalidParameter(_))),
                "{params:?}"
            );
        }
    }

    #[test]
    fn debug_hides_secret() {
        let params = Argon2Params::default().with_secret(b"hunter2");
        assert!(!format!("{params:?}").contains("hunter2"));
    }
}
