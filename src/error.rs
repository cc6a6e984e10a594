//! Error taxonomy shared by every primitive in the crate.
//!
//! Failures are deterministic: the same inputs always produce the same
//! error, so nothing here is ever worth retrying.

use thiserror::Error;

/// Errors returned by the primitives in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A parameter is outside the range the algorithm accepts
    /// (Argon2 dimensions, key or nonce lengths, salt length).
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Input bytes are malformed: bad padding, truncated or misaligned
    /// ciphertext, unknown stream tag.
    #[error("malformed input: {0}")]
    Format(&'static str),

    /// A MAC did not verify. No plaintext is released.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// A single-use object was used twice, or used in the wrong direction.
    #[error("misuse: {0}")]
    Misuse(&'static str),

    /// The Argon2 matrix could not be allocated.
    #[error("unable to allocate {requested_blocks} memory blocks")]
    ResourceExhausted {
        /// Number of 1 KiB blocks that were requested.
        requested_blocks: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
