//! AES-128/192/256 (FIPS-197) with CBC and CTR modes.
//!
//! - `key`: key variants and the expanded key schedule
//! - `block`: the single-use block transformation
//! - `cbc`: CBC with PKCS#7 padding
//! - `ctr`: CTR with a 128-bit big-endian counter
//!
//! Sessions accept input incrementally and are finalized exactly once.
//! One-shot helpers are available as `cbc::encrypt`, `ctr::decrypt`, etc.
//!
//! Neither mode authenticates its output.

pub mod block;
pub mod cbc;
pub mod ctr;
pub mod key;
mod tables;

pub use block::{AesBlock, BLOCK_BYTES, decrypt_block, encrypt_block};
pub use cbc::{AesCbc, CbcCiphertext};
pub use ctr::{AesCtr, CtrCiphertext};
pub use key::{InternalAesKey, KeySchedule};

/// Direction a mode session was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Encrypt,
    Decrypt,
}
