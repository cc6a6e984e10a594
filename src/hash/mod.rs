//! Hash functions consumed by the rest of the crate.
//!
//! SHA-256 and BLAKE2b are not reimplemented here; they are taken from the
//! RustCrypto `sha2` and `blake2` crates and exposed behind the small
//! interface the primitives need. The only construction defined locally is
//! Argon2's variable-length hash H', which is built on top of BLAKE2b.

mod blake2b;
mod sha256;

pub use blake2b::{blake2b, blake2b_long};
pub use sha256::sha256;

pub(crate) use blake2b::{blake2b_into, blake2b_long_into};
