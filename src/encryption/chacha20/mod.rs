//! ChaCha20 family of stream ciphers.
//!
//! - `core`: the RFC 8439 block function, HChaCha20, and the IETF
//!   keystream helper used by the authenticated constructions
//! - `xchacha20`: the extended-nonce variant, as an incremental session
//!   and a one-shot helper
//!
//! None of these provide authentication on their own.

pub(crate) mod core;
pub mod xchacha20;

pub use self::core::{BLOCK_BYTES, block, hchacha20};
pub use xchacha20::{XChaCha20, xor_with_keystream};
