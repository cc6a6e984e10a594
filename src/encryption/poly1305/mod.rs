//! Poly1305 message authentication and the AEAD built on it.
//!
//! - `mac`: the incremental Poly1305 one-time authenticator
//! - `aead`: XChaCha20-Poly1305 (IETF) one-shot encryption
//!
//! The MAC is exposed for constructions such as SecretStream that need to
//! feed it their own framing. A Poly1305 key must only ever authenticate
//! a single message.

pub mod aead;
pub(crate) mod mac;

pub use mac::{Poly1305, poly1305};

/// One-shot XChaCha20-Poly1305.
pub use aead as xchacha20poly1305;
