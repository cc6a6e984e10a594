//! Pure-software cryptographic primitives
//!
//! This crate provides self-contained implementations of the symmetric
//! primitives an application needs to encrypt data at rest and derive keys
//! from passwords, without delegating to a native library.
//!
//! The focus is on **clarity, predictability, and auditability**. Every
//! stateful object is single-owner and single-use where the algorithm
//! demands it, misuse is reported as an error instead of silently producing
//! weak output, and all key-dependent buffers are wiped on drop.
//!
//! # Module overview
//!
//! - `primitives`
//!   Byte-level helpers: endian loads and stores, XOR, constant-time
//!   comparison, and the fixed-size block buffer behind every incremental
//!   API.
//!
//! - `hash`
//!   SHA-256 and BLAKE2b (from the RustCrypto `sha2` and `blake2` crates)
//!   plus Argon2's variable-length hash H'.
//!
//! - `rng`
//!   The randomness contract. Operations that need fresh randomness take a
//!   caller-supplied `RngCore + CryptoRng`; a seedable ChaCha20 generator
//!   is provided for reproducible output.
//!
//! - `encryption`
//!   AES-128/192/256 with CBC (PKCS#7) and CTR sessions; ChaCha20,
//!   HChaCha20 and XChaCha20; Poly1305 and XChaCha20-Poly1305; and
//!   SecretStream, a chunked authenticated stream with in-band rekeying.
//!
//! - `derivation`
//!   Argon2d, Argon2i and Argon2id (RFC 9106, version 0x13).
//!
//! # Design goals
//!
//! - Explicit `Result`s with a single error type
//! - Sessions finalize exactly once
//! - No logging of key material, passwords, plaintext or tags
//! - Bit-exact interoperability with the reference algorithms
//!
//! AES-CBC, AES-CTR and bare XChaCha20 are unauthenticated. Prefer
//! SecretStream or XChaCha20-Poly1305 when ciphertext can be tampered with.

pub mod derivation;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod primitives;
pub mod rng;

pub use error::{Error, Result};
