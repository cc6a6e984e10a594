//! Symmetric encryption.
//!
//! - `aes`: AES-128/192/256 block cipher with CBC and CTR sessions
//! - `chacha20`: the ChaCha20 block function, HChaCha20 and the
//!   XChaCha20 stream cipher
//! - `poly1305`: the Poly1305 authenticator and XChaCha20-Poly1305
//! - `secretstream`: chunked authenticated encryption with rekeying
//!
//! AES-CBC, AES-CTR and bare XChaCha20 provide confidentiality only.
//! Use `secretstream` or `poly1305::xchacha20poly1305` when ciphertext
//! must be authenticated.

pub mod aes;
pub mod chacha20;
pub mod poly1305;
pub mod secretstream;
