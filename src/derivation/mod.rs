//! Key derivation.
//!
//! - `argon2`: memory-hard password hashing (Argon2d, Argon2i, Argon2id)

pub mod argon2;
