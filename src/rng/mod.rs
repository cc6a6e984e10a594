//! Random number generation.
//!
//! Every operation in this crate that needs randomness (IVs, initial
//! counters, salts, SecretStream headers) takes a caller-supplied
//! `RngCore + CryptoRng`. Production code passes `rand::rngs::OsRng` or
//! [`Csprng`]; tests pass a seeded [`Csprng`] for reproducible output.

mod csprng;

pub use csprng::{Csprng, random_array};
