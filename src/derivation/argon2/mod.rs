//! Argon2 password hashing (RFC 9106, version 0x13).
//!
//! All three variants are supported:
//!
//! - **Argon2d**: data-dependent addressing; fastest to fill, but memory
//!   access patterns depend on the password.
//! - **Argon2i**: data-independent addressing throughout.
//! - **Argon2id**: data-independent for the first half of the first
//!   pass, data-dependent afterwards. The recommended default.
//!
//! # Algorithm Overview
//!
//! 1. **Initialization**: H0 = BLAKE2b-512 over the parameters and inputs.
//! 2. **Lane seeding**: the first two blocks of each lane come from H'
//!    (variable-length BLAKE2b) over H0, the column and the lane.
//! 3. **Memory filling**: for each pass, for each of the 4 slices, every
//!    lane fills its segment with `G(previous, reference)`. From the
//!    second pass on the result is XORed into the block it replaces.
//! 4. **Finalization**: the last block of every lane is XORed together
//!    and hashed with H' to the requested tag length.
//!
//! Lanes of one slice are independent. With the `parallel` feature they
//! are computed on the rayon thread pool.

mod block;
mod boundary;
pub mod core;
mod memory;
pub mod params;
mod reference;

pub use self::core::{Argon2, ArgonOutput, RANDOM_SALT_BYTES, derive, derive_with_random_salt};
pub use params::{Argon2Params, Argon2Type, MAX_PARALLELISM};
