//! Byte-level building blocks
//!
//! This module holds the small, non-cryptographic helpers every primitive
//! in the crate relies on:
//!
//! - `conv`: little/big-endian conversion between byte slices and words
//! - `ops`: XOR and constant-time comparison over byte slices
//! - `buffer`: fixed-size block accumulation for incremental APIs
//!
//! Nothing here allocates, and nothing here knows about keys. The slice
//! helpers expect equal or sufficient lengths and panic otherwise.

pub mod buffer;
pub mod conv;
pub mod ops;

pub use buffer::BlockBuffer;
