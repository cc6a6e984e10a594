//! SecretStream: a sequence of authenticated chunks under one key.
//!
//! Typical use:
//!
//! ```rust, ignore
//! use purecrypt::encryption::secretstream::{self, Tag};
//!
//! let (mut tx, header) = secretstream::init_push(&key, &mut rng);
//! let c1 = tx.push(b"first", b"", Tag::Message)?;
//! let c2 = tx.push(b"last", b"", Tag::Final)?;
//!
//! let mut rx = secretstream::init_pull(&key, &header);
//! let (m1, _) = rx.pull(&c1, b"")?;
//! let (m2, tag) = rx.pull(&c2, b"")?;
//! assert_eq!(tag, Tag::Final);
//! ```

mod core;

pub use self::core::{
    ABYTES, HEADER_BYTES, KEY_BYTES, MESSAGE_BYTES_MAX, SecretStreamState, Tag, init_pull,
    init_push, keygen, pull, push,
};
