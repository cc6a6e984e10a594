//! AES in counter mode.
//!
//! The 16-byte counter block is read as a big-endian 128-bit integer and
//! incremented by one per block, wrapping modulo 2^128. Encryption and
//! decryption apply the same keystream; a trailing partial block consumes
//! only as many keystream bytes as it needs.

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Mode;
use super::block::{BLOCK_BYTES, encrypt_block};
use super::key::{InternalAesKey, KeySchedule};
use crate::error::{Error, Result};
use crate::primitives::BlockBuffer;
use crate::primitives::conv::u128_from_be;
use crate::primitives::ops::xor_in_place;

/// Ciphertext produced by a CTR encryption, with its initial counter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtrCiphertext {
    pub ciphertext: Vec<u8>,
    pub initial_counter: [u8; BLOCK_BYTES],
}

/// A streaming CTR session.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesCtr {
    schedule: KeySchedule,
    #[zeroize(skip)]
    mode: Mode,
    initial_counter: [u8; BLOCK_BYTES],
    counter: u128,
    buffer: BlockBuffer<BLOCK_BYTES>,
    output: Vec<u8>,
    finished: bool,
}

impl AesCtr {
    fn new(key: &InternalAesKey, initial_counter: [u8; BLOCK_BYTES], mode: Mode) -> Self {
        Self {
            schedule: KeySchedule::new(key),
            mode,
            initial_counter,
            counter: u128_from_be(&initial_counter),
            buffer: BlockBuffer::new(),
            output: Vec::new(),
            finished: false,
        }
    }

    /// Encryption session with a random initial counter block.
    pub fn encryptor<R: RngCore + CryptoRng>(key: &InternalAesKey, rng: &mut R) -> Self {
        let mut counter = [0u8; BLOCK_BYTES];
        rng.fill_bytes(&mut counter);
        Self::new(key, counter, Mode::Encrypt)
    }

    /// Encryption session starting from a caller-chosen counter block.
    ///
    /// Counter ranges must never overlap under the same key.
    pub fn encryptor_with_counter(key: &InternalAesKey, initial_counter: [u8; BLOCK_BYTES]) -> Self {
        Self::new(key, initial_counter, Mode::Encrypt)
    }

    /// Decryption session for ciphertext produced from `initial_counter`.
    pub fn decryptor(key: &InternalAesKey, initial_counter: [u8; BLOCK_BYTES]) -> Self {
        Self::new(key, initial_counter, Mode::Decrypt)
    }

    /// The counter block the keystream started from.
    pub fn initial_counter(&self) -> &[u8; BLOCK_BYTES] {
        &self.initial_counter
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.output.reserve(additional);
    }

    /// Feeds more input into the session.
    ///
    /// # Errors
    /// `Error::Misuse` once the session has been finalized.
    pub fn add_data(&mut self, data: &[u8]) -> Result<()> {
        if self.finished {
            return Err(Error::Misuse("CTR session already finalized"));
        }

        let Self {
            schedule,
            counter,
            buffer,
            output,
            ..
        } = self;

        buffer.absorb(data, |block| {
            let mut out = next_keystream(schedule, counter)?;
            xor_in_place(&mut out, block);
            output.extend_from_slice(&out);
            out.zeroize();
            Ok(())
        })
    }

    /// Finalizes an encryption session.
    ///
    /// # Errors
    /// `Error::Misuse` if the session decrypts or was already finalized.
    pub fn encrypt(&mut self) -> Result<CtrCiphertext> {
        self.finish(Mode::Encrypt)?;
        Ok(CtrCiphertext {
            ciphertext: self.flush()?,
            initial_counter: self.initial_counter,
        })
    }

    /// Finalizes a decryption session.
    ///
    /// # Errors
    /// `Error::Misuse` if the session encrypts or was already finalized.
    pub fn decrypt(&mut self) -> Result<Vec<u8>> {
        self.finish(Mode::Decrypt)?;
        self.flush()
    }

    fn finish(&mut self, expected: Mode) -> Result<()> {
        if self.mode != expected {
            return Err(Error::Misuse("CTR session built for the other direction"));
        }
        if self.finished {
            return Err(Error::Misuse("CTR session already finalized"));
        }
        self.finished = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        let pending = self.buffer.pending();

        if !pending.is_empty() {
            let mut keystream = next_keystream(&self.schedule, &mut self.counter)?;
            xor_in_place(&mut keystream[..pending.len()], pending);
            self.output.extend_from_slice(&keystream[..pending.len()]);
            keystream.zeroize();
        }
        self.buffer.clear();

        tracing::trace!(bytes = self.output.len(), "ctr session finalized");

        Ok(core::mem::take(&mut self.output))
    }
}

fn next_keystream(schedule: &KeySchedule, counter: &mut u128) -> Result<[u8; BLOCK_BYTES]> {
    let keystream = encrypt_block(schedule, &counter.to_be_bytes())?;
    *counter = counter.wrapping_add(1);
    Ok(keystream)
}

/// Encrypts `plaintext` in one call from a random initial counter.
pub fn encrypt<R: RngCore + CryptoRng>(
    key: &InternalAesKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<CtrCiphertext> {
    let mut session = AesCtr::encryptor(key, rng);
    session.reserve(plaintext.len());
    session.add_data(plaintext)?;
    session.encrypt()
}

/// Decrypts `ciphertext` in one call.
pub fn decrypt(
    key: &InternalAesKey,
    ciphertext: &[u8],
    initial_counter: [u8; BLOCK_BYTES],
) -> Result<Vec<u8>> {
    let mut session = AesCtr::decryptor(key, initial_counter);
    session.reserve(ciphertext.len());
    session.add_data(ciphertext)?;
    session.decrypt()
}
