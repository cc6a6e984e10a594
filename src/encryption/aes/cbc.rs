//! AES in CBC mode with PKCS#7 padding.

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Mode;
use super::block::{BLOCK_BYTES, decrypt_block, encrypt_block};
use super::key::{InternalAesKey, KeySchedule};
use crate::error::{Error, Result};
use crate::primitives::BlockBuffer;
use crate::primitives::ops::xor_in_place;

/// Ciphertext produced by a CBC encryption, with the IV it was chained from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CbcCiphertext {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; BLOCK_BYTES],
}

/// A streaming CBC session.
///
/// Data may be fed in arbitrary pieces with [`add_data`](Self::add_data);
/// full blocks are processed as soon as they are available. The session
/// is finalized exactly once with [`encrypt`](Self::encrypt) or
/// [`decrypt`](Self::decrypt), matching the direction it was built for.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesCbc {
    schedule: KeySchedule,
    #[zeroize(skip)]
    mode: Mode,
    iv: [u8; BLOCK_BYTES],
    chaining: [u8; BLOCK_BYTES],
    buffer: BlockBuffer<BLOCK_BYTES>,
    output: Vec<u8>,
    finished: bool,
}

impl AesCbc {
    fn new(key: &InternalAesKey, iv: [u8; BLOCK_BYTES], mode: Mode) -> Self {
        Self {
            schedule: KeySchedule::new(key),
            mode,
            iv,
            chaining: iv,
            buffer: BlockBuffer::new(),
            output: Vec::new(),
            finished: false,
        }
    }

    /// Encryption session with a fresh random IV.
    pub fn encryptor<R: RngCore + CryptoRng>(key: &InternalAesKey, rng: &mut R) -> Self {
        let mut iv = [0u8; BLOCK_BYTES];
        rng.fill_bytes(&mut iv);
        Self::new(key, iv, Mode::Encrypt)
    }

    /// Encryption session with a caller-chosen IV.
    ///
    /// The IV must be unpredictable and never reused under the same key.
    pub fn encryptor_with_iv(key: &InternalAesKey, iv: [u8; BLOCK_BYTES]) -> Self {
        Self::new(key, iv, Mode::Encrypt)
    }

    /// Decryption session for ciphertext produced under `iv`.
    pub fn decryptor(key: &InternalAesKey, iv: [u8; BLOCK_BYTES]) -> Self {
        Self::new(key, iv, Mode::Decrypt)
    }

    /// The IV this session chains from.
    pub fn iv(&self) -> &[u8; BLOCK_BYTES] {
        &self.iv
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
            return Err(Error::Misuse("CBC session already finalized"));
        }

        let Self {
            schedule,
            mode,
            chaining,
            buffer,
            output,
            ..
        } = self;

        buffer.absorb(data, |block| {
            process_block(schedule, *mode, chaining, output, block)
        })
    }

    /// Pads the remaining input and returns the full ciphertext.
    ///
    /// # Errors
    /// `Error::Misuse` if the session decrypts or was already finalized.
    pub fn encrypt(&mut self) -> Result<CbcCiphertext> {
        self.finish(Mode::Encrypt)?;

        let pending = self.buffer.pending();
        let pad = (BLOCK_BYTES - pending.len()) as u8;

        let mut last = [pad; BLOCK_BYTES];
        last[..pending.len()].copy_from_slice(pending);
        self.buffer.clear();

        process_block(
            &self.schedule,
            self.mode,
            &mut self.chaining,
            &mut self.output,
            &last,
        )?;
        last.zeroize();

        tracing::trace!(bytes = self.output.len(), "cbc encryption finalized");

        Ok(CbcCiphertext {
            ciphertext: core::mem::take(&mut self.output),
            iv: self.iv,
        })
    }

    /// Strips the padding and returns the plaintext.
    ///
    /// No plaintext is released when the padding is invalid.
    ///
    /// # Errors
    /// - `Error::Misuse` if the session encrypts or was already finalized
    /// - `Error::Format` for empty or misaligned ciphertext, or bad padding
    pub fn decrypt(&mut self) -> Result<Vec<u8>> {
        self.finish(Mode::Decrypt)?;

        let result = self.strip_padding();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "cbc decryption rejected");
            self.output.zeroize();
        }
        self.buffer.clear();

        result
    }

    fn finish(&mut self, expected: Mode) -> Result<()> {
        if self.mode != expected {
            return Err(Error::Misuse("CBC session built for the other direction"));
        }
        if self.finished {
            return Err(Error::Misuse("CBC session already finalized"));
        }
        self.finished = true;
        Ok(())
    }

    fn strip_padding(&mut self) -> Result<Vec<u8>> {
        if !self.buffer.pending().is_empty() {
            return Err(Error::Format("ciphertext is not a multiple of the block size"));
        }

        let pad = match self.output.last() {
            Some(&pad) => pad as usize,
            None => return Err(Error::Format("ciphertext is empty")),
        };

        if pad == 0 || pad > BLOCK_BYTES {
            return Err(Error::Format("invalid PKCS#7 padding length"));
        }

        let body = self.output.len() - pad;
        if self.output[body..].iter().any(|&b| b as usize != pad) {
            return Err(Error::Format("invalid PKCS#7 padding bytes"));
        }

        self.output.truncate(body);
        Ok(core::mem::take(&mut self.output))
    }
}

fn process_block(
    schedule: &KeySchedule,
    mode: Mode,
    chaining: &mut [u8; BLOCK_BYTES],
    output: &mut Vec<u8>,
    block: &[u8; BLOCK_BYTES],
) -> Result<()> {
    match mode {
        Mode::Encrypt => {
            let mut mixed = *block;
            xor_in_place(&mut mixed, &chaining[..]);
            let ciphertext = encrypt_block(schedule, &mixed)?;
            mixed.zeroize();

            output.extend_from_slice(&ciphertext);
            *chaining = ciphertext;
        }
        Mode::Decrypt => {
            let mut plaintext = decrypt_block(schedule, block)?;
            xor_in_place(&mut plaintext, &chaining[..]);

            output.extend_from_slice(&plaintext);
            plaintext.zeroize();
            *chaining = *block;
        }
    }
    Ok(())
}

/// Encrypts `plaintext` in one call under a fresh random IV.
pub fn encrypt<R: RngCore + CryptoRng>(
    key: &InternalAesKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<CbcCiphertext> {
    let mut session = AesCbc::encryptor(key, rng);
    session.reserve(plaintext.len() + BLOCK_BYTES);
    session.add_data(plaintext)?;
    session.encrypt()
}

/// Decrypts `ciphertext` in one call.
pub fn decrypt(
    key: &InternalAesKey,
    ciphertext: &[u8],
    iv: [u8; BLOCK_BYTES],
) -> Result<Vec<u8>> {
    let mut session = AesCbc::decryptor(key, iv);
    session.reserve(ciphertext.len());
    session.add_data(ciphertext)?;
    session.decrypt()
}
