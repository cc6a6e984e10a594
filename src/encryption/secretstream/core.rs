//! Chunked authenticated encryption stream (XChaCha20-Poly1305 framing).
//!
//! A stream is opened with a random 24-byte header. HChaCha20 turns the
//! key and the first 16 header bytes into a stream subkey; the last 8
//! header bytes seed an inner nonce. Each chunk is then sealed with
//! ChaCha20-IETF + Poly1305 under the 96-bit nonce `counter || inonce`.
//!
//! Chunk layout on the wire: `E(tag) || E(message) || mac`, i.e. 17 bytes
//! of overhead. The tag byte is encrypted as the first byte of a full
//! 64-byte keystream block (block 1), and that whole block is fed to the
//! MAC, so the tag is both confidential and authenticated. Message bytes
//! start at keystream block 2.
//!
//! After every chunk the first 8 MAC bytes are XORed into the inner nonce
//! and the counter is incremented. Because the next chunk's nonce depends
//! on the previous MAC, reordering, dropping, or replaying chunks breaks
//! verification of everything that follows.

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encryption::chacha20::core::{block, hchacha20, ietf_xor};
use crate::encryption::poly1305::Poly1305;
use crate::error::{Error, Result};
use crate::primitives::conv::increment_le;
use crate::primitives::ops::{ct_eq, xor_in_place};

/// Stream key size in bytes.
pub const KEY_BYTES: usize = 32;

/// Header size in bytes.
pub const HEADER_BYTES: usize = 24;

/// Per-chunk overhead: one encrypted tag byte plus a 16-byte MAC.
pub const ABYTES: usize = 1 + 16;

/// Largest message a single chunk may carry.
pub const MESSAGE_BYTES_MAX: u64 = 64 * ((1u64 << 32) - 2);

const COUNTER_BYTES: usize = 4;
const INONCE_BYTES: usize = 8;
const MAC_BYTES: usize = 16;

/// Chunk tag, authenticated together with the chunk.
///
/// The bit layout follows the reference construction: bit 0 marks the end
/// of a logical message in the stream, bit 1 forces a rekey after the
/// chunk. `Final` sets both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Ordinary chunk.
    Message = 0x00,
    /// End of a set of chunks; the stream continues.
    Push = 0x01,
    /// Rekey after this chunk.
    Rekey = 0x02,
    /// Last chunk of the stream. Implies a rekey.
    Final = 0x03,
}

impl Tag {
    const REKEY_BIT: u8 = 0x02;

    /// The on-wire byte for this tag.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parses a tag byte, rejecting values outside the known set.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Tag::Message),
            0x01 => Some(Tag::Push),
            0x02 => Some(Tag::Rekey),
            0x03 => Some(Tag::Final),
            _ => None,
        }
    }

    fn forces_rekey(byte: u8) -> bool {
        byte & Self::REKEY_BIT != 0
    }
}

/// Per-stream cipher state.
///
/// Owned by exactly one side of one stream and advanced strictly in
/// order.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretStreamState {
    key: [u8; KEY_BYTES],
    /// `counter (LE32) || inonce`, used directly as the ChaCha20-IETF nonce.
    nonce: [u8; COUNTER_BYTES + INONCE_BYTES],
}

impl SecretStreamState {
    fn from_header(key: &[u8; KEY_BYTES], header: &[u8; HEADER_BYTES]) -> Self {
        let mut hnonce = [0u8; 16];
        hnonce.copy_from_slice(&header[..16]);

        let mut state = Self {
            key: hchacha20(key, &hnonce),
            nonce: [0u8; COUNTER_BYTES + INONCE_BYTES],
        };
        state.reset_counter();
        state.nonce[COUNTER_BYTES..].copy_from_slice(&header[16..]);

        state
    }

    fn reset_counter(&mut self) {
        self.nonce[..COUNTER_BYTES].fill(0);
        self.nonce[0] = 1;
    }

    fn counter_is_zero(&self) -> bool {
        self.nonce[..COUNTER_BYTES].iter().all(|&b| b == 0)
    }

    /// Replaces the stream key and inner nonce with fresh values derived
    /// from the current ones, and resets the counter.
    ///
    /// Both sides must rekey at the same position in the stream. This is
    /// done automatically after a chunk tagged `Rekey`/`Final` and when the
    /// counter wraps.
    pub fn rekey(&mut self) {
        let mut material = [0u8; KEY_BYTES + INONCE_BYTES];
        material[..KEY_BYTES].copy_from_slice(&self.key);
        material[KEY_BYTES..].copy_from_slice(&self.nonce[COUNTER_BYTES..]);

        ietf_xor(&self.key, &self.nonce, 0, &mut material);

        self.key.copy_from_slice(&material[..KEY_BYTES]);
        self.nonce[COUNTER_BYTES..].copy_from_slice(&material[KEY_BYTES..]);
        self.reset_counter();

        material.zeroize();
        tracing::debug!("secretstream rekeyed");
    }

    /// Starts the chunk MAC: Poly1305 keyed from keystream block 0, with
    /// the associated data and its padding absorbed.
    fn chunk_mac(&self, associated_data: &[u8]) -> Poly1305 {
        let mut block0 = block(&self.key, 0, &self.nonce);
        let mut otk = [0u8; 32];
        otk.copy_from_slice(&block0[..32]);
        block0.zeroize();

        let mut mac = Poly1305::new(&otk);
        otk.zeroize();

        mac.update(associated_data);
        mac.pad16(associated_data.len());
        mac
    }

    /// The 64-byte block carrying the tag: `[tag_byte, 0, ..] ^ keystream(1)`.
    fn tag_block(&self, tag_byte: u8) -> [u8; 64] {
        let mut tag_block = [0u8; 64];
        tag_block[0] = tag_byte;
        ietf_xor(&self.key, &self.nonce, 1, &mut tag_block);
        tag_block
    }

    fn finish_mac(mut mac: Poly1305, associated_len: usize, message_len: usize) -> [u8; 16] {
        // The wire format pads with `(16 - 64 + mlen) & 15` zero bytes, which
        // is `mlen % 16` and not the usual pad to a 16-byte boundary.
        let pad_len = 16usize.wrapping_sub(64).wrapping_add(message_len) & 0xf;
        mac.update(&[0u8; 16][..pad_len]);
        mac.update(&(associated_len as u64).to_le_bytes());
        mac.update(&((64 + message_len) as u64).to_le_bytes());
        mac.finalize()
    }

    /// Folds a chunk's MAC into the inner nonce and moves to the next chunk.
    fn advance(&mut self, mac: &[u8; MAC_BYTES], tag_byte: u8) {
        xor_in_place(&mut self.nonce[COUNTER_BYTES..], &mac[..INONCE_BYTES]);
        increment_le(&mut self.nonce[..COUNTER_BYTES]);

        if Tag::forces_rekey(tag_byte) || self.counter_is_zero() {
            self.rekey();
        }
    }

    /// Encrypts and authenticates one chunk.
    ///
    /// Returns `message.len() + ABYTES` bytes.
    pub fn push(&mut self, message: &[u8], associated_data: &[u8], tag: Tag) -> Result<Vec<u8>> {
        if message.len() as u64 > MESSAGE_BYTES_MAX {
            return Err(Error::InvalidParameter("secretstream chunk too large"));
        }

        let mut mac = self.chunk_mac(associated_data);

        let mut tag_block = self.tag_block(tag.as_byte());
        mac.update(&tag_block);

        let mut out = Vec::with_capacity(message.len() + ABYTES);
        out.push(tag_block[0]);
        tag_block.zeroize();

        out.extend_from_slice(message);
        ietf_xor(&self.key, &self.nonce, 2, &mut out[1..]);
        mac.update(&out[1..]);

        let mac = Self::finish_mac(mac, associated_data.len(), message.len());
        out.extend_from_slice(&mac);

        self.advance(&mac, tag.as_byte());
        Ok(out)
    }

    /// Verifies and decrypts one chunk, returning the message and its tag.
    ///
    /// On any failure the state is left untouched and no plaintext is
    /// returned.
    pub fn pull(&mut self, ciphertext: &[u8], associated_data: &[u8]) -> Result<(Vec<u8>, Tag)> {
        if ciphertext.len() < ABYTES {
            return Err(Error::Format("secretstream chunk shorter than its overhead"));
        }

        let message_len = ciphertext.len() - ABYTES;
        let encrypted_tag = ciphertext[0];
        let body = &ciphertext[1..1 + message_len];
        let stored_mac = &ciphertext[1 + message_len..];

        let mut mac = self.chunk_mac(associated_data);

        let mut tag_block = self.tag_block(0);
        let tag_byte = tag_block[0] ^ encrypted_tag;
        tag_block[0] = encrypted_tag;
        mac.update(&tag_block);
        tag_block.zeroize();

        mac.update(body);
        let mut computed = Self::finish_mac(mac, associated_data.len(), message_len);

        if !ct_eq(&computed, stored_mac) {
            computed.zeroize();
            tracing::warn!("secretstream chunk failed authentication");
            return Err(Error::AuthenticationFailure);
        }

        let Some(tag) = Tag::from_byte(tag_byte) else {
            computed.zeroize();
            tracing::warn!(tag_byte, "secretstream chunk carries an unknown tag");
            return Err(Error::Format("unknown secretstream tag"));
        };

        let mut message = body.to_vec();
        ietf_xor(&self.key, &self.nonce, 2, &mut message);

        self.advance(&computed, tag_byte);
        Ok((message, tag))
    }
}

/// Generates a random stream key.
pub fn keygen<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; KEY_BYTES] {
    let mut key = [0u8; KEY_BYTES];
    rng.fill_bytes(&mut key);
    key
}

/// Opens the sending side of a stream.
///
/// Returns the state and the header that must be transmitted to the
/// receiver before the first chunk.
pub fn init_push<R: RngCore + CryptoRng>(
    key: &[u8; KEY_BYTES],
    rng: &mut R,
) -> (SecretStreamState, [u8; HEADER_BYTES]) {
    let mut header = [0u8; HEADER_BYTES];
    rng.fill_bytes(&mut header);

    (SecretStreamState::from_header(key, &header), header)
}

/// Opens the receiving side of a stream from the sender's header.
pub fn init_pull(key: &[u8; KEY_BYTES], header: &[u8; HEADER_BYTES]) -> SecretStreamState {
    SecretStreamState::from_header(key, header)
}

/// Encrypts one chunk. See [`SecretStreamState::push`].
pub fn push(
    state: &mut SecretStreamState,
    message: &[u8],
    associated_data: &[u8],
    tag: Tag,
) -> Result<Vec<u8>> {
    state.push(message, associated_data, tag)
}

/// Decrypts one chunk. See [`SecretStreamState::pull`].
pub fn pull(
    state: &mut SecretStreamState,
    ciphertext: &[u8],
    associated_data: &[u8],
) -> Result<(Vec<u8>, Tag)> {
    state.pull(ciphertext, associated_data)
}
