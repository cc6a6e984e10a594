//! XChaCha20 stream cipher.
//!
//! XChaCha20 extends ChaCha20's nonce to 192 bits: HChaCha20 turns the key
//! and the first 16 nonce bytes into a subkey, and regular ChaCha20 runs
//! under that subkey with the remaining 8 nonce bytes. The block counter
//! occupies state words 12 and 13, so it behaves as a 64-bit counter that
//! carries from the low word into the high one.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::core::{BLOCK_BYTES, hchacha20, keyed_state, keystream_block};
use crate::primitives::conv::load_words_le;
use crate::primitives::ops::xor_in_place;

/// Key size in bytes.
pub const KEY_BYTES: usize = 32;

/// Extended nonce size in bytes.
pub const NONCE_BYTES: usize = 24;

/// Incremental XChaCha20 session.
///
/// Keystream bytes left over from a partially consumed block are kept
/// between calls, so splitting a message into arbitrary pieces produces
/// exactly the same output as processing it in one call.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct XChaCha20 {
    state: [u32; 16],
    keystream: [u8; BLOCK_BYTES],
    /// Unused bytes at the end of `keystream`.
    remaining: usize,
    processed: u64,
}

impl XChaCha20 {
    /// Creates a session for `key` and `nonce`, starting at block
    /// `initial_counter`.
    pub fn new(key: &[u8; KEY_BYTES], nonce: &[u8; NONCE_BYTES], initial_counter: u32) -> Self {
        let mut hnonce = [0u8; 16];
        hnonce.copy_from_slice(&nonce[..16]);

        let mut subkey = hchacha20(key, &hnonce);
        let mut state = keyed_state(&subkey);
        subkey.zeroize();

        state[12] = initial_counter;
        state[13] = 0;
        load_words_le(&nonce[16..], &mut state[14..16]);

        Self {
            state,
            keystream: [0u8; BLOCK_BYTES],
            remaining: 0,
            processed: 0,
        }
    }

    /// XORs `data` in place with the next bytes of keystream.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        let mut offset = 0;

        while offset < data.len() {
            if self.remaining == 0 {
                self.refill();
            }

            let start = BLOCK_BYTES - self.remaining;
            let take = self.remaining.min(data.len() - offset);

            xor_in_place(
                &mut data[offset..offset + take],
                &self.keystream[start..start + take],
            );

            self.remaining -= take;
            offset += take;
        }

        self.processed += data.len() as u64;
    }

    /// Returns `data` XORed with the next bytes of keystream.
    ///
    /// Encryption and decryption are the same operation.
    pub fn xor_with_keystream(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream(&mut out);
        out
    }

    /// Total number of bytes processed by this session so far.
    pub fn processed_bytes(&self) -> u64 {
        self.processed
    }

    /// Produces the next keystream block and advances the 64-bit counter.
    fn refill(&mut self) {
        keystream_block(&self.state, &mut self.keystream);
        self.remaining = BLOCK_BYTES;

        self.state[12] = self.state[12].wrapping_add(1);
        if self.state[12] == 0 {
            self.state[13] = self.state[13].wrapping_add(1);
        }
    }
}

/// One-shot XChaCha20: XORs `message` with the keystream of a fresh
/// session starting at `initial_counter`.
pub fn xor_with_keystream(
    key: &[u8; KEY_BYTES],
    nonce: &[u8; NONCE_BYTES],
    message: &[u8],
    initial_counter: u32,
) -> Vec<u8> {
    XChaCha20::new(key, nonce, initial_counter).xor_with_keystream(message)
}
