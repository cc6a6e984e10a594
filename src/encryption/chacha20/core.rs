//! ChaCha20 core implementation
//!
//! This module provides the ChaCha20 block function as specified in
//! RFC 8439, together with HChaCha20 (the subkey derivation used by
//! XChaCha20 and SecretStream).
//!
//! Everything here works on a prepared 16-word state so that both the
//! IETF layout (32-bit counter, 96-bit nonce) and the extended layout
//! used by XChaCha20 (64-bit counter, 64-bit nonce) share one permutation.

use zeroize::Zeroize;

use crate::primitives::conv::{load_words_le, store_words_le};
use crate::primitives::ops::xor_in_place;

/// Size of one keystream block in bytes.
pub const BLOCK_BYTES: usize = 64;

/// ChaCha20 constant words.
///
/// These values correspond to the ASCII string `"expand 32-byte k"`
/// encoded as little-endian `u32` words.
pub(crate) const CHACHA20_CONSTANTS: [u32; 4] = [
    0x6170_7865, // "expa"
    0x3320_646e, // "nd 3"
    0x7962_2d32, // "2-by"
    0x6b20_6574, // "te k"
];

/// Performs one ChaCha20 quarter round.
///
/// Mixes four words of the state with addition modulo 2³², XOR, and
/// fixed left rotations of 16, 12, 8 and 7 bits.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Applies the full ChaCha20 permutation (10 double rounds).
///
/// Each double round is four column quarter rounds followed by four
/// diagonal quarter rounds. No feed-forward is applied here.
pub(crate) fn rounds(state: &mut [u32; 16]) {
    for _ in 0..10 {
        // Column rounds
        quarter_round(state, 0, 4, 8, 12);
        quarter_round(state, 1, 5, 9, 13);
        quarter_round(state, 2, 6, 10, 14);
        quarter_round(state, 3, 7, 11, 15);

        // Diagonal rounds
        quarter_round(state, 0, 5, 10, 15);
        quarter_round(state, 1, 6, 11, 12);
        quarter_round(state, 2, 7, 8, 13);
        quarter_round(state, 3, 4, 9, 14);
    }
}

/// Builds a state with the constants and key in place. Words 12..16 are
/// left at zero for the caller's counter/nonce layout.
pub(crate) fn keyed_state(key: &[u8; 32]) -> [u32; 16] {
    let mut state = [0u32; 16];
    state[0..4].copy_from_slice(&CHACHA20_CONSTANTS);
    load_words_le(key, &mut state[4..12]);
    state
}

/// Runs the permutation on a copy of `state`, adds the input back in
/// (feed-forward), and serializes the result as a keystream block.
pub(crate) fn keystream_block(state: &[u32; 16], out: &mut [u8; BLOCK_BYTES]) {
    let mut working = *state;

    rounds(&mut working);

    working
        .iter_mut()
        .zip(state)
        .for_each(|(w, s)| *w = w.wrapping_add(*s));

    store_words_le(&working, out);
    working.zeroize();
}

/// Builds an RFC 8439 (IETF) state: 32-bit counter, 96-bit nonce.
fn ietf_state(key: &[u8; 32], counter: u32, nonce: &[u8; 12]) -> [u32; 16] {
    let mut state = keyed_state(key);
    state[12] = counter;
    load_words_le(nonce, &mut state[13..16]);
    state
}

/// Generates a single 64-byte ChaCha20 keystream block (RFC 8439 §2.3).
///
/// Reusing the same `(key, nonce, counter)` tuple is catastrophic and
/// must be prevented by the caller.
pub fn block(key: &[u8; 32], counter: u32, nonce: &[u8; 12]) -> [u8; BLOCK_BYTES] {
    let mut state = ietf_state(key, counter, nonce);
    let mut out = [0u8; BLOCK_BYTES];

    keystream_block(&state, &mut out);
    state.zeroize();

    out
}

/// XORs `data` in place with the IETF ChaCha20 keystream starting at
/// block `counter`.
///
/// The 32-bit counter wraps; callers in this crate never process enough
/// blocks under one nonce for that to happen.
pub(crate) fn ietf_xor(key: &[u8; 32], nonce: &[u8; 12], counter: u32, data: &mut [u8]) {
    let mut state = ietf_state(key, counter, nonce);
    let mut keystream = [0u8; BLOCK_BYTES];

    for chunk in data.chunks_mut(BLOCK_BYTES) {
        keystream_block(&state, &mut keystream);
        state[12] = state[12].wrapping_add(1);

        xor_in_place(chunk, &keystream[..chunk.len()]);
    }

    keystream.zeroize();
    state.zeroize();
}

/// HChaCha20 subkey derivation.
///
/// Runs the ChaCha20 permutation over the key and a 128-bit nonce
/// *without* the final feed-forward, and returns words 0..4 and 12..16
/// of the permuted state as a 256-bit subkey.
pub fn hchacha20(key: &[u8; 32], nonce: &[u8; 16]) -> [u8; 32] {
    let mut state = keyed_state(key);
    load_words_le(nonce, &mut state[12..16]);

    rounds(&mut state);

    let mut subkey = [0u8; 32];
    store_words_le(&state[0..4], &mut subkey[..16]);
    store_words_le(&state[12..16], &mut subkey[16..]);

    state.zeroize();
    subkey
}
