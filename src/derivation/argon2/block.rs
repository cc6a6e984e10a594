//! The 1024-byte Argon2 block and the compression function G.

use zeroize::Zeroize;

use crate::primitives::conv::load_u64_le;

/// Words per block.
pub(crate) const BLOCK_WORDS: usize = 128;

/// Bytes per block.
pub(crate) const BLOCK_BYTES: usize = 1024;

/// A 1024-byte memory block (128 little-endian 64-bit words).
///
/// Zeroed on drop, so a matrix of blocks is wiped on every exit path.
#[derive(Clone)]
pub(crate) struct Block(pub(crate) [u64; BLOCK_WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; BLOCK_WORDS]);

    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let mut block = Self::ZERO;
        block
            .0
            .iter_mut()
            .zip(bytes.chunks_exact(8))
            .for_each(|(word, chunk)| *word = load_u64_le(chunk));
        block
    }

    pub(crate) fn to_bytes(&self) -> [u8; BLOCK_BYTES] {
        let mut out = [0u8; BLOCK_BYTES];
        out.chunks_exact_mut(8)
            .zip(self.0.iter())
            .for_each(|(chunk, word)| chunk.copy_from_slice(&word.to_le_bytes()));
        out
    }

    pub(crate) fn in_place_xor(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// `R = X ⊕ Y`, then P over the eight rows of 16 words, then P over
    /// the eight columns of 2-word pairs, and finally the result is XORed
    /// with `R` again.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = x.clone();
        r.in_place_xor(y);

        let mut q = r.clone();

        for row in 0..8 {
            permute_at(&mut q.0, core::array::from_fn(|k| 16 * row + k));
        }

        for column in 0..8 {
            permute_at(
                &mut q.0,
                core::array::from_fn(|k| 2 * column + 16 * (k / 2) + (k % 2)),
            );
        }

        q.in_place_xor(&r);
        q
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Gathers the 16 words at `indices`, applies P, and scatters them back.
#[inline(always)]
fn permute_at(words: &mut [u64; BLOCK_WORDS], indices: [usize; 16]) {
    let mut v = indices.map(|i| words[i]);
    permute_p(&mut v);
    for (value, &i) in v.iter().zip(indices.iter()) {
        words[i] = *value;
    }
    v.zeroize();
}

/// `x + y + 2 · lo32(x) · lo32(y)`, the multiply-hardened addition that
/// replaces BLAKE2b's message addition.
#[inline(always)]
fn blamka(x: u64, y: u64) -> u64 {
    let product = (x & 0xffff_ffff).wrapping_mul(y & 0xffff_ffff);
    x.wrapping_add(y).wrapping_add(product.wrapping_mul(2))
}

#[inline(always)]
fn gb(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize) {
    v[a] = blamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = blamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = blamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = blamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// One BLAKE2b round over a 4×4 word matrix: columns, then diagonals.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    gb(v, 0, 4, 8, 12);
    gb(v, 1, 5, 9, 13);
    gb(v, 2, 6, 10, 14);
    gb(v, 3, 7, 11, 15);

    gb(v, 0, 5, 10, 15);
    gb(v, 1, 6, 11, 12);
    gb(v, 2, 7, 8, 13);
    gb(v, 3, 4, 9, 14);
}
