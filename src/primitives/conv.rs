//! Endian conversions between byte slices and machine words.

/// Reads a little-endian `u32` from the first four bytes of `bytes`.
#[inline(always)]
pub fn load_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Reads a little-endian `u64` from the first eight bytes of `bytes`.
#[inline(always)]
pub fn load_u64_le(bytes: &[u8]) -> u64 {
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Fills `words` from consecutive little-endian `u32` values in `bytes`.
#[inline]
pub fn load_words_le(bytes: &[u8], words: &mut [u32]) {
    words
        .iter_mut()
        .zip(bytes.chunks_exact(4))
        .for_each(|(w, chunk)| *w = load_u32_le(chunk));
}

/// Serializes `words` as consecutive little-endian values into `out`.
#[inline]
pub fn store_words_le(words: &[u32], out: &mut [u8]) {
    out.chunks_exact_mut(4)
        .zip(words)
        .for_each(|(chunk, w)| chunk.copy_from_slice(&w.to_le_bytes()));
}

/// Interprets 16 bytes as a big-endian 128-bit integer.
#[inline]
pub fn u128_from_be(bytes: &[u8; 16]) -> u128 {
    u128::from_be_bytes(*bytes)
}

/// Increments a little-endian counter of arbitrary width, wrapping to zero.
pub fn increment_le(counter: &mut [u8]) {
    for byte in counter.iter_mut() {
        let (next, overflow) = byte.overflowing_add(1);
        *byte = next;
        if !overflow {
            return;
        }
    }
}
