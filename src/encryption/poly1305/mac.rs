//! Poly1305 one-time authenticator (RFC 8439 §2.5).
//!
//! The accumulator is kept as five 26-bit limbs so every product fits in
//! a `u64`. Messages are absorbed incrementally: partial blocks are held
//! back until either more data arrives or the tag is finalized.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::primitives::BlockBuffer;
use crate::primitives::conv::load_u32_le;

/// Poly1305 key size in bytes.
pub const KEY_BYTES: usize = 32;

/// Poly1305 tag size in bytes.
pub const TAG_BYTES: usize = 16;

const LIMB_MASK: u32 = 0x3ff_ffff;

/// Incremental Poly1305 state.
///
/// A fresh instance must be created for each message; the one-time key
/// must never authenticate two different messages.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    /// Clamped `r`, five 26-bit limbs.
    r: [u32; 5],
    /// Accumulator `h`, five 26-bit limbs.
    h: [u32; 5],
    /// `s`, added to the accumulator at finalization.
    s: [u8; 16],
    pending: BlockBuffer<16>,
}

impl Poly1305 {
    /// Creates a new instance from a 32-byte one-time key.
    ///
    /// `key[0..16]` is clamped into `r`; `key[16..32]` becomes `s`.
    pub fn new(one_time_key: &[u8; KEY_BYTES]) -> Self {
        let r0 = load_u32_le(&one_time_key[0..4]) & 0x0fff_ffff;
        let r1 = load_u32_le(&one_time_key[4..8]) & 0x0fff_fffc;
        let r2 = load_u32_le(&one_time_key[8..12]) & 0x0fff_fffc;
        let r3 = load_u32_le(&one_time_key[12..16]) & 0x0fff_fffc;

        let r = [
            r0 & LIMB_MASK,
            ((r0 >> 26) | (r1 << 6)) & LIMB_MASK,
            ((r1 >> 20) | (r2 << 12)) & LIMB_MASK,
            ((r2 >> 14) | (r3 << 18)) & LIMB_MASK,
            (r3 >> 8) & LIMB_MASK,
        ];

        let mut s = [0u8; 16];
        s.copy_from_slice(&one_time_key[16..32]);

        Self {
            r,
            h: [0; 5],
            s,
            pending: BlockBuffer::new(),
        }
    }

    /// Absorbs `data` into the accumulator.
    pub fn update(&mut self, data: &[u8]) {
        let r = &self.r;
        let h = &mut self.h;

        self.pending.feed(data, |block| absorb_block(h, r, block));
    }

    /// Absorbs `len` zero bytes if needed to reach a 16-byte boundary.
    ///
    /// `len` is the length of the data absorbed since the last boundary.
    pub(crate) fn pad16(&mut self, len: usize) {
        let rem = len % 16;
        if rem != 0 {
            self.update(&[0u8; 16][..16 - rem]);
        }
    }

    /// Finalizes the computation and returns the 16-byte tag.
    ///
    /// 1. Absorbs any buffered partial block
    /// 2. Fully reduces the accumulator modulo 2^130 - 5 (constant time)
    /// 3. Adds `s` modulo 2^128
    pub fn finalize(mut self) -> [u8; TAG_BYTES] {
        if !self.pending.pending().is_empty() {
            let mut tail = [0u8; 16];
            let len = self.pending.pending().len();
            tail[..len].copy_from_slice(self.pending.pending());
            absorb_block(&mut self.h, &self.r, &tail[..len]);
            tail.zeroize();
            self.pending.clear();
        }

        let h = &mut self.h;
        let mut c: u32;

        c = h[1] >> 26;
        h[1] &= LIMB_MASK;
        h[2] += c;

        c = h[2] >> 26;
        h[2] &= LIMB_MASK;
        h[3] += c;

        c = h[3] >> 26;
        h[3] &= LIMB_MASK;
        h[4] += c;

        c = h[4] >> 26;
        h[4] &= LIMB_MASK;
        h[0] += c * 5;

        c = h[0] >> 26;
        h[0] &= LIMB_MASK;
        h[1] += c;

        // g = h + 5; if that overflows 2^130 then h >= p and g - 2^130 is
        // the reduced value.
        let mut g = [0u32; 5];
        g[0] = h[0].wrapping_add(5);
        c = g[0] >> 26;
        g[0] &= LIMB_MASK;

        for (h_i, g_i) in h[1..].iter().zip(&mut g[1..]) {
            *g_i = h_i.wrapping_add(c);
            c = *g_i >> 26;
            *g_i &= LIMB_MASK;
        }

        let mask = 0u32.wrapping_sub(c);
        for (h_i, g_i) in h.iter_mut().zip(&g) {
            *h_i = (*h_i & !mask) | (*g_i & mask);
        }
        g.zeroize();

        let words = [
            h[0] | (h[1] << 26),
            (h[1] >> 6) | (h[2] << 20),
            (h[2] >> 12) | (h[3] << 14),
            (h[3] >> 18) | (h[4] << 8),
        ];

        let mut acc = 0u128;
        for (i, w) in words.iter().enumerate() {
            acc |= (*w as u128) << (32 * i);
        }

        acc.wrapping_add(u128::from_le_bytes(self.s)).to_le_bytes()
    }
}

/// `h = (h + block) * r mod (2^130 - 5)` for one block of at most 16
/// bytes, with the implicit high bit appended after the last byte.
fn absorb_block(h: &mut [u32; 5], r: &[u32; 5], block: &[u8]) {
    let mut padded = [0u8; 17];
    padded[..block.len()].copy_from_slice(block);
    padded[block.len()] = 1;

    let t0 = load_u32_le(&padded[0..4]);
    let t1 = load_u32_le(&padded[4..8]);
    let t2 = load_u32_le(&padded[8..12]);
    let t3 = load_u32_le(&padded[12..16]);
    let t4 = padded[16] as u32;
    padded.zeroize();

    h[0] = h[0].wrapping_add(t0 & LIMB_MASK);
    h[1] = h[1].wrapping_add(((t0 >> 26) | (t1 << 6)) & LIMB_MASK);
    h[2] = h[2].wrapping_add(((t1 >> 20) | (t2 << 12)) & LIMB_MASK);
    h[3] = h[3].wrapping_add(((t2 >> 14) | (t3 << 18)) & LIMB_MASK);
    h[4] = h[4].wrapping_add(((t3 >> 8) | (t4 << 24)) & LIMB_MASK);

    let [h0, h1, h2, h3, h4] = h.map(u64::from);
    let [r0, r1, r2, r3, r4] = r.map(u64::from);

    let r1_5 = r1 * 5;
    let r2_5 = r2 * 5;
    let r3_5 = r3 * 5;
    let r4_5 = r4 * 5;

    let d0 = h0 * r0 + h1 * r4_5 + h2 * r3_5 + h3 * r2_5 + h4 * r1_5;
    let mut d1 = h0 * r1 + h1 * r0 + h2 * r4_5 + h3 * r3_5 + h4 * r2_5;
    let mut d2 = h0 * r2 + h1 * r1 + h2 * r0 + h3 * r4_5 + h4 * r3_5;
    let mut d3 = h0 * r3 + h1 * r2 + h2 * r1 + h3 * r0 + h4 * r4_5;
    let mut d4 = h0 * r4 + h1 * r3 + h2 * r2 + h3 * r1 + h4 * r0;

    let mut c: u64;

    c = d0 >> 26;
    h[0] = (d0 & LIMB_MASK as u64) as u32;
    d1 += c;

    c = d1 >> 26;
    h[1] = (d1 & LIMB_MASK as u64) as u32;
    d2 += c;

    c = d2 >> 26;
    h[2] = (d2 & LIMB_MASK as u64) as u32;
    d3 += c;

    c = d3 >> 26;
    h[3] = (d3 & LIMB_MASK as u64) as u32;
    d4 += c;

    c = d4 >> 26;
    h[4] = (d4 & LIMB_MASK as u64) as u32;
    h[0] += (c * 5) as u32;

    c = (h[0] >> 26) as u64;
    h[0] &= LIMB_MASK;
    h[1] += c as u32;
}

/// Computes the Poly1305 tag of `msg` under a one-time key.
pub fn poly1305(one_time_key: &[u8; KEY_BYTES], msg: &[u8]) -> [u8; TAG_BYTES] {
    let mut mac = Poly1305::new(one_time_key);
    mac.update(msg);
    mac.finalize()
}
