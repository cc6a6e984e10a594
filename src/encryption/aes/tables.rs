//! AES substitution tables.
//!
//! The S-box is generated at compile time from its definition: the
//! multiplicative inverse in GF(2^8) (reduction polynomial
//! x^8 + x^4 + x^3 + x + 1) followed by the affine transform with
//! constant 0x63.

/// Multiplies two elements of GF(2^8) without data-dependent branches.
pub(crate) const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    let mut i = 0;

    while i < 8 {
        product ^= a & 0u8.wrapping_sub(b & 1);
        let high = a >> 7;
        a = (a << 1) ^ (0x1b & 0u8.wrapping_sub(high));
        b >>= 1;
        i += 1;
    }

    product
}

/// Multiplicative inverse in GF(2^8), computed as x^254. Maps 0 to 0.
const fn gf_inv(x: u8) -> u8 {
    let mut result = 1u8;
    let mut base = x;
    let mut exp = 254u8;

    while exp > 0 {
        if exp & 1 == 1 {
            result = gf_mul(result, base);
        }
        base = gf_mul(base, base);
        exp >>= 1;
    }

    result
}

const fn build_sbox() -> [u8; 256] {
    let mut sbox = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let inv = gf_inv(i as u8);
        sbox[i] = inv
            ^ inv.rotate_left(1)
            ^ inv.rotate_left(2)
            ^ inv.rotate_left(3)
            ^ inv.rotate_left(4)
            ^ 0x63;
        i += 1;
    }

    sbox
}

const fn build_inv_sbox(sbox: &[u8; 256]) -> [u8; 256] {
    let mut inv = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        inv[sbox[i] as usize] = i as u8;
        i += 1;
    }

    inv
}

/// Forward S-box.
pub(crate) const SBOX: [u8; 256] = build_sbox();

/// Inverse S-box.
pub(crate) const INV_SBOX: [u8; 256] = build_inv_sbox(&SBOX);

/// Round constants for the key schedule (x^(i-1) in GF(2^8)).
pub(crate) const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];
