use subtle::ConstantTimeEq;

/// XORs `src` into `dst` byte by byte. Both slices must have equal length.
#[inline]
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());

    dst.iter_mut().zip(src).for_each(|(d, s)| *d ^= s);
}

/// Writes `a ^ b` into `out`. All three slices must have equal length.
#[inline]
pub fn xor_into(a: &[u8], b: &[u8], out: &mut [u8]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());

    out.iter_mut()
        .zip(a.iter().zip(b))
        .for_each(|(o, (x, y))| *o = x ^ y);
}

/// Compares two byte strings without branching on their contents.
#[inline]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_helpers_agree() {
        let a = [0x0fu8, 0xf0, 0xaa];
        let b = [0xffu8, 0xff, 0x55];

        let mut out = [0u8; 3];
        xor_into(&a, &b, &mut out);

        let mut in_place = a;
        xor_in_place(&mut in_place, &b);

        assert_eq!(out, [0xf0, 0x0f, 0xff]);
        assert_eq!(out, in_place);
    }

    #[test]
    fn ct_eq_detects_single_bit() {
        assert!(ct_eq(b"same", b"same"));
        assert!(!ct_eq(b"same", b"samf"));
        assert!(!ct_eq(b"same", b"sam"));
    }
}
