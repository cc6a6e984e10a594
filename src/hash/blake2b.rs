//! BLAKE2b and the Argon2 variable-length hash H'.

use blake2::Blake2bVar;
use blake2::digest::{Update, VariableOutput};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Largest digest BLAKE2b can produce in a single invocation.
pub(crate) const BLAKE2B_MAX_OUT: usize = 64;

/// Half of a full BLAKE2b digest; H' emits this much per chained hash.
const HALF_OUT: usize = 32;

/// Hashes the concatenation of `parts` into `out` (1..=64 bytes).
pub(crate) fn blake2b_into(out: &mut [u8], parts: &[&[u8]]) -> Result<()> {
    if out.is_empty() {
        return Err(Error::InvalidParameter("blake2b output must be 1..=64 bytes"));
    }

    let mut hasher = Blake2bVar::new(out.len())
        .map_err(|_| Error::InvalidParameter("blake2b output must be 1..=64 bytes"))?;

    for part in parts {
        hasher.update(part);
    }

    hasher
        .finalize_variable(out)
        .map_err(|_| Error::InvalidParameter("blake2b output must be 1..=64 bytes"))
}

/// Computes an unkeyed BLAKE2b digest of `out_len` bytes (1..=64).
pub fn blake2b(out_len: usize, input: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; out_len];
    blake2b_into(&mut out, &[input])?;
    Ok(out)
}

/// Variable-length hash H' (RFC 9106 §3.3) over the concatenation of `parts`.
///
/// Outputs of at most 64 bytes are a single BLAKE2b call over
/// `LE32(len) || X`. Longer outputs chain 64-byte digests, keeping the
/// first half of each and emitting the final digest in full.
pub(crate) fn blake2b_long_into(out: &mut [u8], parts: &[&[u8]]) -> Result<()> {
    if out.is_empty() {
        return Err(Error::InvalidParameter("H' output must not be empty"));
    }

    let out_len = u32::try_from(out.len())
        .map_err(|_| Error::InvalidParameter("H' output length exceeds u32"))?;
    let prefix = out_len.to_le_bytes();

    let mut input: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
    input.push(&prefix);
    input.extend_from_slice(parts);

    if out.len() <= BLAKE2B_MAX_OUT {
        return blake2b_into(out, &input);
    }

    // r = ceil(T / 32) - 2 full-width rounds, then one tail digest.
    let rounds = out.len().div_ceil(HALF_OUT) - 2;

    let mut v = [0u8; BLAKE2B_MAX_OUT];
    blake2b_into(&mut v, &input)?;
    out[..HALF_OUT].copy_from_slice(&v[..HALF_OUT]);

    for i in 1..rounds {
        let prev = v;
        blake2b_into(&mut v, &[&prev[..]])?;
        out[i * HALF_OUT..(i + 1) * HALF_OUT].copy_from_slice(&v[..HALF_OUT]);
    }

    let tail_start = rounds * HALF_OUT;
    let prev = v;
    blake2b_into(&mut out[tail_start..], &[&prev[..]])?;

    v.zeroize();
    Ok(())
}

/// Computes H' with an output of `out_len` bytes.
pub fn blake2b_long(out_len: usize, input: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; out_len];
    blake2b_long_into(&mut out, &[input])?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_part_matches_concatenation() {
        let mut split = [0u8; 48];
        let mut joined = [0u8; 48];

        blake2b_into(&mut split, &[&b"hello "[..], &b"world"[..]]).unwrap();
        blake2b_into(&mut joined, &[&b"hello world"[..]]).unwrap();

        assert_eq!(split, joined);
    }

    #[test]
    fn short_h_prime_is_prefixed_blake2b() {
        let direct = blake2b_long(32, b"data").unwrap();

        let mut expected = [0u8; 32];
        blake2b_into(&mut expected, &[&32u32.to_le_bytes()[..], &b"data"[..]]).unwrap();

        assert_eq!(direct, expected);
    }

    #[test]
    fn long_h_prime_chains_digests() {
        let out = blake2b_long(100, b"data").unwrap();
        assert_eq!(out.len(), 100);

        // r = ceil(100 / 32) - 2 = 2
        let mut v1 = [0u8; 64];
        blake2b_into(&mut v1, &[&100u32.to_le_bytes()[..], &b"data"[..]]).unwrap();
        let mut v2 = [0u8; 64];
        blake2b_into(&mut v2, &[&v1[..]]).unwrap();
        let mut v3 = [0u8; 36];
        blake2b_into(&mut v3, &[&v2[..]]).unwrap();

        assert_eq!(&out[..32], &v1[..32]);
        assert_eq!(&out[32..64], &v2[..32]);
        assert_eq!(&out[64..], &v3[..]);
    }

    #[test]
    fn rejects_oversized_single_digest() {
        assert!(blake2b(65, b"x").is_err());
        assert!(blake2b(0, b"x").is_err());
    }

    #[test]
    fn rejects_empty_h_prime() {
        assert_eq!(
            blake2b_long(0, b"x"),
            Err(Error::InvalidParameter("H' output must not be empty"))
        );
    }
}
