//! XChaCha20-Poly1305 authenticated encryption (IETF construction).
//!
//! The RFC 8439 ChaCha20-Poly1305 AEAD run under an HChaCha20 subkey, so
//! that random 192-bit nonces can be used safely:
//!
//! 1. `subkey = HChaCha20(key, nonce[0..16])`
//! 2. `nonce' = 0x00000000 || nonce[16..24]`
//! 3. Poly1305 key = first 32 bytes of `ChaCha20(subkey, nonce', 0)`
//! 4. ciphertext = `ChaCha20(subkey, nonce', 1..) ^ plaintext`
//! 5. tag = Poly1305(AD || pad16 || C || pad16 || LE64(|AD|) || LE64(|C|))

use zeroize::Zeroize;

use super::mac::{Poly1305, TAG_BYTES};
use crate::encryption::chacha20::core::{block, hchacha20, ietf_xor};
use crate::error::{Error, Result};
use crate::primitives::ops::ct_eq;

/// Key size in bytes.
pub const KEY_BYTES: usize = 32;

/// Nonce size in bytes.
pub const NONCE_BYTES: usize = 24;

/// Authentication tag size in bytes.
pub const ABYTES: usize = TAG_BYTES;

/// Derives the per-nonce subkey and the 96-bit IETF nonce.
fn subkey_and_nonce(key: &[u8; KEY_BYTES], nonce: &[u8; NONCE_BYTES]) -> ([u8; 32], [u8; 12]) {
    let mut hnonce = [0u8; 16];
    hnonce.copy_from_slice(&nonce[..16]);

    let mut ietf_nonce = [0u8; 12];
    ietf_nonce[4..].copy_from_slice(&nonce[16..]);

    (hchacha20(key, &hnonce), ietf_nonce)
}

fn compute_tag(
    subkey: &[u8; 32],
    nonce: &[u8; 12],
    ciphertext: &[u8],
    associated_data: &[u8],
) -> [u8; TAG_BYTES] {
    let mut block0 = block(subkey, 0, nonce);
    let mut otk = [0u8; 32];
    otk.copy_from_slice(&block0[..32]);
    block0.zeroize();

    let mut mac = Poly1305::new(&otk);
    otk.zeroize();

    mac.update(associated_data);
    mac.pad16(associated_data.len());
    mac.update(ciphertext);
    mac.pad16(ciphertext.len());
    mac.update(&(associated_data.len() as u64).to_le_bytes());
    mac.update(&(ciphertext.len() as u64).to_le_bytes());

    mac.finalize()
}

/// Encrypts and authenticates `plaintext`, returning `ciphertext || tag`.
///
/// `(key, nonce)` must never be reused.
pub fn encrypt(
    key: &[u8; KEY_BYTES],
    nonce: &[u8; NONCE_BYTES],
    plaintext: &[u8],
    associated_data: &[u8],
) -> Vec<u8> {
    let (mut subkey, ietf_nonce) = subkey_and_nonce(key, nonce);

    let mut out = Vec::with_capacity(plaintext.len() + ABYTES);
    out.extend_from_slice(plaintext);
    ietf_xor(&subkey, &ietf_nonce, 1, &mut out);

    let tag = compute_tag(&subkey, &ietf_nonce, &out, associated_data);
    out.extend_from_slice(&tag);

    subkey.zeroize();
    out
}

/// Verifies and decrypts `ciphertext || tag`.
///
/// The tag is checked in constant time before anything is decrypted;
/// on failure no plaintext is produced.
pub fn decrypt(
    key: &[u8; KEY_BYTES],
    nonce: &[u8; NONCE_BYTES],
    sealed: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    if sealed.len() < ABYTES {
        return Err(Error::Format("ciphertext shorter than the authentication tag"));
    }

    let (ciphertext, tag) = sealed.split_at(sealed.len() - ABYTES);
    let (mut subkey, ietf_nonce) = subkey_and_nonce(key, nonce);

    let expected = compute_tag(&subkey, &ietf_nonce, ciphertext, associated_data);
    if !ct_eq(&expected, tag) {
        subkey.zeroize();
        tracing::warn!("xchacha20-poly1305 tag mismatch");
        return Err(Error::AuthenticationFailure);
    }

    let mut plaintext = ciphertext.to_vec();
    ietf_xor(&subkey, &ietf_nonce, 1, &mut plaintext);

    subkey.zeroize();
    Ok(plaintext)
}
