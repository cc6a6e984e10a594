//! AES key variants and the Rijndael key schedule.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::tables::{RCON, SBOX};
use crate::error::{Error, Result};

/// Largest number of rounds (AES-256).
const MAX_ROUNDS: usize = 14;

/// An AES key, tagged with its size.
///
/// The variant fixes the key word count (4, 6 or 8) and therefore the
/// number of rounds (10, 12 or 14). Key bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub enum InternalAesKey {
    /// 128-bit key.
    Aes128([u8; 16]),
    /// 192-bit key.
    Aes192([u8; 24]),
    /// 256-bit key.
    Aes256([u8; 32]),
}

impl InternalAesKey {
    /// Builds a key from raw bytes; the length selects the variant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            16 => {
                let mut k = [0u8; 16];
                k.copy_from_slice(bytes);
                Ok(Self::Aes128(k))
            }
            24 => {
                let mut k = [0u8; 24];
                k.copy_from_slice(bytes);
                Ok(Self::Aes192(k))
            }
            32 => {
                let mut k = [0u8; 32];
                k.copy_from_slice(bytes);
                Ok(Self::Aes256(k))
            }
            _ => Err(Error::InvalidParameter(
                "AES keys must be 16, 24 or 32 bytes",
            )),
        }
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(k) => k.as_slice(),
            Self::Aes192(k) => k.as_slice(),
            Self::Aes256(k) => k.as_slice(),
        }
    }

    /// Number of 32-bit words in the key (Nk).
    pub fn word_count(&self) -> usize {
        self.as_bytes().len() / 4
    }

    /// Number of rounds (Nr = Nk + 6).
    pub fn rounds(&self) -> usize {
        self.word_count() + 6
    }
}

impl fmt::Debug for InternalAesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.as_bytes().len() * 8;
        write!(f, "InternalAesKey::Aes{bits}(<redacted>)")
    }
}

/// Expanded round keys for one AES key.
///
/// Round key `r` is stored in the same column-major byte order as the
/// cipher state, so AddRoundKey is a plain 16-byte XOR.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    round_keys: [[u8; 16]; MAX_ROUNDS + 1],
    rounds: usize,
}

impl KeySchedule {
    /// Runs the Rijndael key expansion (FIPS-197 §5.2).
    pub fn new(key: &InternalAesKey) -> Self {
        let nk = key.word_count();
        let rounds = key.rounds();
        let total_words = 4 * (rounds + 1);

        let mut w = [[0u8; 4]; 4 * (MAX_ROUNDS + 1)];
        for (i, chunk) in key.as_bytes().chunks_exact(4).enumerate() {
            w[i].copy_from_slice(chunk);
        }

        for i in nk..total_words {
            let mut temp = w[i - 1];

            if i % nk == 0 {
                temp.rotate_left(1);
                sub_word(&mut temp);
                temp[0] ^= RCON[i / nk - 1];
            } else if nk > 6 && i % nk == 4 {
                sub_word(&mut temp);
            }

            for b in 0..4 {
                w[i][b] = w[i - nk][b] ^ temp[b];
            }
        }

        let mut round_keys = [[0u8; 16]; MAX_ROUNDS + 1];
        for (r, round_key) in round_keys.iter_mut().take(rounds + 1).enumerate() {
            for c in 0..4 {
                round_key[4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c]);
            }
        }

        w.zeroize();

        Self { round_keys, rounds }
    }

    /// Number of rounds this schedule was expanded for.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    #[inline]
    pub(crate) fn round_key(&self, round: usize) -> &[u8; 16] {
        &self.round_keys[round]
    }
}

fn sub_word(word: &mut [u8; 4]) {
    word.iter_mut().for_each(|b| *b = SBOX[*b as usize]);
}
