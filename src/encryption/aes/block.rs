//! The AES block transformation.
//!
//! An `AesBlock` loads one 16-byte block into the 4×4 state matrix and
//! performs exactly one encryption or decryption. A second call is
//! refused so a state can never be transformed twice.

use zeroize::Zeroize;

use super::key::KeySchedule;
use super::tables::{INV_SBOX, SBOX, gf_mul};
use crate::error::{Error, Result};

/// AES block size in bytes.
pub const BLOCK_BYTES: usize = 16;

/// Single-use cipher state for one block.
///
/// `state[c][r]` holds byte `4c + r` of the input (column-major, as in
/// FIPS-197 §3.4).
pub struct AesBlock<'a> {
    schedule: &'a KeySchedule,
    state: [[u8; 4]; 4],
    used: bool,
}

impl<'a> AesBlock<'a> {
    /// Loads `input` into a fresh state bound to `schedule`.
    pub fn new(schedule: &'a KeySchedule, input: &[u8; BLOCK_BYTES]) -> Self {
        let mut state = [[0u8; 4]; 4];
        for (c, column) in state.iter_mut().enumerate() {
            column.copy_from_slice(&input[4 * c..4 * c + 4]);
        }

        Self {
            schedule,
            state,
            used: false,
        }
    }

    /// Encrypts the loaded block.
    ///
    /// # Errors
    /// `Error::Misuse` if this block was already transformed.
    pub fn encrypt(&mut self) -> Result<[u8; BLOCK_BYTES]> {
        self.claim()?;

        let rounds = self.schedule.rounds();
        self.add_round_key(0);

        for round in 1..rounds {
            self.sub_bytes();
            self.shift_rows();
            self.mix_columns();
            self.add_round_key(round);
        }

        self.sub_bytes();
        self.shift_rows();
        self.add_round_key(rounds);

        Ok(self.take_output())
    }

    /// Decrypts the loaded block.
    ///
    /// # Errors
    /// `Error::Misuse` if this block was already transformed.
    pub fn decrypt(&mut self) -> Result<[u8; BLOCK_BYTES]> {
        self.claim()?;

        let rounds = self.schedule.rounds();
        self.add_round_key(rounds);

        for round in (1..rounds).rev() {
            self.inv_shift_rows();
            self.inv_sub_bytes();
            self.add_round_key(round);
            self.inv_mix_columns();
        }

        self.inv_shift_rows();
        self.inv_sub_bytes();
        self.add_round_key(0);

        Ok(self.take_output())
    }

    fn claim(&mut self) -> Result<()> {
        if self.used {
            return Err(Error::Misuse("AES block state already transformed"));
        }
        self.used = true;
        Ok(())
    }

    fn take_output(&mut self) -> [u8; BLOCK_BYTES] {
        let mut out = [0u8; BLOCK_BYTES];
        for (c, column) in self.state.iter().enumerate() {
            out[4 * c..4 * c + 4].copy_from_slice(column);
        }
        self.state.zeroize();
        out
    }

    #[inline]
    fn add_round_key(&mut self, round: usize) {
        let key = self.schedule.round_key(round);
        for (c, column) in self.state.iter_mut().enumerate() {
            for (r, byte) in column.iter_mut().enumerate() {
                *byte ^= key[4 * c + r];
            }
        }
    }

    #[inline]
    fn sub_bytes(&mut self) {
        self.state
            .iter_mut()
            .flatten()
            .for_each(|b| *b = SBOX[*b as usize]);
    }

    #[inline]
    fn inv_sub_bytes(&mut self) {
        self.state
            .iter_mut()
            .flatten()
            .for_each(|b| *b = INV_SBOX[*b as usize]);
    }

    /// Row `r` rotates left by `r` columns.
    fn shift_rows(&mut self) {
        let old = self.state;
        for c in 0..4 {
            for r in 1..4 {
                self.state[c][r] = old[(c + r) % 4][r];
            }
        }
    }

    fn inv_shift_rows(&mut self) {
        let old = self.state;
        for c in 0..4 {
            for r in 1..4 {
                self.state[(c + r) % 4][r] = old[c][r];
            }
        }
    }

    fn mix_columns(&mut self) {
        for column in self.state.iter_mut() {
            let [a0, a1, a2, a3] = *column;
            column[0] = gf_mul(a0, 2) ^ gf_mul(a1, 3) ^ a2 ^ a3;
            column[1] = a0 ^ gf_mul(a1, 2) ^ gf_mul(a2, 3) ^ a3;
            column[2] = a0 ^ a1 ^ gf_mul(a2, 2) ^ gf_mul(a3, 3);
            column[3] = gf_mul(a0, 3) ^ a1 ^ a2 ^ gf_mul(a3, 2);
        }
    }

    fn inv_mix_columns(&mut self) {
        for column in self.state.iter_mut() {
            let [a0, a1, a2, a3] = *column;
            column[0] = gf_mul(a0, 14) ^ gf_mul(a1, 11) ^ gf_mul(a2, 13) ^ gf_mul(a3, 9);
            column[1] = gf_mul(a0, 9) ^ gf_mul(a1, 14) ^ gf_mul(a2, 11) ^ gf_mul(a3, 13);
            column[2] = gf_mul(a0, 13) ^ gf_mul(a1, 9) ^ gf_mul(a2, 14) ^ gf_mul(a3, 11);
            column[3] = gf_mul(a0, 11) ^ gf_mul(a1, 13) ^ gf_mul(a2, 9) ^ gf_mul(a3, 14);
        }
    }
}

impl Drop for AesBlock<'_> {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}

/// Encrypts one block under an expanded key.
pub fn encrypt_block(schedule: &KeySchedule, input: &[u8; BLOCK_BYTES]) -> Result<[u8; BLOCK_BYTES]> {
    AesBlock::new(schedule, input).encrypt()
}

/// Decrypts one block under an expanded key.
pub fn decrypt_block(schedule: &KeySchedule, input: &[u8; BLOCK_BYTES]) -> Result<[u8; BLOCK_BYTES]> {
    AesBlock::new(schedule, input).decrypt()
}
