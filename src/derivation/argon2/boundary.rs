//! Initialization and finalization for Argon2.

use zeroize::{Zeroize, Zeroizing};

use super::block::{BLOCK_BYTES, Block};
use super::memory::MemoryLayout;
use super::params::Argon2Params;
use crate::error::{Error, Result};
use crate::hash::{blake2b_into, blake2b_long_into};

/// Argon2 version 1.3.
pub(crate) const ARGON2_VERSION: u32 = 0x13;

/// Length of the initial hash H0.
pub(crate) const H0_BYTES: usize = 64;

fn len_le(bytes: &[u8]) -> Result<[u8; 4]> {
    u32::try_from(bytes.len())
        .map(u32::to_le_bytes)
        .map_err(|_| Error::InvalidParameter("Argon2 input longer than 2^32-1 bytes"))
}

/// Computes H0 (RFC 9106 §3.2):
///
/// ```text
/// H0 = BLAKE2b-512(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// `m` is the requested memory size, before rounding to the lane quantum.
pub(crate) fn init(
    password: &[u8],
    salt: &[u8],
    params: &Argon2Params,
) -> Result<Zeroizing<[u8; H0_BYTES]>> {
    let secret: &[u8] = params.secret.as_deref().map(Vec::as_slice).unwrap_or_default();
    let associated_data: &[u8] = params.associated_data.as_deref().unwrap_or_default();

    let tag_length = u32::try_from(params.tag_length)
        .map_err(|_| Error::InvalidParameter("tag length exceeds u32"))?;

    let parallelism = params.parallelism.to_le_bytes();
    let tag_length = tag_length.to_le_bytes();
    let memory = params.memory_kib.to_le_bytes();
    let iterations = params.iterations.to_le_bytes();
    let version = ARGON2_VERSION.to_le_bytes();
    let variant = params.variant.id().to_le_bytes();
    let password_len = len_le(password)?;
    let salt_len = len_le(salt)?;
    let secret_len = len_le(secret)?;
    let ad_len = len_le(associated_data)?;

    let mut h0 = Zeroizing::new([0u8; H0_BYTES]);
    blake2b_into(
        h0.as_mut_slice(),
        &[
            &parallelism[..],
            &tag_length[..],
            &memory[..],
            &iterations[..],
            &version[..],
            &variant[..],
            &password_len[..],
            password,
            &salt_len[..],
            salt,
            &secret_len[..],
            secret,
            &ad_len[..],
            associated_data,
        ],
    )?;

    Ok(h0)
}

/// Seeds columns 0 and 1 of every lane:
/// `B[lane][j] = H'^1024(H0 || LE32(j) || LE32(lane))`.
pub(crate) fn seed_lanes(matrix: &mut [Block], layout: &MemoryLayout, h0: &[u8; H0_BYTES]) -> Result<()> {
    let mut bytes = [0u8; BLOCK_BYTES];

    for lane in 0..layout.lanes {
        for column in 0..2u32 {
            let column_le = column.to_le_bytes();
            let lane_le = lane.to_le_bytes();

            let hashed = blake2b_long_into(&mut bytes, &[&h0[..], &column_le[..], &lane_le[..]]);
            if let Err(err) = hashed {
                bytes.zeroize();
                return Err(err);
            }

            matrix[layout.index(lane, column)] = Block::from_bytes(&bytes);
        }
    }

    bytes.zeroize();
    Ok(())
}

/// XORs the last column across lanes and hashes it with H' to the tag.
pub(crate) fn finalize(matrix: &[Block], layout: &MemoryLayout, tag_length: usize) -> Result<Vec<u8>> {
    let mut accumulator = Block::ZERO;
    for lane in 0..layout.lanes {
        accumulator.in_place_xor(&matrix[layout.index(lane, layout.lane_len - 1)]);
    }

    let mut bytes = accumulator.to_bytes();
    let mut tag = vec![0u8; tag_length];
    let hashed = blake2b_long_into(&mut tag, &[&bytes[..]]);
    bytes.zeroize();

    hashed.map(|()| tag)
}
