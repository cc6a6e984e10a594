//! Addressing and reference block selection for Argon2.
//!
//! Every new block mixes its predecessor with one earlier "reference"
//! block. The 64-bit pseudo-random value that picks the reference either
//! comes from the predecessor itself (data-dependent) or from an address
//! block generated from public position data (data-independent).

use super::block::{BLOCK_WORDS, Block};
use super::memory::MemoryLayout;
use super::params::Argon2Type;

/// Position of the segment being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SegmentPosition {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
}

/// Where the pseudo-random reference value of a segment comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Addressing {
    DataIndependent,
    DataDependent,
}

impl Addressing {
    pub(crate) fn for_segment(variant: Argon2Type, position: &SegmentPosition) -> Self {
        let first_pass = position.pass == 0;
        let early_slice = position.slice < 2;

        match (variant, first_pass, early_slice) {
            (Argon2Type::Argon2i, _, _) => Self::DataIndependent,
            (Argon2Type::Argon2id, true, true) => Self::DataIndependent,
            (Argon2Type::Argon2id, _, _) => Self::DataDependent,
            (Argon2Type::Argon2d, _, _) => Self::DataDependent,
        }
    }
}

/// Data-independent address source for one segment.
///
/// Each address block is `G(0, G(0, Z))` where
/// `Z = (pass, lane, slice, total_blocks, iterations, type, counter)`;
/// one block supplies 128 addresses before the counter advances.
pub(crate) struct AddressStream {
    input: Block,
    addresses: Block,
    primed: bool,
}

impl AddressStream {
    pub(crate) fn new(
        position: &SegmentPosition,
        layout: &MemoryLayout,
        iterations: u32,
        variant: Argon2Type,
    ) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = u64::from(position.pass);
        input.0[1] = u64::from(position.lane);
        input.0[2] = u64::from(position.slice);
        input.0[3] = u64::from(layout.total_blocks);
        input.0[4] = u64::from(iterations);
        input.0[5] = u64::from(variant.id());

        Self {
            input,
            addresses: Block::ZERO,
            primed: false,
        }
    }

    /// Pseudo-random value for block `index` of the segment.
    pub(crate) fn value(&mut self, index: u32) -> u64 {
        let slot = index as usize % BLOCK_WORDS;

        if !self.primed || slot == 0 {
            self.input.0[6] += 1;
            let first = Block::compress(&Block::ZERO, &self.input);
            self.addresses = Block::compress(&Block::ZERO, &first);
            self.primed = true;
        }

        self.addresses.0[slot]
    }
}

/// Maps `(J1, J2)` to the `(lane, column)` of the reference block for
/// block `index` of the segment at `position` (RFC 9106 §3.4.1.3).
pub(crate) fn compute_reference_position(
    position: &SegmentPosition,
    index: u32,
    layout: &MemoryLayout,
    pseudo_rand: u64,
) -> (u32, u32) {
    let j1 = pseudo_rand & 0xffff_ffff;
    let j2 = (pseudo_rand >> 32) as u32;

    let first_pass = position.pass == 0;
    let segment_len = layout.segment_len;
    let lane_len = layout.lane_len;

    // The very first slice can only see its own lane.
    let ref_lane = if first_pass && position.slice == 0 {
        position.lane
    } else {
        j2 % layout.lanes
    };
    let same_lane = ref_lane == position.lane;
    let starts_segment = u32::from(index == 0);

    // Size of the window of finished blocks the reference may come from.
    let area = match (first_pass, same_lane) {
        (true, true) => position.slice * segment_len + index - 1,
        (true, false) => position.slice * segment_len - starts_segment,
        (false, true) => lane_len - segment_len + index - 1,
        (false, false) => lane_len - segment_len - starts_segment,
    };
    let area = u64::from(area);

    // Non-uniform map biased towards recent blocks.
    let x = (j1 * j1) >> 32;
    let relative = area - 1 - ((area * x) >> 32);

    let start = if first_pass || position.slice == 3 {
        0
    } else {
        (position.slice + 1) * segment_len
    };

    let column = (u64::from(start) + relative) % u64::from(lane_len);

    (ref_lane, column as u32)
}
