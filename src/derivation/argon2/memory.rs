//! Memory organization and filling for Argon2.
//!
//! Memory is a matrix of `lanes` rows, each split into 4 slices. Within a
//! slice every lane fills its segment independently; slices are separated
//! by a barrier. Each lane writes into a private segment buffer that is
//! copied into the matrix once all lanes of the slice are done, so lanes
//! only ever share read access to the matrix.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::block::Block;
use super::params::{Argon2Params, Argon2Type};
use super::reference::{AddressStream, Addressing, SegmentPosition, compute_reference_position};
use crate::error::{Error, Result};

/// Synchronization points per pass.
pub(crate) const SYNC_POINTS: u32 = 4;

/// Matrix dimensions for one derivation.
#[derive(Debug, Clone)]
pub(crate) struct MemoryLayout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

/// Inputs to the fill loop that are not part of the layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FillContext {
    pub iterations: u32,
    pub variant: Argon2Type,
}

impl MemoryLayout {
    /// Rounds `max(memory_kib, 8p)` down to a multiple of `4p` blocks.
    pub(crate) fn new(params: &Argon2Params) -> Self {
        Self::from_dimensions(params.memory_kib, params.parallelism)
    }

    pub(crate) fn from_dimensions(memory_kib: u32, lanes: u32) -> Self {
        let quantum = SYNC_POINTS * lanes;
        let memory = memory_kib.max(2 * quantum);
        let total_blocks = (memory / quantum) * quantum;
        let lane_len = total_blocks / lanes;

        Self {
            lanes,
            lane_len,
            segment_len: lane_len / SYNC_POINTS,
            total_blocks,
        }
    }

    #[inline]
    pub(crate) fn index(&self, lane: u32, column: u32) -> usize {
        lane as usize * self.lane_len as usize + column as usize
    }

    /// Allocates the zeroed block matrix.
    pub(crate) fn allocate(&self) -> Result<Vec<Block>> {
        allocate_blocks(self.total_blocks as usize)
    }

    /// Runs every pass over the matrix.
    pub(crate) fn fill(&self, matrix: &mut [Block], ctx: &FillContext) -> Result<()> {
        for pass in 0..ctx.iterations {
            for slice in 0..SYNC_POINTS {
                self.fill_slice(matrix, ctx, pass, slice)?;
                tracing::trace!(pass, slice, "argon2 slice filled");
            }
        }
        Ok(())
    }

    fn fill_slice(&self, matrix: &mut [Block], ctx: &FillContext, pass: u32, slice: u32) -> Result<()> {
        let shared: &[Block] = matrix;
        let fill_lane = |lane: u32| {
            self.fill_segment(shared, ctx, &SegmentPosition { pass, lane, slice })
        };

        #[cfg(feature = "parallel")]
        let segments: Vec<Result<Vec<Block>>> = (0..self.lanes).into_par_iter().map(fill_lane).collect();

        #[cfg(not(feature = "parallel"))]
        let segments: Vec<Result<Vec<Block>>> = (0..self.lanes).map(fill_lane).collect();

        let first = first_index(pass, slice);
        let base = slice * self.segment_len;

        for (lane, segment) in (0u32..).zip(segments) {
            for (offset, block) in (0u32..).zip(segment?).skip(first as usize) {
                matrix[self.index(lane, base + offset)] = block;
            }
        }

        Ok(())
    }

    /// Computes one segment into a private buffer.
    ///
    /// Reads of blocks this segment has already produced go to the
    /// buffer; everything else comes from the matrix, which holds the
    /// state as of the previous slice barrier.
    fn fill_segment(
        &self,
        matrix: &[Block],
        ctx: &FillContext,
        position: &SegmentPosition,
    ) -> Result<Vec<Block>> {
        let mut segment = allocate_blocks(self.segment_len as usize)?;

        let mut addresses = match Addressing::for_segment(ctx.variant, position) {
            Addressing::DataIndependent => {
                Some(AddressStream::new(position, self, ctx.iterations, ctx.variant))
            }
            Addressing::DataDependent => None,
        };

        let first = first_index(position.pass, position.slice);
        let base = position.slice * self.segment_len;

        for index in first..self.segment_len {
            let column = base + index;
            let prev_column = if column == 0 { self.lane_len - 1 } else { column - 1 };

            let view = SegmentView {
                layout: self,
                matrix,
                segment: &segment,
                position,
                first,
                filled_to: index,
            };

            let prev = view.get(position.lane, prev_column);
            let pseudo_rand = match addresses.as_mut() {
                Some(stream) => stream.value(index),
                None => prev.0[0],
            };

            let (ref_lane, ref_column) =
                compute_reference_position(position, index, self, pseudo_rand);
            let reference = view.get(ref_lane, ref_column);

            let mut next = Block::compress(prev, reference);
            if position.pass > 0 {
                next.in_place_xor(&matrix[self.index(position.lane, column)]);
            }

            segment[index as usize] = next;
        }

        Ok(segment)
    }
}

/// Read access to the matrix with the in-progress segment overlaid.
struct SegmentView<'a> {
    layout: &'a MemoryLayout,
    matrix: &'a [Block],
    segment: &'a [Block],
    position: &'a SegmentPosition,
    first: u32,
    filled_to: u32,
}

impl<'a> SegmentView<'a> {
    fn get(&self, lane: u32, column: u32) -> &'a Block {
        let base = self.position.slice * self.layout.segment_len;
        let in_segment = lane == self.position.lane
            && column >= base + self.first
            && column < base + self.filled_to;

        if in_segment {
            &self.segment[(column - base) as usize]
        } else {
            &self.matrix[self.layout.index(lane, column)]
        }
    }
}

/// The first two columns of every lane are seeded from H0, not filled.
#[inline]
fn first_index(pass: u32, slice: u32) -> u32 {
    if pass == 0 && slice == 0 { 2 } else { 0 }
}

fn allocate_blocks(count: usize) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    blocks
        .try_reserve_exact(count)
        .map_err(|_| Error::ResourceExhausted {
            requested_blocks: count,
        })?;
    blocks.resize(count, Block::ZERO);
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_rounds_down_to_lane_quantum() {
        let layout = MemoryLayout::from_dimensions(100, 3);
        assert_eq!(layout.total_blocks, 96);
        assert_eq!(layout.lane_len, 32);
        assert_eq!(layout.segment_len, 8);
    }

    #[test]
    fn layout_enforces_minimum() {
        let layout = MemoryLayout::from_dimensions(8, 1);
        assert_eq!(layout.total_blocks, 8);
        assert_eq!(layout.segment_len, 2);
    }

    #[test]
    fn index_is_row_major() {
        let layout = MemoryLayout::from_dimensions(64, 2);
        assert_eq!(layout.index(0, 5), 5);
        assert_eq!(layout.index(1, 0), 32);
    }

    #[test]
    fn fill_touches_every_block_after_the_seeds() {
        let layout = MemoryLayout::from_dimensions(32, 2);
        let mut matrix = layout.allocate().unwrap();

        for lane in 0..2 {
            for column in 0..2 {
                matrix[layout.index(lane, column)].0[0] = u64::from(lane * 2 + column + 1);
            }
        }

        let ctx = FillContext {
            iterations: 1,
            variant: Argon2Type::Argon2id,
        };
        layout.fill(&mut matrix, &ctx).unwrap();

        assert!(matrix.iter().all(|block| block.0.iter().any(|&w| w != 0)));
    }
}
