//! Fixed-size block accumulation.
//!
//! Incremental cipher sessions receive data in arbitrary pieces but can
//! only transform whole blocks. `BlockBuffer` keeps the pending tail
//! between calls and hands every completed block to a callback.

use core::convert::Infallible;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// Accumulates input and yields it `N` bytes at a time.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BlockBuffer<const N: usize> {
    buf: [u8; N],
    filled: usize,
}

impl<const N: usize> Default for BlockBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BlockBuffer<N> {
    pub fn new() -> Self {
        Self {
            buf: [0u8; N],
            filled: 0,
        }
    }

    /// Appends `data`, invoking `on_block` for every block that becomes
    /// complete. Bytes that do not fill a block stay buffered.
    ///
    /// Blocks are emitted as soon as they are full, so after this returns
    /// the buffer always holds fewer than `N` bytes.
    pub fn absorb<F>(&mut self, data: &[u8], on_block: F) -> Result<()>
    where
        F: FnMut(&[u8; N]) -> Result<()>,
    {
        self.absorb_with(data, on_block)
    }

    /// [`absorb`](Self::absorb) for callbacks that cannot fail.
    pub fn feed<F>(&mut self, data: &[u8], mut on_block: F)
    where
        F: FnMut(&[u8; N]),
    {
        let outcome = self.absorb_with::<Infallible, _>(data, |block| {
            on_block(block);
            Ok(())
        });

        match outcome {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn absorb_with<E, F>(&mut self, mut data: &[u8], mut on_block: F) -> core::result::Result<(), E>
    where
        F: FnMut(&[u8; N]) -> core::result::Result<(), E>,
    {
        if self.filled > 0 {
            let take = (N - self.filled).min(data.len());
            self.buf[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];

            if self.filled < N {
                return Ok(());
            }

            on_block(&self.buf)?;
            self.filled = 0;
        }

        let mut chunks = data.chunks_exact(N);
        for chunk in &mut chunks {
            self.buf.copy_from_slice(chunk);
            on_block(&self.buf)?;
        }

        let rest = chunks.remainder();
        self.buf[..rest.len()].copy_from_slice(rest);
        self.buf[rest.len()..].fill(0);
        self.filled = rest.len();

        Ok(())
    }

    /// The buffered bytes that have not formed a full block yet.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Drops the buffered tail and wipes it.
    pub fn clear(&mut self) {
        self.buf.zeroize();
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pieces: &[&[u8]]) -> (Vec<[u8; 4]>, Vec<u8>) {
        let mut buffer = BlockBuffer::<4>::new();
        let mut blocks = Vec::new();

        for piece in pieces {
            buffer
                .absorb(piece, |block| {
                    blocks.push(*block);
                    Ok(())
                })
                .unwrap();
        }

        (blocks, buffer.pending().to_vec())
    }

    #[test]
    fn emits_blocks_across_piece_boundaries() {
        let (blocks, pending) = collect(&[b"ab", b"cdef", b"ghijk"]);

        assert_eq!(blocks, vec![*b"abcd", *b"efgh"]);
        assert_eq!(pending, b"ijk");
    }

    #[test]
    fn exact_multiple_leaves_nothing_pending() {
        let (blocks, pending) = collect(&[b"12345678"]);

        assert_eq!(blocks, vec![*b"1234", *b"5678"]);
        assert!(pending.is_empty());
    }

    #[test]
    fn short_input_only_buffers() {
        let (blocks, pending) = collect(&[b"x", b"", b"y"]);

        assert!(blocks.is_empty());
        assert_eq!(pending, b"xy");
    }

    #[test]
    fn feed_matches_absorb() {
        let mut buffer = BlockBuffer::<4>::new();
        let mut blocks = Vec::new();

        buffer.feed(b"abc", |block| blocks.push(*block));
        buffer.feed(b"defgh", |block| blocks.push(*block));

        let (expected, pending) = collect(&[b"abc", b"defgh"]);
        assert_eq!(blocks, expected);
        assert_eq!(buffer.pending(), &pending[..]);
    }

    #[test]
    fn callback_error_propagates() {
        let mut buffer = BlockBuffer::<2>::new();
        let err = buffer
            .absorb(b"abcd", |_| Err(crate::Error::Misuse("stop")))
            .unwrap_err();

        assert_eq!(err, crate::Error::Misuse("stop"));
    }
}
