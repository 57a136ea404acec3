//! compression/stream.rs
//! Fixed-block output writer shared by every streaming codec.
//!
//! The writer owns one scratch chunk of `block_size` bytes. Codecs ask for
//! the free tail with `spare()`, let the library fill it, then report how
//! much was written with `advance()`. A full scratch chunk is sealed into the
//! output buffer the next time space is requested.
//!
//! - `finish()` trims the last scratch chunk and appends it (if non-empty).
//! - Dropping the writer without `finish()` discards the scratch chunk.
use std::mem;

use bytes::BytesMut;

use crate::buffer::{ChunkAllocator, ChunkBuffer};

pub struct BlockWriter<'a> {
    output: &'a mut ChunkBuffer,
    allocator: &'a dyn ChunkAllocator,
    block_size: usize,
    scratch: BytesMut,
    pos: usize,
}

impl<'a> BlockWriter<'a> {
    pub fn new(output: &'a mut ChunkBuffer, allocator: &'a dyn ChunkAllocator, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be non-zero");
        let scratch = fresh_block(allocator, block_size);
        Self { output, allocator, block_size, scratch, pos: 0 }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Free space left in the current scratch chunk.
    pub fn remaining(&self) -> usize {
        self.block_size - self.pos
    }

    pub fn is_full(&self) -> bool {
        self.pos == self.block_size
    }

    /// Writable tail of the scratch chunk, sealing a full chunk first.
    /// Never returns an empty slice.
    pub fn spare(&mut self) -> &mut [u8] {
        if self.is_full() {
            self.rotate();
        }
        &mut self.scratch[self.pos..]
    }

    /// Record `n` bytes written into the slice last returned by `spare()`.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance {} past block end ({} left)", n, self.remaining());
        self.pos += n;
    }

    /// Trim the scratch chunk to its written length and append it.
    pub fn finish(self) {
        let BlockWriter { output, mut scratch, pos, .. } = self;
        if pos == 0 {
            return;
        }
        scratch.truncate(pos);
        output.push(scratch.freeze());
    }

    fn rotate(&mut self) {
        let full = mem::replace(&mut self.scratch, fresh_block(self.allocator, self.block_size));
        self.output.push(full.freeze());
        self.pos = 0;
    }
}

fn fresh_block(allocator: &dyn ChunkAllocator, block_size: usize) -> BytesMut {
    let block = allocator.allocate(block_size);
    assert_eq!(block.len(), block_size, "allocator returned a chunk of the wrong size");
    block
}
