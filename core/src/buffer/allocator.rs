//! buffer/allocator.rs
//! Pluggable source of scratch chunks.
//!
//! Codecs never allocate output storage themselves; every fixed-size scratch
//! chunk comes from the `ChunkAllocator` bound at construction time.
//! Allocation failure is not reported: it aborts, like any Rust allocation.

use bytes::BytesMut;

pub trait ChunkAllocator: Send + Sync {
    /// Return a writable chunk of exactly `size` bytes.
    fn allocate(&self, size: usize) -> BytesMut;
}

/// Default allocator backed by the process heap.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemAllocator;

impl ChunkAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> BytesMut {
        BytesMut::zeroed(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_returns_requested_size() {
        let chunk = SystemAllocator.allocate(1024);
        assert_eq!(chunk.len(), 1024);
        assert!(chunk.iter().all(|&b| b == 0));
    }
}
