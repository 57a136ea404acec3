//! buffer/mod.rs
//! Chunked payload container shared by every codec.
//!
//! - `ChunkBuffer` is an ordered list of reference-counted `Bytes` chunks.
//! - `Transaction` snapshots an output buffer and rolls it back on drop unless committed.
//! - `ChunkAllocator` supplies the fixed-size scratch chunks codecs write into.

pub mod allocator;
pub mod chunk_buffer;
pub mod transaction;

pub use allocator::*;
pub use chunk_buffer::*;
pub use transaction::*;
