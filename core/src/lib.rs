//! msgcompress-core
//!
//! Streaming message (de)compression over chunked buffers.
//! DEFLATE, GZIP and zstd, with rollback on failure and an uncompressed
//! fallback when compression does not pay off.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod utils;

pub mod buffer;
pub mod compression;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::buffer::{ChunkAllocator, ChunkBuffer, Snapshot, SystemAllocator};
    pub use crate::compression::{
        compress, decompress, CodecOptions, CompressionAlgorithm, CompressionError, MessageCompressor,
    };
}
