//! compression/mod.rs
//! Streaming message compression and decompression over chunked buffers.
//!
//! Notes:
//! - Every codec writes through fixed-size output blocks (`stream::BlockWriter`).
//! - A failed attempt rolls the output buffer back to its pre-call state.
//! - Registry resolves algorithm IDs to codec implementations.

pub mod codecs;
pub mod compressor;
pub mod constants;
pub mod registry;
pub mod stream;
pub mod types;

pub use compressor::*;
pub use constants::*;
pub use registry::*;
pub use types::*;
