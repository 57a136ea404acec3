//! compression/codecs/mod.rs
//! Codec implementations behind `MessageCodec`.
//!
//! - `deflate`: zlib-framed DEFLATE and GZIP (flate2).
//! - `zstd`: zstd streaming frames (zstd-safe).
//! - `identity`: pass-through for `None`.

pub mod deflate;
pub mod identity;
pub mod zstd;

pub use deflate::DeflateCodec;
pub use identity::IdentityCodec;
pub use zstd::ZstdCodec;

use crate::compression::types::CompressionError;

/// Compressed output is only accepted when strictly smaller than the input.
pub(crate) fn ensure_smaller(codec: &'static str, input_len: usize, output_len: usize) -> Result<(), CompressionError> {
    if output_len < input_len {
        Ok(())
    } else {
        Err(CompressionError::NotSmaller { codec, input_len, output_len })
    }
}
