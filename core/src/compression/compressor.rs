//! compression/compressor.rs
//! Public entry point: algorithm dispatch plus the uncompressed fallback.
//!
//! - Compression failures of any kind (codec error, output not smaller,
//!   `None`, unknown id) end with a verbatim copy of the input and `false`.
//! - Decompression failures are never masked: `false` and untouched output.
use std::sync::Arc;

use crate::buffer::{ChunkAllocator, ChunkBuffer, SystemAllocator};
use crate::compression::registry::{create_codec, info, resolve};
use crate::compression::types::{CodecOptions, CompressionAlgorithm, CompressionError};

#[derive(Clone)]
pub struct MessageCompressor {
    options: CodecOptions,
    allocator: Arc<dyn ChunkAllocator>,
}

impl Default for MessageCompressor {
    fn default() -> Self {
        Self { options: CodecOptions::default(), allocator: Arc::new(SystemAllocator) }
    }
}

impl MessageCompressor {
    pub fn new(options: CodecOptions) -> Result<Self, CompressionError> {
        Self::with_allocator(options, Arc::new(SystemAllocator))
    }

    pub fn with_allocator(options: CodecOptions, allocator: Arc<dyn ChunkAllocator>) -> Result<Self, CompressionError> {
        options.validate()?;
        Ok(Self { options, allocator })
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Compress without the fallback. On error `output` is unchanged.
    pub fn try_compress(
        &self,
        algorithm: CompressionAlgorithm,
        input: &ChunkBuffer,
        output: &mut ChunkBuffer,
    ) -> Result<(), CompressionError> {
        create_codec(algorithm, &self.options, self.allocator.as_ref()).compress(input, output)
    }

    /// Decompress. On error `output` is unchanged.
    pub fn try_decompress(
        &self,
        algorithm: CompressionAlgorithm,
        input: &ChunkBuffer,
        output: &mut ChunkBuffer,
    ) -> Result<(), CompressionError> {
        create_codec(algorithm, &self.options, self.allocator.as_ref()).decompress(input, output)
    }

    /// Returns `true` if `output` received a strictly smaller encoding of
    /// `input`, `false` if it received a verbatim copy instead.
    pub fn compress(&self, algorithm: CompressionAlgorithm, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
        if !info(algorithm).compresses {
            output.extend_shared(input);
            return false;
        }
        match self.try_compress(algorithm, input, output) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%algorithm, error = %e, input_len = input.len(), "sending message uncompressed");
                output.extend_shared(input);
                false
            }
        }
    }

    /// Returns `true` if `output` received the decoded payload; on `false`
    /// `output` is exactly as it was before the call.
    pub fn decompress(&self, algorithm: CompressionAlgorithm, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
        match self.try_decompress(algorithm, input, output) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%algorithm, error = %e, input_len = input.len(), "message decompression failed");
                false
            }
        }
    }

    /// `compress` for a raw wire identifier. Unknown ids still get the copy.
    pub fn compress_raw(&self, raw: u16, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
        match resolve(raw) {
            Ok(codec) => self.compress(codec.algorithm, input, output),
            Err(e) => {
                tracing::error!(raw, "{e}");
                output.extend_shared(input);
                false
            }
        }
    }

    /// `decompress` for a raw wire identifier. Unknown ids fail untouched.
    pub fn decompress_raw(&self, raw: u16, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
        match resolve(raw) {
            Ok(codec) => self.decompress(codec.algorithm, input, output),
            Err(e) => {
                tracing::error!(raw, "{e}");
                false
            }
        }
    }
}

/// `MessageCompressor::compress` with default options.
pub fn compress(algorithm: CompressionAlgorithm, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
    MessageCompressor::default().compress(algorithm, input, output)
}

/// `MessageCompressor::decompress` with default options.
pub fn decompress(algorithm: CompressionAlgorithm, input: &ChunkBuffer, output: &mut ChunkBuffer) -> bool {
    MessageCompressor::default().decompress(algorithm, input, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_options() {
        let opts = CodecOptions { block_size: 0, ..Default::default() };
        assert!(MessageCompressor::new(opts).is_err());
    }

    #[test]
    fn none_compress_falls_back_to_copy() {
        let input = ChunkBuffer::from(b"abc".to_vec());
        let mut out = ChunkBuffer::new();
        assert!(!compress(CompressionAlgorithm::None, &input, &mut out));
        assert_eq!(out.to_vec(), b"abc");
    }

    #[test]
    fn none_raw_id_copies_by_reference() {
        let input = ChunkBuffer::from(b"shared".to_vec());
        let mut out = ChunkBuffer::new();
        assert!(!MessageCompressor::default().compress_raw(0, &input, &mut out));
        assert_eq!(out.count(), 1);
        assert_eq!(out.chunks()[0].as_ptr(), input.chunks()[0].as_ptr());
    }

    #[test]
    fn try_compress_reports_reason_without_copy() {
        let input = ChunkBuffer::from(b"abc".to_vec());
        let mut out = ChunkBuffer::new();
        let err = MessageCompressor::default()
            .try_compress(CompressionAlgorithm::Deflate, &input, &mut out)
            .unwrap_err();
        assert!(matches!(err, CompressionError::NotSmaller { codec: "deflate", input_len: 3, .. }));
        assert_eq!(out.count(), 0);
    }
}
