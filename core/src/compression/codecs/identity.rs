//! codecs/identity.rs
//! Pass-through codec for `CompressionAlgorithm::None`.

use crate::buffer::ChunkBuffer;
use crate::compression::types::{CompressionError, MessageCodec};

pub struct IdentityCodec;

impl MessageCodec for IdentityCodec {
    /// Identity never counts as compression; the dispatcher sends the copy.
    fn compress(&self, _input: &ChunkBuffer, _output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        Err(CompressionError::NoCompression)
    }

    fn decompress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        output.extend_shared(input);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_is_refused_and_leaves_output_alone() {
        let input = ChunkBuffer::from(b"payload".to_vec());
        let mut out = ChunkBuffer::new();
        assert!(matches!(IdentityCodec.compress(&input, &mut out), Err(CompressionError::NoCompression)));
        assert_eq!(out.count(), 0);
    }

    #[test]
    fn decompress_shares_chunks() {
        let input = ChunkBuffer::from(b"payload".to_vec());
        let mut out = ChunkBuffer::from(b">".to_vec());
        IdentityCodec.decompress(&input, &mut out).unwrap();
        assert_eq!(out.to_vec(), b">payload");
        assert_eq!(out.chunks()[1].as_ptr(), input.chunks()[0].as_ptr());
    }
}
