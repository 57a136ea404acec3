//! compression/registry.rs
//! Algorithm registry and codec factory.

use crate::buffer::ChunkAllocator;
use crate::compression::codecs::{DeflateCodec, IdentityCodec, ZstdCodec};
use crate::compression::types::{CodecOptions, CompressionAlgorithm, CompressionError, MessageCodec};

/// Static facts about an algorithm, consulted before any codec is built.
pub struct CodecInfo {
    pub algorithm: CompressionAlgorithm,
    pub name: &'static str,
    /// `false` for pass-through; compression short-circuits to the copy.
    pub compresses: bool,
}

/// Resolve a raw wire identifier; the count sentinel and beyond are rejected.
pub fn resolve(raw: u16) -> Result<CodecInfo, CompressionError> {
    CompressionAlgorithm::verify(raw).map(info)
}

pub fn info(algorithm: CompressionAlgorithm) -> CodecInfo {
    CodecInfo {
        algorithm,
        name: algorithm.name(),
        compresses: !matches!(algorithm, CompressionAlgorithm::None),
    }
}

/// Bind `algorithm` to `options` and `allocator`.
pub fn create_codec<'a>(
    algorithm: CompressionAlgorithm,
    options: &CodecOptions,
    allocator: &'a dyn ChunkAllocator,
) -> Box<dyn MessageCodec + 'a> {
    match algorithm {
        CompressionAlgorithm::None    => Box::new(IdentityCodec),
        CompressionAlgorithm::Deflate => Box::new(DeflateCodec::new(false, options, allocator)),
        CompressionAlgorithm::Gzip    => Box::new(DeflateCodec::new(true, options, allocator)),
        CompressionAlgorithm::Zstd    => Box::new(ZstdCodec::new(options, allocator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::constants::algorithm_ids;

    #[test]
    fn resolve_known_ids() {
        assert_eq!(resolve(algorithm_ids::GZIP).unwrap().name, "gzip");
        assert!(!resolve(algorithm_ids::NONE).unwrap().compresses);
        assert_eq!(resolve(algorithm_ids::ZSTD).unwrap().algorithm, CompressionAlgorithm::Zstd);
        assert!(CompressionAlgorithm::ALL[1..].iter().all(|&alg| info(alg).compresses));
    }

    #[test]
    fn resolve_rejects_sentinel() {
        assert!(matches!(
            resolve(algorithm_ids::ALGORITHMS_COUNT),
            Err(CompressionError::UnknownAlgorithm { .. })
        ));
    }
}
