//! compression/types.rs
//! Algorithm identifiers, codec options, errors and the codec trait.
use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::ChunkBuffer;
use crate::compression::constants::{algorithm_ids, DEFAULT_LEVEL_DEFLATE, DEFAULT_LEVEL_ZSTD};
use crate::constants::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
use crate::utils::enum_name_or_hex;

/// FFI-safe enum for message compression algorithms.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    #[serde(rename = "identity")]
    None    = algorithm_ids::NONE,
    Deflate = algorithm_ids::DEFLATE,
    Gzip    = algorithm_ids::GZIP,
    Zstd    = algorithm_ids::ZSTD,
}

impl CompressionAlgorithm {
    pub const ALL: [CompressionAlgorithm; algorithm_ids::ALGORITHMS_COUNT as usize] = [
        CompressionAlgorithm::None,
        CompressionAlgorithm::Deflate,
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Zstd,
    ];

    /// Accept only identifiers of known algorithms; the count sentinel is rejected.
    pub fn verify(raw: u16) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::UnknownAlgorithm { raw })
    }

    /// Wire name of the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            CompressionAlgorithm::None    => "identity",
            CompressionAlgorithm::Deflate => "deflate",
            CompressionAlgorithm::Gzip    => "gzip",
            CompressionAlgorithm::Zstd    => "zstd",
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| CompressionError::UnknownAlgorithmName(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("invalid compression algorithm: {}", algorithm_label(.raw))]
    UnknownAlgorithm { raw: u16 },

    #[error("invalid compression algorithm name: {0:?}")]
    UnknownAlgorithmName(String),

    #[error("no compression requested")]
    NoCompression,

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: &'static str, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("codec {codec}: not all input consumed ({remaining} bytes left)")]
    UnconsumedInput { codec: &'static str, remaining: usize },

    #[error("codec {codec}: stream ended before end-of-stream marker")]
    IncompleteStream { codec: &'static str },

    #[error("codec {codec}: output {output_len} bytes is not smaller than input {input_len} bytes")]
    NotSmaller { codec: &'static str, input_len: usize, output_len: usize },

    #[error("invalid codec options: {0}")]
    InvalidOptions(String),
}

fn algorithm_label(raw: &u16) -> String {
    enum_name_or_hex::<CompressionAlgorithm>(*raw)
}

/// Tunables shared by all codecs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Size of each scratch output chunk.
    pub block_size: usize,
    /// 0..=9; anything else falls back to the default.
    pub deflate_level: u32,
    /// Clamped to zstd's supported range when the session is created.
    pub zstd_level: i32,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            deflate_level: DEFAULT_LEVEL_DEFLATE,
            zstd_level: DEFAULT_LEVEL_ZSTD,
        }
    }
}

impl CodecOptions {
    pub fn validate(&self) -> Result<(), CompressionError> {
        if self.block_size == 0 {
            return Err(CompressionError::InvalidOptions("block_size must be > 0".into()));
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(CompressionError::InvalidOptions(format!(
                "block_size {} > {}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        Ok(())
    }

    pub fn resolved_deflate_level(&self) -> u32 {
        match self.deflate_level {
            0..=9 => self.deflate_level,
            _ => DEFAULT_LEVEL_DEFLATE,
        }
    }

    pub fn resolved_zstd_level(&self) -> i32 {
        self.zstd_level.clamp(zstd_safe::min_c_level(), zstd_safe::max_c_level())
    }
}

/// One algorithm bound to its options and allocator.
///
/// Both operations either append a complete result to `output` or leave it
/// exactly as it was on entry.
pub trait MessageCodec {
    fn compress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError>;
    fn decompress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError>;
}
