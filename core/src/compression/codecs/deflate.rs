//! DEFLATE (zlib-framed) and GZIP via flate2's low-level streaming API.
//!
//! One loop drives both directions; `FlateStep` is implemented for
//! `flate2::Compress` and `flate2::Decompress`.

use std::fmt::Display;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::buffer::{ChunkAllocator, ChunkBuffer, Transaction};
use crate::compression::codecs::ensure_smaller;
use crate::compression::constants::ZLIB_WINDOW_BITS;
use crate::compression::stream::BlockWriter;
use crate::compression::types::{CodecOptions, CompressionError, MessageCodec};

/// Result of one call into the zlib session.
pub struct Step {
    pub status: Status,
    pub consumed: usize,
    pub produced: usize,
}

pub trait FlateStep {
    type Error: Display;

    /// Run the transform once over `input` into `output`.
    /// `finish` is set for the final input chunk.
    fn step(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Step, Self::Error>;
}

impl FlateStep for Compress {
    type Error = flate2::CompressError;

    fn step(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Step, Self::Error> {
        let (in_before, out_before) = (self.total_in(), self.total_out());
        let flush = if finish { FlushCompress::Finish } else { FlushCompress::None };
        let status = self.compress(input, output, flush)?;
        Ok(Step {
            status,
            consumed: (self.total_in() - in_before) as usize,
            produced: (self.total_out() - out_before) as usize,
        })
    }
}

impl FlateStep for Decompress {
    type Error = flate2::DecompressError;

    fn step(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> Result<Step, Self::Error> {
        let (in_before, out_before) = (self.total_in(), self.total_out());
        let flush = if finish { FlushDecompress::Finish } else { FlushDecompress::None };
        let status = self.decompress(input, output, flush)?;
        Ok(Step {
            status,
            consumed: (self.total_in() - in_before) as usize,
            produced: (self.total_out() - out_before) as usize,
        })
    }
}

/// Feed every input chunk through `session`, writing fixed-size output blocks.
///
/// Empty input never calls `step` and succeeds with no output.
pub fn drive<S: FlateStep>(
    codec: &'static str,
    session: &mut S,
    input: &ChunkBuffer,
    mut writer: BlockWriter<'_>,
) -> Result<(), CompressionError> {
    let mut status = Status::StreamEnd;
    let last = input.count().saturating_sub(1);

    for (i, chunk) in input.iter().enumerate() {
        let finish = i == last;
        let mut offset = 0;
        loop {
            let step = session
                .step(&chunk[offset..], writer.spare(), finish)
                .map_err(|e| CompressionError::CodecProcessFailed { codec, msg: e.to_string() })?;
            offset += step.consumed;
            writer.advance(step.produced);
            // BufError only means no progress was possible; not fatal.
            status = step.status;
            if !writer.is_full() {
                break;
            }
        }
        if offset != chunk.len() {
            return Err(CompressionError::UnconsumedInput { codec, remaining: chunk.len() - offset });
        }
    }

    if status != Status::StreamEnd {
        return Err(CompressionError::IncompleteStream { codec });
    }
    writer.finish();
    Ok(())
}

pub struct DeflateCodec<'a> {
    gzip: bool,
    level: Compression,
    block_size: usize,
    allocator: &'a dyn ChunkAllocator,
}

impl<'a> DeflateCodec<'a> {
    pub fn new(gzip: bool, options: &CodecOptions, allocator: &'a dyn ChunkAllocator) -> Self {
        Self {
            gzip,
            level: Compression::new(options.resolved_deflate_level()),
            block_size: options.block_size,
            allocator,
        }
    }

    fn name(&self) -> &'static str {
        if self.gzip { "gzip" } else { "deflate" }
    }

    fn compress_session(&self) -> Compress {
        if self.gzip {
            Compress::new_gzip(self.level, ZLIB_WINDOW_BITS)
        } else {
            Compress::new(self.level, true)
        }
    }

    fn decompress_session(&self) -> Decompress {
        if self.gzip {
            Decompress::new_gzip(ZLIB_WINDOW_BITS)
        } else {
            Decompress::new(true)
        }
    }
}

impl MessageCodec for DeflateCodec<'_> {
    fn compress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        let mut txn = Transaction::begin(output);
        let mut session = self.compress_session();
        let writer = BlockWriter::new(txn.buffer_mut(), self.allocator, self.block_size);
        drive(self.name(), &mut session, input, writer)?;
        ensure_smaller(self.name(), input.len(), txn.appended_len())?;
        txn.commit();
        Ok(())
    }

    fn decompress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        let mut txn = Transaction::begin(output);
        let mut session = self.decompress_session();
        let writer = BlockWriter::new(txn.buffer_mut(), self.allocator, self.block_size);
        drive(self.name(), &mut session, input, writer)?;
        txn.commit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::{GzDecoder, ZlibDecoder};

    use super::*;
    use crate::buffer::SystemAllocator;
    use crate::utils::chunked;

    fn text(len: usize) -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".iter().copied().cycle().take(len).collect()
    }

    fn codec(gzip: bool) -> DeflateCodec<'static> {
        DeflateCodec::new(gzip, &CodecOptions::default(), &SystemAllocator)
    }

    #[test]
    fn zlib_output_reads_back_with_flate2_reader() {
        let data = text(10_000);
        let mut out = ChunkBuffer::new();
        codec(false).compress(&chunked(&data, 700), &mut out).unwrap();

        let mut plain = Vec::new();
        ZlibDecoder::new(&out.to_vec()[..]).read_to_end(&mut plain).unwrap();
        assert_eq!(plain, data);
    }

    #[test]
    fn gzip_output_reads_back_with_flate2_reader() {
        let data = text(10_000);
        let mut out = ChunkBuffer::new();
        codec(true).compress(&chunked(&data, 333), &mut out).unwrap();

        let bytes = out.to_vec();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        let mut plain = Vec::new();
        GzDecoder::new(&bytes[..]).read_to_end(&mut plain).unwrap();
        assert_eq!(plain, data);
    }

    #[test]
    fn decompressed_output_uses_fixed_blocks() {
        let data = text(5000);
        let mut packed = ChunkBuffer::new();
        codec(false).compress(&ChunkBuffer::from(&data[..]), &mut packed).unwrap();

        let mut out = ChunkBuffer::new();
        codec(false).decompress(&packed, &mut out).unwrap();
        let lens: Vec<usize> = out.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![1024, 1024, 1024, 1024, 904]);
        assert_eq!(out.to_vec(), data);
    }

    #[test]
    fn framing_mismatch_is_rejected() {
        let data = text(4000);
        let mut packed = ChunkBuffer::new();
        codec(true).compress(&ChunkBuffer::from(&data[..]), &mut packed).unwrap();

        let mut out = ChunkBuffer::new();
        let err = codec(false).decompress(&packed, &mut out).unwrap_err();
        assert!(matches!(err, CompressionError::CodecProcessFailed { codec: "deflate", .. }));
        assert_eq!(out.count(), 0);
    }

    #[test]
    fn trailing_garbage_is_unconsumed_input() {
        let data = text(4000);
        let mut packed = ChunkBuffer::new();
        codec(false).compress(&ChunkBuffer::from(&data[..]), &mut packed).unwrap();
        packed.push(bytes::Bytes::from_static(b"junk"));

        let mut out = ChunkBuffer::new();
        let err = codec(false).decompress(&packed, &mut out).unwrap_err();
        assert!(matches!(err, CompressionError::UnconsumedInput { remaining: 4, .. }));
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn truncated_stream_is_incomplete() {
        let data = text(4000);
        let mut packed = ChunkBuffer::new();
        codec(true).compress(&ChunkBuffer::from(&data[..]), &mut packed).unwrap();
        let bytes = packed.to_vec();
        let truncated = ChunkBuffer::from(&bytes[..bytes.len() - 6]);

        let mut out = ChunkBuffer::new();
        let err = codec(true).decompress(&truncated, &mut out).unwrap_err();
        assert!(matches!(err, CompressionError::IncompleteStream { codec: "gzip" }));
        assert_eq!(out.count(), 0);
    }
}
