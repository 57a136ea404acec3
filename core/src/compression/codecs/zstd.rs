//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming compressor/decompressor over chunked buffers.
//!
//! Design notes:
//! - Drives `zstd_safe` sessions directly so chunk and stream boundaries map
//!   onto explicit continue / flush / end directives.
//! - Output always goes through `BlockWriter`, one fixed-size block at a time.
//! - Sessions (`CCtx` / `DCtx`) are owned locals, freed on every return path.
//! - Any error status from the library fails the attempt immediately.
use zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd_safe::{CCtx, CParameter, DCtx, ErrorCode, InBuffer, OutBuffer};

use crate::buffer::{ChunkAllocator, ChunkBuffer, Transaction};
use crate::compression::codecs::ensure_smaller;
use crate::compression::stream::BlockWriter;
use crate::compression::types::{CodecOptions, CompressionError, MessageCodec};

const CODEC: &str = "zstd";

pub struct ZstdCodec<'a> {
    level: i32,
    block_size: usize,
    allocator: &'a dyn ChunkAllocator,
}

impl<'a> ZstdCodec<'a> {
    pub fn new(options: &CodecOptions, allocator: &'a dyn ChunkAllocator) -> Self {
        Self {
            level: options.resolved_zstd_level(),
            block_size: options.block_size,
            allocator,
        }
    }

    fn compress_session(&self) -> Result<CCtx<'static>, CompressionError> {
        let mut cctx = CCtx::try_create().ok_or_else(|| CompressionError::CodecInitFailed {
            codec: CODEC,
            msg: "failed to create compression context".into(),
        })?;
        cctx.set_parameter(CParameter::CompressionLevel(self.level))
            .map_err(|code| CompressionError::CodecInitFailed { codec: CODEC, msg: error_name(code) })?;
        Ok(cctx)
    }

    fn decompress_session(&self) -> Result<DCtx<'static>, CompressionError> {
        DCtx::try_create().ok_or_else(|| CompressionError::CodecInitFailed {
            codec: CODEC,
            msg: "failed to create decompression context".into(),
        })
    }

    fn compress_stream(&self, input: &ChunkBuffer, mut writer: BlockWriter<'_>) -> Result<(), CompressionError> {
        let mut cctx = self.compress_session()?;
        let last = input.count().saturating_sub(1);

        for (i, chunk) in input.iter().enumerate() {
            let mut src = InBuffer::around(chunk);

            // Push the whole chunk into the session first.
            while src.pos < chunk.len() {
                compress_step(&mut cctx, &mut writer, &mut src, ZSTD_EndDirective::ZSTD_e_continue)?;
            }

            // Then drain: flush between chunks, close the frame after the last one.
            let directive = if i == last {
                ZSTD_EndDirective::ZSTD_e_end
            } else {
                ZSTD_EndDirective::ZSTD_e_flush
            };
            while compress_step(&mut cctx, &mut writer, &mut src, directive)? != 0 {}

            if src.pos != chunk.len() {
                return Err(CompressionError::UnconsumedInput { codec: CODEC, remaining: chunk.len() - src.pos });
            }
        }

        writer.finish();
        Ok(())
    }

    fn decompress_stream(&self, input: &ChunkBuffer, mut writer: BlockWriter<'_>) -> Result<(), CompressionError> {
        let mut dctx = self.decompress_session()?;
        let mut frame_complete = true;

        for chunk in input.iter().filter(|c| !c.is_empty()) {
            let mut src = InBuffer::around(chunk);
            // A frame end returns early with later frames still in `src`.
            while src.pos < chunk.len() || writer.is_full() {
                let before = src.pos;
                let (hint, produced) = {
                    let mut dst = OutBuffer::around(writer.spare());
                    let hint = dctx
                        .decompress_stream(&mut dst, &mut src)
                        .map_err(|code| CompressionError::CodecProcessFailed { codec: CODEC, msg: error_name(code) })?;
                    (hint, dst.pos())
                };
                writer.advance(produced);

                // A call that moved nothing carries no news about the frame.
                if produced > 0 || src.pos > before {
                    frame_complete = hint == 0;
                } else if !writer.is_full() {
                    // Stalled with room to spare; the remainder is reported below.
                    break;
                }
            }
            if src.pos != chunk.len() {
                return Err(CompressionError::UnconsumedInput { codec: CODEC, remaining: chunk.len() - src.pos });
            }
        }

        if !frame_complete {
            return Err(CompressionError::IncompleteStream { codec: CODEC });
        }
        writer.finish();
        Ok(())
    }
}

/// One `compress_stream2` call into the writer's free space.
/// Returns the number of bytes the session still has to flush.
fn compress_step(
    cctx: &mut CCtx<'_>,
    writer: &mut BlockWriter<'_>,
    src: &mut InBuffer<'_>,
    directive: ZSTD_EndDirective,
) -> Result<usize, CompressionError> {
    let (pending, produced) = {
        let mut dst = OutBuffer::around(writer.spare());
        let pending = cctx
            .compress_stream2(&mut dst, src, directive)
            .map_err(|code| CompressionError::CodecProcessFailed { codec: CODEC, msg: error_name(code) })?;
        (pending, dst.pos())
    };
    writer.advance(produced);
    Ok(pending)
}

fn error_name(code: ErrorCode) -> String {
    zstd_safe::get_error_name(code).to_string()
}

impl MessageCodec for ZstdCodec<'_> {
    fn compress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        let mut txn = Transaction::begin(output);
        let writer = BlockWriter::new(txn.buffer_mut(), self.allocator, self.block_size);
        self.compress_stream(input, writer)?;
        ensure_smaller(CODEC, input.len(), txn.appended_len())?;
        txn.commit();
        Ok(())
    }

    fn decompress(&self, input: &ChunkBuffer, output: &mut ChunkBuffer) -> Result<(), CompressionError> {
        let mut txn = Transaction::begin(output);
        let writer = BlockWriter::new(txn.buffer_mut(), self.allocator, self.block_size);
        self.decompress_stream(input, writer)?;
        txn.commit();
        Ok(())
    }
}
