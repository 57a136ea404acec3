use std::fmt;
use num_enum::TryFromPrimitive;

use bytes::Bytes;

use crate::buffer::ChunkBuffer;

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Split `data` into a `ChunkBuffer` of `chunk_len`-sized chunks (last one may be shorter).
/// A zero `chunk_len` yields a single chunk.
pub fn chunked(data: &[u8], chunk_len: usize) -> ChunkBuffer {
    if chunk_len == 0 || data.is_empty() {
        return ChunkBuffer::from(data);
    }
    let shared = Bytes::copy_from_slice(data);
    ChunkBuffer::from_chunks(
        (0..data.len())
            .step_by(chunk_len)
            .map(|start| shared.slice(start..(start + chunk_len).min(data.len()))),
    )
}
