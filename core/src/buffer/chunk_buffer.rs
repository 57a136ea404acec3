//! buffer/chunk_buffer.rs
//! Ordered sequence of immutable, reference-counted chunks.
//!
//! Invariants:
//! - `len()` always equals the sum of the chunk lengths.
//! - `count()` always equals the number of chunks.
//! - The only mutations are `push` (append one chunk) and `restore_to`
//!   (drop trailing chunks back to a snapshot).

use std::slice;

use bytes::Bytes;

/// Position of a `ChunkBuffer` captured before a mutating attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub count: usize,
    pub length: usize,
}

/// One logical byte payload split across owned chunks.
#[derive(Clone, Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Bytes>,
    length: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        let mut buffer = Self::new();
        for chunk in chunks {
            buffer.push(chunk);
        }
        buffer
    }

    /// Append one chunk. Zero-length chunks are kept and counted.
    pub fn push(&mut self, chunk: Bytes) {
        self.length += chunk.len();
        self.chunks.push(chunk);
    }

    /// Total payload length in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Number of chunks.
    pub fn count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    pub fn iter(&self) -> slice::Iter<'_, Bytes> {
        self.chunks.iter()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { count: self.chunks.len(), length: self.length }
    }

    /// Truncate back to `snapshot`, releasing every chunk appended since.
    ///
    /// # Panics
    /// If the snapshot was not taken from an ancestor state of this buffer.
    pub fn restore_to(&mut self, snapshot: Snapshot) {
        assert!(
            snapshot.count <= self.chunks.len() && snapshot.length <= self.length,
            "snapshot {:?} is ahead of buffer (count={}, length={})",
            snapshot,
            self.chunks.len(),
            self.length,
        );
        self.chunks.truncate(snapshot.count);
        self.length = snapshot.length;
        debug_assert_eq!(self.length, self.chunks.iter().map(Bytes::len).sum::<usize>());
    }

    /// Append every chunk of `other` by reference; no bytes are copied.
    pub fn extend_shared(&mut self, other: &ChunkBuffer) {
        self.chunks.reserve(other.count());
        for chunk in other.iter() {
            self.push(chunk.clone());
        }
    }

    /// Concatenate all chunks into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}

impl From<Bytes> for ChunkBuffer {
    fn from(chunk: Bytes) -> Self {
        Self::from_chunks([chunk])
    }
}

impl From<Vec<u8>> for ChunkBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from(Bytes::from(data))
    }
}

impl From<&[u8]> for ChunkBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from(Bytes::copy_from_slice(data))
    }
}

impl<'a> IntoIterator for &'a ChunkBuffer {
    type Item = &'a Bytes;
    type IntoIter = slice::Iter<'a, Bytes>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
