//! buffer/transaction.rs
//! Snapshot/rollback guard over an output `ChunkBuffer`.
//!
//! A codec opens a `Transaction` before writing anything. Dropping the
//! transaction without `commit()` restores the buffer to the snapshot taken
//! at `begin`, so every early return (`?`) rolls back on its own.

use crate::buffer::chunk_buffer::{ChunkBuffer, Snapshot};

pub struct Transaction<'a> {
    buffer: &'a mut ChunkBuffer,
    snapshot: Snapshot,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub fn begin(buffer: &'a mut ChunkBuffer) -> Self {
        let snapshot = buffer.snapshot();
        Self { buffer, snapshot, committed: false }
    }

    pub fn buffer_mut(&mut self) -> &mut ChunkBuffer {
        self.buffer
    }

    /// Bytes appended since `begin`.
    pub fn appended_len(&self) -> usize {
        self.buffer.len() - self.snapshot.length
    }

    /// Keep everything appended during the attempt.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.buffer.restore_to(self.snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn drop_without_commit_rolls_back() {
        let mut buf = ChunkBuffer::from(b"keep".to_vec());
        let before = buf.snapshot();
        {
            let mut txn = Transaction::begin(&mut buf);
            txn.buffer_mut().push(Bytes::from_static(b"discard"));
            assert_eq!(txn.appended_len(), 7);
        }
        assert_eq!(buf.snapshot(), before);
        assert_eq!(buf.to_vec(), b"keep");
    }

    #[test]
    fn commit_keeps_appended_chunks() {
        let mut buf = ChunkBuffer::new();
        let mut txn = Transaction::begin(&mut buf);
        txn.buffer_mut().push(Bytes::from_static(b"kept"));
        txn.commit();
        assert_eq!(buf.count(), 1);
        assert_eq!(buf.to_vec(), b"kept");
    }

    #[test]
    fn early_return_rolls_back() {
        fn step(fail: bool) -> Result<(), &'static str> {
            if fail { Err("codec failed") } else { Ok(()) }
        }

        fn attempt(buf: &mut ChunkBuffer, fail: bool) -> Result<(), &'static str> {
            let mut txn = Transaction::begin(buf);
            txn.buffer_mut().push(Bytes::from_static(b"partial"));
            step(fail)?;
            txn.commit();
            Ok(())
        }

        let mut buf = ChunkBuffer::new();
        assert!(attempt(&mut buf, true).is_err());
        assert_eq!(buf.count(), 0);
        assert_eq!(buf.len(), 0);

        assert!(attempt(&mut buf, false).is_ok());
        assert_eq!(buf.count(), 1);
    }
}
