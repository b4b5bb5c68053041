//! In-memory chunk storage
//!
//! A keyed collection of byte buffers plus per-chunk versions. The store
//! knows nothing about files, placement, or other chunkservers; the
//! caller (one chunkserver) serializes access with its own lock.

use crate::common::Result;
use bytes::{Bytes, BytesMut};
use std::collections::HashMap;

/// Chunk buffers held by one chunkserver.
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: HashMap<String, BytesMut>,
    versions: HashMap<String, u64>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize an empty buffer for `chunk_handle`.
    ///
    /// Re-creating an existing chunk resets its buffer; creation is
    /// idempotent rather than error-checked.
    pub fn create_chunk(&mut self, chunk_handle: &str, version: u64) {
        self.chunks.insert(chunk_handle.to_string(), BytesMut::new());
        self.versions.insert(chunk_handle.to_string(), version);
    }

    /// Write `data` into `chunk_handle` starting at `offset`.
    ///
    /// A gap between the current length and `offset` is zero-filled.
    /// Writes inside existing bounds overwrite in place; writes past the
    /// end extend the buffer.
    pub fn append_data(&mut self, chunk_handle: &str, data: &[u8], offset: usize) -> Result<()> {
        let chunk = self
            .chunks
            .get_mut(chunk_handle)
            .ok_or_else(|| crate::Error::ChunkNotFound(chunk_handle.to_string()))?;

        if offset > chunk.len() {
            chunk.resize(offset, 0);
        }

        let end = offset + data.len();
        if end > chunk.len() {
            chunk.resize(end, 0);
        }
        chunk[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Read `[offset, offset + length)` from `chunk_handle`, silently
    /// clipped to the buffer's bounds.
    pub fn read_data(&self, chunk_handle: &str, offset: usize, length: usize) -> Result<Bytes> {
        let chunk = self
            .chunks
            .get(chunk_handle)
            .ok_or_else(|| crate::Error::ChunkNotFound(chunk_handle.to_string()))?;

        let start = offset.min(chunk.len());
        let end = offset.saturating_add(length).min(chunk.len());
        Ok(Bytes::copy_from_slice(&chunk[start..end]))
    }

    /// Handles of all chunks currently held.
    pub fn chunk_handles(&self) -> Vec<String> {
        self.chunks.keys().cloned().collect()
    }

    /// Recorded version for a chunk, if held.
    pub fn chunk_version(&self, chunk_handle: &str) -> Option<u64> {
        self.versions.get(chunk_handle).copied()
    }

    /// Length of a chunk's buffer, if held.
    pub fn chunk_len(&self, chunk_handle: &str) -> Option<usize> {
        self.chunks.get(chunk_handle).map(|c| c.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_to_unknown_chunk_fails() {
        let mut store = ChunkStore::new();
        assert!(matches!(
            store.append_data("missing", b"data", 0),
            Err(crate::Error::ChunkNotFound(_))
        ));
    }

    #[test]
    fn test_read_unknown_chunk_fails() {
        let store = ChunkStore::new();
        assert!(store.read_data("missing", 0, 16).is_err());
    }

    #[test]
    fn test_append_and_read_back() {
        let mut store = ChunkStore::new();
        store.create_chunk("c1", 1);
        store.append_data("c1", b"hello", 0).unwrap();
        assert_eq!(store.read_data("c1", 0, 64).unwrap().as_ref(), b"hello");
        assert_eq!(store.chunk_version("c1"), Some(1));
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut store = ChunkStore::new();
        store.create_chunk("c1", 1);
        store.append_data("c1", b"hello world", 0).unwrap();
        store.append_data("c1", b"HELLO", 0).unwrap();
        assert_eq!(
            store.read_data("c1", 0, 64).unwrap().as_ref(),
            b"HELLO world"
        );
    }

    #[test]
    fn test_gap_is_zero_filled() {
        let mut store = ChunkStore::new();
        store.create_chunk("c1", 1);
        store.append_data("c1", b"tail", 4).unwrap();
        let data = store.read_data("c1", 0, 64).unwrap();
        assert_eq!(data.as_ref(), b"\x00\x00\x00\x00tail");
    }

    #[test]
    fn test_read_is_clipped_not_errored() {
        let mut store = ChunkStore::new();
        store.create_chunk("c1", 1);
        store.append_data("c1", b"abc", 0).unwrap();
        assert_eq!(store.read_data("c1", 1, 100).unwrap().as_ref(), b"bc");
        assert!(store.read_data("c1", 10, 4).unwrap().is_empty());
    }

    #[test]
    fn test_create_resets_existing_buffer() {
        let mut store = ChunkStore::new();
        store.create_chunk("c1", 1);
        store.append_data("c1", b"old contents", 0).unwrap();
        store.create_chunk("c1", 1);
        assert_eq!(store.chunk_len("c1"), Some(0));
        store.append_data("c1", b"new", 0).unwrap();
        assert_eq!(store.read_data("c1", 0, 64).unwrap().as_ref(), b"new");
    }
}
