//! In-memory metadata tables owned by the master
//!
//! Three tables, always mutated together under the master's lock:
//! - File namespace (filename → ordered chunk handles)
//! - Chunk table (chunk handle → placement state)
//! - Chunkserver registry (chunkserver id → reported chunks + heartbeat)
//!
//! Nothing here is durable; the tables live and die with the master.

use crate::common::timestamp_now_millis;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Metadata for a file: an append-only sequence of chunk handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub filename: String,
    pub chunk_handles: Vec<String>,
    pub size: u64,
}

impl FileMetadata {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            chunk_handles: Vec::new(),
            size: 0,
        }
    }
}

/// Placement state for a single chunk.
///
/// `version` is recorded at allocation and never advances; `locations`
/// grows via registration and never shrinks; `lease_expiry_ms` is
/// recorded but not enforced anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub chunk_handle: String,
    pub version: u64,
    pub locations: HashSet<String>,
    pub primary: String,
    pub lease_expiry_ms: u64,
}

/// A chunkserver as known to the master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkserverInfo {
    pub chunkserver_id: String,
    pub chunks: HashSet<String>,
    pub last_heartbeat_ms: u64,
}

/// Placement answer handed to clients for one chunk.
///
/// `locations` is ordered with the primary first when freshly allocated;
/// lookups return an arbitrary order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPlacement {
    pub chunk_handle: String,
    pub locations: Vec<String>,
    pub primary: String,
    pub version: u64,
}

/// File-level summary returned by `get_file_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub num_chunks: usize,
    pub size: u64,
}

/// The master's mutable state. All access goes through one mutex in
/// [`crate::master::Master`]; methods here assume the caller holds it.
#[derive(Debug, Default)]
pub struct MetadataTables {
    pub files: HashMap<String, FileMetadata>,
    pub chunks: HashMap<String, ChunkMetadata>,
    pub chunkservers: HashMap<String, ChunkserverInfo>,
}

impl MetadataTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a chunkserver record and join it into the location set of
    /// every chunk it reported that the master already knows about.
    pub fn register_chunkserver(&mut self, chunkserver_id: &str, reported: Vec<String>) {
        let now = timestamp_now_millis();
        for chunk_handle in &reported {
            if let Some(chunk) = self.chunks.get_mut(chunk_handle) {
                chunk.locations.insert(chunkserver_id.to_string());
            }
        }
        self.chunkservers.insert(
            chunkserver_id.to_string(),
            ChunkserverInfo {
                chunkserver_id: chunkserver_id.to_string(),
                chunks: reported.into_iter().collect(),
                last_heartbeat_ms: now,
            },
        );
    }

    /// Refresh a chunkserver's heartbeat, creating the record if the id
    /// was never registered.
    pub fn record_heartbeat(&mut self, chunkserver_id: &str) {
        let now = timestamp_now_millis();
        self.chunkservers
            .entry(chunkserver_id.to_string())
            .or_insert_with(|| ChunkserverInfo {
                chunkserver_id: chunkserver_id.to_string(),
                chunks: HashSet::new(),
                last_heartbeat_ms: now,
            })
            .last_heartbeat_ms = now;
    }

    /// Chunkserver ids whose heartbeat age exceeds `window_ms`.
    pub fn stale_chunkservers(&self, now_ms: u64, window_ms: u64) -> Vec<String> {
        self.chunkservers
            .values()
            .filter(|cs| now_ms.saturating_sub(cs.last_heartbeat_ms) > window_ms)
            .map(|cs| cs.chunkserver_id.clone())
            .collect()
    }

    /// Chunkserver ids eligible for placement: heartbeat age within
    /// `window_ms`.
    pub fn live_chunkservers(&self, now_ms: u64, window_ms: u64) -> Vec<String> {
        self.chunkservers
            .values()
            .filter(|cs| now_ms.saturating_sub(cs.last_heartbeat_ms) < window_ms)
            .map(|cs| cs.chunkserver_id.clone())
            .collect()
    }
}
