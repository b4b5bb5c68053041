//! The master: single source of truth for namespace and placement
//!
//! The master is responsible for:
//! - File namespace management (create, lookup)
//! - Chunk allocation and primary designation
//! - Chunkserver registration and heartbeat tracking
//! - A background liveness sweep that flags silent chunkservers
//!
//! Every operation takes the one state mutex for its full duration; the
//! master is a single serialization point by design.

use crate::common::{timestamp_now_millis, Config, Result};
use crate::master::metadata::{
    ChunkMetadata, ChunkPlacement, FileInfo, FileMetadata, MetadataTables,
};
use crate::master::placement::{new_chunk_handle, select_chunkservers};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Master {
    config: Config,
    state: Mutex<MetadataTables>,
}

impl Master {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: Mutex::new(MetadataTables::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a chunkserver and the chunks it reports holding.
    ///
    /// Idempotent upsert: re-registering replaces the previous record and
    /// refreshes the heartbeat. Reported handles the master already knows
    /// join that chunk's location set.
    pub fn register_chunkserver(&self, chunkserver_id: &str, chunks: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.register_chunkserver(chunkserver_id, chunks);
        tracing::info!(chunkserver_id, "registered chunkserver");
    }

    /// Process a heartbeat from a chunkserver.
    pub fn heartbeat(&self, chunkserver_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.record_heartbeat(chunkserver_id);
    }

    /// Create a new empty file. No chunk is allocated until the first
    /// append.
    pub fn create_file(&self, filename: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.files.contains_key(filename) {
            return Err(crate::Error::FileExists(filename.to_string()));
        }
        state
            .files
            .insert(filename.to_string(), FileMetadata::new(filename));
        tracing::info!(filename, "created file");
        Ok(())
    }

    /// Allocate a fresh chunk for an append to `filename`.
    ///
    /// Selects up to `replication_factor` live chunkservers, designates
    /// the first as primary, records a lease expiry (never enforced), and
    /// appends the handle to the file's chunk sequence.
    pub fn allocate_chunk_for_append(&self, filename: &str) -> Result<ChunkPlacement> {
        let mut state = self.state.lock().unwrap();
        if !state.files.contains_key(filename) {
            return Err(crate::Error::FileNotFound(filename.to_string()));
        }

        let now = timestamp_now_millis();
        let live = state.live_chunkservers(now, self.config.liveness_window_ms);
        let locations = select_chunkservers(&live, self.config.replication_factor)?;
        let primary = locations[0].clone();

        let chunk_handle = new_chunk_handle();
        state.chunks.insert(
            chunk_handle.clone(),
            ChunkMetadata {
                chunk_handle: chunk_handle.clone(),
                version: 1,
                locations: locations.iter().cloned().collect(),
                primary: primary.clone(),
                lease_expiry_ms: now + self.config.lease_duration_ms,
            },
        );

        let file = state
            .files
            .get_mut(filename)
            .ok_or_else(|| crate::Error::FileNotFound(filename.to_string()))?;
        file.chunk_handles.push(chunk_handle.clone());

        tracing::info!(filename, %chunk_handle, %primary, ?locations, "allocated chunk");

        Ok(ChunkPlacement {
            chunk_handle,
            locations,
            primary,
            version: 1,
        })
    }

    /// Resolve placement for the `chunk_index`-th chunk of `filename`.
    pub fn get_chunk_locations(&self, filename: &str, chunk_index: usize) -> Result<ChunkPlacement> {
        let state = self.state.lock().unwrap();
        let file = state
            .files
            .get(filename)
            .ok_or_else(|| crate::Error::FileNotFound(filename.to_string()))?;

        let chunk_handle = file.chunk_handles.get(chunk_index).ok_or_else(|| {
            crate::Error::ChunkIndexOutOfRange {
                filename: filename.to_string(),
                index: chunk_index,
                num_chunks: file.chunk_handles.len(),
            }
        })?;

        let chunk = state
            .chunks
            .get(chunk_handle)
            .ok_or_else(|| crate::Error::ChunkNotFound(chunk_handle.clone()))?;

        Ok(ChunkPlacement {
            chunk_handle: chunk.chunk_handle.clone(),
            locations: chunk.locations.iter().cloned().collect(),
            primary: chunk.primary.clone(),
            version: chunk.version,
        })
    }

    /// File-level summary: chunk count and recorded size.
    pub fn get_file_info(&self, filename: &str) -> Result<FileInfo> {
        let state = self.state.lock().unwrap();
        let file = state
            .files
            .get(filename)
            .ok_or_else(|| crate::Error::FileNotFound(filename.to_string()))?;
        Ok(FileInfo {
            filename: filename.to_string(),
            num_chunks: file.chunk_handles.len(),
            size: file.size,
        })
    }

    /// One liveness sweep: log every chunkserver whose heartbeat has gone
    /// stale and return their ids.
    ///
    /// Observation only. No re-replication or primary reassignment is
    /// triggered here.
    pub fn sweep_liveness(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let stale =
            state.stale_chunkservers(timestamp_now_millis(), self.config.liveness_window_ms);
        for chunkserver_id in &stale {
            tracing::warn!(%chunkserver_id, "chunkserver appears dead");
        }
        stale
    }

    /// Spawn the periodic liveness sweep. Runs once per heartbeat
    /// interval until the returned monitor is shut down.
    pub fn spawn_liveness_monitor(self: &Arc<Self>) -> LivenessMonitor {
        let master = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = master.config.heartbeat_interval();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        master.sweep_liveness();
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("liveness monitor stopped");
        });

        LivenessMonitor {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Handle to the background liveness sweep task.
pub struct LivenessMonitor {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl LivenessMonitor {
    /// Signal the sweep loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
