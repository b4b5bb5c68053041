//! Chunkserver: one storage node
//!
//! Owns a [`ChunkStore`] behind its own lock, registers with the master
//! at construction, and can run a periodic heartbeat sender. Chunkservers
//! never talk to each other.

use crate::chunkserver::store::ChunkStore;
use crate::common::{Config, Result};
use crate::master::Master;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Chunkserver {
    chunkserver_id: String,
    master: Arc<Master>,
    store: Mutex<ChunkStore>,
    heartbeat_interval: Duration,
}

impl Chunkserver {
    /// Create a chunkserver and register it with the master, reporting
    /// the chunks it holds (none at startup).
    pub fn new(chunkserver_id: impl Into<String>, master: Arc<Master>, config: &Config) -> Arc<Self> {
        let server = Arc::new(Self {
            chunkserver_id: chunkserver_id.into(),
            master: master.clone(),
            store: Mutex::new(ChunkStore::new()),
            heartbeat_interval: config.heartbeat_interval(),
        });
        master.register_chunkserver(&server.chunkserver_id, server.held_chunks());
        server
    }

    pub fn id(&self) -> &str {
        &self.chunkserver_id
    }

    /// Handles of all chunks currently held.
    pub fn held_chunks(&self) -> Vec<String> {
        self.store.lock().unwrap().chunk_handles()
    }

    /// Initialize an empty buffer for a chunk. Idempotent: re-creation
    /// resets the buffer.
    pub fn create_chunk(&self, chunk_handle: &str, version: u64) {
        let mut store = self.store.lock().unwrap();
        store.create_chunk(chunk_handle, version);
        tracing::debug!(
            chunkserver_id = %self.chunkserver_id,
            chunk_handle,
            version,
            "created chunk"
        );
    }

    /// Write `data` at `offset` within a held chunk.
    pub fn append_data(&self, chunk_handle: &str, data: &[u8], offset: usize) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.append_data(chunk_handle, data, offset)?;
        tracing::debug!(
            chunkserver_id = %self.chunkserver_id,
            chunk_handle,
            bytes = data.len(),
            offset,
            "appended data"
        );
        Ok(())
    }

    /// Read up to `length` bytes at `offset` from a held chunk.
    pub fn read_data(&self, chunk_handle: &str, offset: usize, length: usize) -> Result<Bytes> {
        let store = self.store.lock().unwrap();
        store.read_data(chunk_handle, offset, length)
    }

    /// Spawn the periodic heartbeat sender. Runs until the returned
    /// handle is shut down.
    pub fn spawn_heartbeat(self: &Arc<Self>) -> HeartbeatSender {
        let server = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(server.heartbeat_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        server.master.heartbeat(&server.chunkserver_id);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(chunkserver_id = %server.chunkserver_id, "heartbeat sender stopped");
        });

        HeartbeatSender {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Handle to a chunkserver's background heartbeat task.
pub struct HeartbeatSender {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl HeartbeatSender {
    /// Signal the heartbeat loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registers_with_master() {
        let config = Config::default();
        let master = Arc::new(Master::new(config.clone()));
        let _cs = Chunkserver::new("cs-1", master.clone(), &config);

        // Registration stamps a heartbeat, so the node is immediately
        // eligible for placement.
        master.create_file("/f").unwrap();
        let placement = master.allocate_chunk_for_append("/f").unwrap();
        assert_eq!(placement.locations, vec!["cs-1".to_string()]);
    }

    #[test]
    fn test_store_ops_round_trip() {
        let config = Config::default();
        let master = Arc::new(Master::new(config.clone()));
        let cs = Chunkserver::new("cs-1", master, &config);

        cs.create_chunk("c1", 1);
        cs.append_data("c1", b"payload", 0).unwrap();
        assert_eq!(cs.read_data("c1", 0, 64).unwrap().as_ref(), b"payload");
        assert_eq!(cs.held_chunks(), vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn test_heartbeat_sender_shutdown() {
        let config = Config {
            heartbeat_interval_ms: 10,
            ..Config::default()
        };
        let master = Arc::new(Master::new(config.clone()));
        let cs = Chunkserver::new("cs-1", master, &config);

        let heartbeat = cs.spawn_heartbeat();
        tokio::time::sleep(Duration::from_millis(30)).await;
        heartbeat.shutdown().await;
    }
}
