//! Client library: sequences multi-node writes and reads
//!
//! The client is the only actor that talks to both the master and the
//! chunkservers. It asks the master where data lives (or should live),
//! then drives the per-node calls itself: create on every replica, append
//! to the primary first, then best-effort appends to the secondaries.
//!
//! Chunkservers the client has no handle for model unreachable nodes:
//! they are skipped on writes and fallen past on reads.

use crate::chunkserver::Chunkserver;
use crate::common::{format_bytes, Result};
use crate::master::Master;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Client {
    master: Arc<Master>,
    chunkservers: HashMap<String, Arc<Chunkserver>>,
}

impl Client {
    pub fn new(
        master: Arc<Master>,
        chunkservers: impl IntoIterator<Item = Arc<Chunkserver>>,
    ) -> Self {
        let chunkservers = chunkservers
            .into_iter()
            .map(|cs| (cs.id().to_string(), cs))
            .collect();
        Self {
            master,
            chunkservers,
        }
    }

    /// Make another chunkserver reachable from this client.
    pub fn add_chunkserver(&mut self, chunkserver: Arc<Chunkserver>) {
        self.chunkservers
            .insert(chunkserver.id().to_string(), chunkserver);
    }

    /// Create a new file.
    pub fn create(&self, filename: &str) -> Result<()> {
        self.master.create_file(filename)
    }

    /// Append `data` to `filename` as one freshly allocated chunk.
    ///
    /// Every location receives `create_chunk` before any append. The
    /// primary append must succeed; secondary append failures are
    /// swallowed and never reach the caller or the master.
    pub fn append(&self, filename: &str, data: &[u8]) -> Result<()> {
        let placement = self.master.allocate_chunk_for_append(filename)?;

        for chunkserver_id in &placement.locations {
            if let Some(cs) = self.chunkservers.get(chunkserver_id) {
                cs.create_chunk(&placement.chunk_handle, placement.version);
            }
        }

        let primary = self
            .chunkservers
            .get(&placement.primary)
            .ok_or_else(|| crate::Error::PrimaryUnavailable(placement.primary.clone()))?;

        // A fresh chunk always starts at offset 0; appending into a
        // previously written chunk's tail is not supported.
        let offset = 0;

        primary
            .append_data(&placement.chunk_handle, data, offset)
            .map_err(|_| crate::Error::AppendRejected {
                chunkserver_id: placement.primary.clone(),
                chunk_handle: placement.chunk_handle.clone(),
            })?;

        // Replicate to secondaries. Failures here are invisible to the
        // caller: best-effort only.
        for chunkserver_id in &placement.locations {
            if chunkserver_id == &placement.primary {
                continue;
            }
            match self.chunkservers.get(chunkserver_id) {
                Some(cs) => {
                    if let Err(e) = cs.append_data(&placement.chunk_handle, data, offset) {
                        tracing::debug!(
                            %chunkserver_id,
                            chunk_handle = %placement.chunk_handle,
                            error = %e,
                            "secondary append failed"
                        );
                    }
                }
                None => {
                    tracing::debug!(%chunkserver_id, "secondary not reachable, skipping");
                }
            }
        }

        tracing::info!(filename, size = %format_bytes(data.len() as u64), "appended");
        Ok(())
    }

    /// Read the whole file, chunk by chunk in sequence order.
    ///
    /// Each chunk is taken from the first replica that returns non-empty
    /// data; a chunk with no reachable replica contributes nothing to the
    /// result (no error, no gap marker).
    pub fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let info = self.master.get_file_info(filename)?;
        let chunk_size = self.master.config().chunk_size as usize;

        let mut result = Vec::new();
        for chunk_index in 0..info.num_chunks {
            let placement = match self.master.get_chunk_locations(filename, chunk_index) {
                Ok(placement) => placement,
                Err(_) => continue,
            };

            for chunkserver_id in &placement.locations {
                if let Some(cs) = self.chunkservers.get(chunkserver_id) {
                    if let Ok(data) = cs.read_data(&placement.chunk_handle, 0, chunk_size) {
                        if !data.is_empty() {
                            result.extend_from_slice(&data);
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!(filename, size = %format_bytes(result.len() as u64), "read");
        Ok(result)
    }
}
