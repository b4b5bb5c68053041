//! # minigfs
//!
//! The coordination core of a chunk-based distributed file store:
//! - A single master managing the file namespace and chunk placement
//! - Chunkservers holding raw chunk bytes behind per-node locks
//! - A client library sequencing the multi-node write and read paths
//! - Heartbeat-based liveness tracking with a background monitor
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                Master                    │
//! │  (namespace + chunk table + liveness)    │
//! │   - allocates chunks, picks primaries    │
//! │   - one global lock over all metadata    │
//! └───────────┬──────────────────────────────┘
//!             │ in-process calls
//!   ┌─────────┴──────────┬──────────────┐
//!   │                    │              │
//! ┌─▼──────────┐  ┌──────▼─────┐  ┌────▼─────────┐
//! │ Chunkserver│  │ Chunkserver│  │ Chunkserver  │
//! │  (bytes)   │  │  (bytes)   │  │  (bytes)     │
//! └────────────┘  └────────────┘  └──────────────┘
//! ```
//!
//! Writes flow client → master (allocate placement) → chunkservers
//! (create, primary append, secondary appends). Reads flow client →
//! master (resolve chunk list) → first reachable replica per chunk.
//!
//! Everything is in-process call/return: no wire protocol, no durable
//! state. Those belong to the layers deliberately left out of this core.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use minigfs::{Chunkserver, Client, Config, Master};
//!
//! # async fn run() -> minigfs::Result<()> {
//! let config = Config::default();
//! let master = Arc::new(Master::new(config.clone()));
//!
//! let cs = Chunkserver::new("chunkserver-1", master.clone(), &config);
//! let client = Client::new(master.clone(), [cs.clone()]);
//!
//! client.create("/data/logs.txt")?;
//! client.append("/data/logs.txt", b"hello\n")?;
//! let data = client.read("/data/logs.txt")?;
//! # Ok(())
//! # }
//! ```

pub mod chunkserver;
pub mod client;
pub mod common;
pub mod master;

// Re-export commonly used types
pub use chunkserver::Chunkserver;
pub use client::Client;
pub use common::{Config, Error, Result};
pub use master::Master;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
