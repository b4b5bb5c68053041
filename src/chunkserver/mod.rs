//! Chunkserver implementation
//!
//! Each chunkserver holds raw chunk bytes in memory behind its own lock
//! and sends periodic heartbeats to the master. Nodes are independent;
//! replication is driven entirely by the client.

pub mod server;
pub mod store;

pub use server::{Chunkserver, HeartbeatSender};
pub use store::ChunkStore;
