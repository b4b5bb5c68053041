//! Master implementation
//!
//! The master is responsible for:
//! - The file namespace (filename → chunk sequence)
//! - Chunk placement and primary designation
//! - Chunkserver registration and heartbeat-based liveness
//!
//! All metadata lives in memory behind a single mutex.

pub mod metadata;
pub mod placement;
pub mod server;

pub use metadata::{ChunkPlacement, FileInfo};
pub use server::{LivenessMonitor, Master};
