//! Error types for minigfs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Namespace Errors ===
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("Chunk index {index} out of range for {filename} ({num_chunks} chunks)")]
    ChunkIndexOutOfRange {
        filename: String,
        index: usize,
        num_chunks: usize,
    },

    // === Placement Errors ===
    #[error("No live chunkservers available for placement")]
    NoLiveChunkservers,

    // === Chunkserver Errors ===
    #[error("Chunk not found: {0}")]
    ChunkNotFound(String),

    #[error("Primary chunkserver {0} not reachable")]
    PrimaryUnavailable(String),

    #[error("Append rejected by {chunkserver_id} for chunk {chunk_handle}")]
    AppendRejected {
        chunkserver_id: String,
        chunk_handle: String,
    },

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a "thing does not exist" error?
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound(_) | Error::ChunkNotFound(_) | Error::ChunkIndexOutOfRange { .. }
        )
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
