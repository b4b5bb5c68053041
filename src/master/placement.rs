//! Chunk handle generation and replica selection
//!
//! Placement is deliberately simple: sample uniformly at random, without
//! replacement, from the chunkservers whose heartbeat is fresh. The first
//! sampled server becomes the chunk's primary.

use crate::common::{timestamp_now_millis, Result};
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};

/// Width of a chunk handle in hex characters.
const HANDLE_HEX_LEN: usize = 16;

/// Generate a new chunk handle.
///
/// SHA-256 over the current wall-clock millis plus a random u64,
/// truncated to 16 hex chars. Uniqueness is probabilistic, not
/// guaranteed; the collision probability is treated as negligible.
pub fn new_chunk_handle() -> String {
    let seed = format!("{}{}", timestamp_now_millis(), rand::random::<u64>());
    let digest = Sha256::digest(seed.as_bytes());
    hex::encode(digest)[..HANDLE_HEX_LEN].to_string()
}

/// Select up to `count` chunkservers from `candidates`, uniformly at
/// random without replacement. Fails when no candidate is available.
pub fn select_chunkservers(candidates: &[String], count: usize) -> Result<Vec<String>> {
    if candidates.is_empty() {
        return Err(crate::Error::NoLiveChunkservers);
    }

    let mut rng = rand::thread_rng();
    let mut selected: Vec<String> = candidates
        .choose_multiple(&mut rng, count.min(candidates.len()))
        .cloned()
        .collect();
    // choose_multiple does not promise a random order; the first entry
    // becomes the primary, so shuffle before returning.
    selected.shuffle(&mut rng);
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn candidates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("cs-{}", i)).collect()
    }

    #[test]
    fn test_handle_shape() {
        let handle = new_chunk_handle();
        assert_eq!(handle.len(), 16);
        assert!(handle.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_handles_differ() {
        let a = new_chunk_handle();
        let b = new_chunk_handle();
        assert_ne!(a, b);
    }

    #[test]
    fn test_select_caps_at_candidate_count() {
        let selected = select_chunkservers(&candidates(2), 3).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_select_without_replacement() {
        let selected = select_chunkservers(&candidates(5), 3).unwrap();
        assert_eq!(selected.len(), 3);
        let unique: HashSet<_> = selected.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_select_fails_with_no_candidates() {
        assert!(select_chunkservers(&[], 3).is_err());
    }
}
