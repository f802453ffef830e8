//! Memoized execution results.
//!
//! Re-presenting the same request (same request id) with the same seed
//! and sequence number must not re-run the derivation or re-prompt for
//! consent. The cache keys each slot by the request id and sequence
//! number, and tags it with a fingerprint of the `(seed, sequence)` pair
//! that produced it; a different seed or sequence misses and recomputes.
//!
//! Seeds never enter the cache: only their SHA-256 fingerprints do.
//!
//! A slot is reserved (`begin`) before execution and filled (`commit`)
//! after. Commit only lands if the slot still expects the same
//! fingerprint, so a stale execution superseded by a newer request for
//! the same id silently discards its result.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::response::ApiResponse;

/// Identifies a cache slot: the request id plus its recipe's sequence
/// number.
#[must_use]
pub fn cache_key(request_id: &str, sequence_number: Option<u64>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(request_id.as_bytes());
    hasher.update([0u8]);
    if let Some(sequence) = sequence_number {
        hasher.update(sequence.to_le_bytes());
    }
    hasher.finalize().into()
}

/// Fingerprint of the `(seed, sequence number)` pair an execution ran
/// under. The seed itself is never retained.
#[must_use]
pub fn execution_fingerprint(seed: &str, sequence_number: Option<u64>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update([0u8]);
    if let Some(sequence) = sequence_number {
        hasher.update(sequence.to_le_bytes());
    }
    hasher.finalize().into()
}

/// A reserved or completed execution slot.
#[derive(Debug, Clone)]
struct Slot {
    expected_fingerprint: [u8; 32],
    result: Option<Result<ApiResponse, ApiError>>,
}

/// Result memoization for the request lifecycle.
#[derive(Debug, Default)]
pub struct ResultCache {
    slots: HashMap<[u8; 32], Slot>,
}

impl ResultCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A completed result for this key and fingerprint, if one exists.
    #[must_use]
    pub fn lookup(
        &self,
        key: &[u8; 32],
        fingerprint: &[u8; 32],
    ) -> Option<Result<ApiResponse, ApiError>> {
        self.slots
            .get(key)
            .filter(|slot| slot.expected_fingerprint == *fingerprint)
            .and_then(|slot| slot.result.clone())
    }

    /// Reserve the slot for an execution under this fingerprint.
    ///
    /// Re-reserving an existing key retargets the slot: any in-flight
    /// execution committed against the old fingerprint will be
    /// discarded.
    pub fn begin(&mut self, key: [u8; 32], fingerprint: [u8; 32]) {
        self.slots.insert(key, Slot { expected_fingerprint: fingerprint, result: None });
    }

    /// Store a completed result, if the slot still expects this
    /// fingerprint. Returns whether the result landed.
    pub fn commit(
        &mut self,
        key: &[u8; 32],
        fingerprint: &[u8; 32],
        result: Result<ApiResponse, ApiError>,
    ) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) if slot.expected_fingerprint == *fingerprint => {
                slot.result = Some(result);
                true
            },
            _ => false,
        }
    }
}
