use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use navbridge_world::ChunkCoord;

/// Claim stamp. Strictly increasing across claims; an encode result whose
/// stamp no longer matches the live entry has lost its claim.
pub type Generation = u64;

/// Concurrent set of tracked chunk columns. Membership is the single source
/// of truth for "the spatial engine knows, or is about to know, this chunk".
#[derive(Default)]
pub struct ChunkRegistry {
    inner: Mutex<HashMap<ChunkCoord, Generation>>,
    counter: AtomicU64,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-if-absent. `Some` iff this call performed the insertion,
    /// carrying the claim's generation stamp; exactly one of N concurrent
    /// claimants for the same coordinate wins.
    pub fn claim(&self, coord: ChunkCoord) -> Option<Generation> {
        let mut inner = self.inner.lock().unwrap();
        if inner.contains_key(&coord) {
            return None;
        }
        let stamp = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        inner.insert(coord, stamp);
        Some(stamp)
    }

    /// Remove a coordinate. Releasing an absent coordinate is a no-op.
    pub fn release(&self, coord: ChunkCoord) {
        self.inner.lock().unwrap().remove(&coord);
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.inner.lock().unwrap().contains_key(&coord)
    }

    /// Stamp of the live claim, if any.
    pub fn generation(&self, coord: ChunkCoord) -> Option<Generation> {
        self.inner.lock().unwrap().get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<ChunkCoord> {
        self.inner.lock().unwrap().keys().copied().collect()
    }
}
