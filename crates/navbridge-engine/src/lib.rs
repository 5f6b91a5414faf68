//! Spatial engine boundary and the in-memory reference consumer.
#![forbid(unsafe_code)]

use std::sync::Mutex;

use hashbrown::HashMap;
use navbridge_blocks::Classification;
use navbridge_grid::{VoxelGrid, grid_index, grid_y};
use navbridge_world::ChunkCoord;

/// One-way calls into the external spatial engine. Fire-and-forget from the
/// core's perspective; no call returns a value the core consumes.
pub trait SpatialEngine: Send + Sync {
    /// Replace or create the engine's representation of a chunk column.
    fn build(&self, cx: i32, cz: i32, grid: VoxelGrid);
    /// Discard a chunk column. Unknown columns are a no-op.
    fn remove(&self, cx: i32, cz: i32);
    /// Patch a single cell of an already-built chunk. Patching a chunk that
    /// was never built is undefined at this boundary; the router gates these
    /// calls on registry membership.
    fn set(&self, wx: i32, wy: i32, wz: i32, class: Classification);
}

/// Reference consumer keeping every built grid resident in memory. Used by
/// the demo binary and integration tests; a production deployment would back
/// this trait with the native navigation engine instead.
#[derive(Default)]
pub struct MemoryEngine {
    chunks: Mutex<HashMap<(i32, i32), Vec<u8>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_chunks(&self) -> usize {
        self.chunks.lock().unwrap().len()
    }

    pub fn resident_bytes(&self) -> usize {
        self.chunks.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Stored wire byte for a world cell, if its chunk is resident.
    pub fn cell(&self, wx: i32, wy: i32, wz: i32) -> Option<u8> {
        let y = grid_y(wy)?;
        let coord = ChunkCoord::containing(wx, wz);
        let chunks = self.chunks.lock().unwrap();
        let cells = chunks.get(&(coord.cx, coord.cz))?;
        let x = (wx - coord.base_x()) as usize;
        let z = (wz - coord.base_z()) as usize;
        cells.get(grid_index(x, y, z)).copied()
    }
}

impl SpatialEngine for MemoryEngine {
    fn build(&self, cx: i32, cz: i32, grid: VoxelGrid) {
        let replaced = self
            .chunks
            .lock()
            .unwrap()
            .insert((cx, cz), grid.into_bytes())
            .is_some();
        if replaced {
            log::debug!(target: "engine", "rebuilt chunk ({cx}, {cz})");
        }
    }

    fn remove(&self, cx: i32, cz: i32) {
        self.chunks.lock().unwrap().remove(&(cx, cz));
    }

    fn set(&self, wx: i32, wy: i32, wz: i32, class: Classification) {
        let Some(y) = grid_y(wy) else {
            log::debug!(target: "engine", "patch at ({wx}, {wy}, {wz}) outside the grid");
            return;
        };
        let coord = ChunkCoord::containing(wx, wz);
        let mut chunks = self.chunks.lock().unwrap();
        let Some(cells) = chunks.get_mut(&(coord.cx, coord.cz)) else {
            log::debug!(
                target: "engine",
                "patch at ({wx}, {wy}, {wz}) targets an unbuilt chunk"
            );
            return;
        };
        let x = (wx - coord.base_x()) as usize;
        let z = (wz - coord.base_z()) as usize;
        cells[grid_index(x, y, z)] = class.encode();
    }
}
