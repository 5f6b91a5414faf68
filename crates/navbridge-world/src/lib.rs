//! World sizing, chunk coordinates, and the block-source interface.
#![forbid(unsafe_code)]

mod chunk_coord;
mod world;

pub use chunk_coord::ChunkCoord;
pub use world::{World, WorldGenMode, WorldView};

/// Chunk footprint in blocks along X and Z.
pub const CHUNK_WIDTH: usize = 16;
/// Vertical extent of the encoded world in blocks.
pub const WORLD_HEIGHT: usize = 384;
/// Offset from world Y to grid row: world Y -64 maps to row 0.
pub const Y_SHIFT: i32 = 64;
/// Highest world Y that still fits the encoded range (inclusive).
pub const MAX_WORLD_Y: i32 = WORLD_HEIGHT as i32 - Y_SHIFT - 1;
/// Water fills open terrain up to this world Y in the sample world.
pub const SEA_LEVEL: i32 = 62;
