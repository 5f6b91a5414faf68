use std::collections::HashMap;
use std::error::Error;
use std::sync::RwLock;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use navbridge_blocks::{Block, BlockRegistry};

use crate::{MAX_WORLD_Y, SEA_LEVEL, Y_SHIFT};

/// Read access to live block state, shared with the encode workers. `None`
/// means the world cannot answer right now (chunk not resident, runtime still
/// starting up); callers skip the affected event rather than guess.
pub trait WorldView: Send + Sync {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<Block>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WorldGenMode {
    Normal,
    Flat { thickness: i32 },
}

/// Noise-backed sample world with a mutable edit overlay. Stands in for the
/// game runtime in the demo binary and in integration tests.
pub struct World {
    pub seed: i32,
    pub mode: WorldGenMode,
    terrain: FastNoiseLite,
    water: Block,
    stone: Block,
    air: Block,
    edits: RwLock<HashMap<(i32, i32, i32), Block>>,
}

impl World {
    pub fn new(seed: i32, mode: WorldGenMode, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(0.012));
        let block = |name: &str| {
            reg.block_by_name(name)
                .ok_or_else(|| format!("blocks config is missing `{name}`"))
        };
        Ok(Self {
            seed,
            mode,
            terrain,
            water: block("water")?,
            stone: block("stone")?,
            air: block("air")?,
            edits: RwLock::new(HashMap::new()),
        })
    }

    /// Highest solid world Y of the generated terrain at (wx, wz). Edits are
    /// not consulted.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        match self.mode {
            WorldGenMode::Flat { thickness } => -Y_SHIFT + thickness.max(0) - 1,
            WorldGenMode::Normal => {
                let n = self.terrain.get_noise_2d(wx as f32, wz as f32);
                (SEA_LEVEL + (n * 24.0) as i32).clamp(-Y_SHIFT, MAX_WORLD_Y)
            }
        }
    }

    /// Overwrite one block, the way a player edit mutates the live world.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, block: Block) {
        self.edits
            .write()
            .expect("edit overlay")
            .insert((wx, wy, wz), block);
    }
}

impl WorldView for World {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if wy < -Y_SHIFT || wy > MAX_WORLD_Y {
            return Some(self.air);
        }
        if let Some(edit) = self.edits.read().ok()?.get(&(wx, wy, wz)) {
            return Some(*edit);
        }
        let surface = self.surface_height(wx, wz);
        Some(if wy <= surface {
            self.stone
        } else if wy <= SEA_LEVEL {
            self.water
        } else {
            self.air
        })
    }
}
