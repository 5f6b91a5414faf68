use serde::{Deserialize, Serialize};

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
}

pub type BlockId = u16;

impl Block {
    pub const AIR: Block = Block { id: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }
}

/// Three-way occupancy category for a single voxel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Classification {
    Air = 0,
    Water = 1,
    Solid = 2,
}

impl Classification {
    /// Wire byte handed to the spatial engine: category index + 1, so zero
    /// always reads as "no data" on the engine side.
    #[inline]
    pub const fn encode(self) -> u8 {
        self as u8 + 1
    }

    #[inline]
    pub const fn decode(byte: u8) -> Option<Classification> {
        match byte {
            1 => Some(Classification::Air),
            2 => Some(Classification::Water),
            3 => Some(Classification::Solid),
            _ => None,
        }
    }
}
