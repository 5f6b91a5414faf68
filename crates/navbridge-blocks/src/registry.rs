use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{Block, BlockId, Classification};

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub unknown_block_id: Option<BlockId>,
    pub water_block_id: Option<BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let toml = fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, Box<dyn Error>> {
        Self::from_config(BlocksConfig::from_toml_str(toml)?)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks.into_iter() {
            let id = match def.id {
                Some(id) => id,
                None => reg.blocks.len() as u16,
            };
            // Ids index straight into `blocks`; the config must keep them dense.
            if id as usize != reg.blocks.len() {
                return Err(format!("block `{}` has out-of-order id {}", def.name, id).into());
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name `{}`", def.name).into());
            }
            let solid = def.solid.unwrap_or(true);
            reg.by_name.insert(def.name.clone(), id);
            reg.blocks.push(BlockType {
                id,
                name: def.name,
                solid,
            });
        }
        if let Some(name) = cfg.unknown_block.as_deref() {
            reg.unknown_block_id = Some(
                reg.id_by_name(name)
                    .ok_or_else(|| format!("unknown_block `{name}` is not defined"))?,
            );
        }
        if let Some(name) = cfg.water_block.as_deref() {
            reg.water_block_id = Some(
                reg.id_by_name(name)
                    .ok_or_else(|| format!("water_block `{name}` is not defined"))?,
            );
        }
        Ok(reg)
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    fn type_of(&self, block: Block) -> Option<&BlockType> {
        self.get(block.id)
            .or_else(|| self.unknown_block_id.and_then(|id| self.get(id)))
    }

    /// Solidity of a block; ids outside the registry (and outside the
    /// unknown-block fallback) count as solid.
    pub fn is_solid(&self, block: Block) -> bool {
        self.type_of(block).map(|ty| ty.solid).unwrap_or(true)
    }

    pub fn is_water(&self, block: Block) -> bool {
        self.water_block_id == Some(block.id)
    }

    /// Three-way occupancy policy, in priority order: designated water block,
    /// then non-solid, then solid. Total over every block id.
    pub fn classify(&self, block: Block) -> Classification {
        if self.is_water(block) {
            Classification::Water
        } else if !self.is_solid(block) {
            Classification::Air
        } else {
            Classification::Solid
        }
    }
}
