use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Name of the block classified as water. Optional; without it nothing
    // classifies as water.
    #[serde(default)]
    pub water_block: Option<String>,
    // Optional name of a block to use as the fallback when a requested id is
    // not in the registry. If absent, unknown ids classify as solid.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
}

impl BlocksConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
