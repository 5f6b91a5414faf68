use navbridge_blocks::{Block, BlockRegistry, Classification};
use navbridge_grid::{GRID_CELLS, VoxelGrid, encode_chunk, grid_index, grid_y};
use navbridge_world::{CHUNK_WIDTH, ChunkCoord, WORLD_HEIGHT, WorldView, Y_SHIFT};
use proptest::prelude::*;

const BLOCKS_TOML: &str = r#"
water_block = "water"

[[blocks]]
name = "air"
id = 0
solid = false

[[blocks]]
name = "water"
id = 1
solid = false

[[blocks]]
name = "stone"
id = 2
"#;

fn registry() -> BlockRegistry {
    BlockRegistry::from_toml_str(BLOCKS_TOML).expect("registry")
}

// Block id pattern derived from the cell position, so the expected byte at
// every index is known in closed form.
struct PatternWorld;

fn pattern_id(wx: i32, wy: i32, wz: i32) -> u16 {
    (wx + wy + wz).rem_euclid(3) as u16
}

impl WorldView for PatternWorld {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        Some(Block::new(pattern_id(wx, wy, wz)))
    }
}

// Solid ground below world Y 0, one water cell carved in, air above.
struct WaterPocketWorld {
    coord: ChunkCoord,
}

impl WorldView for WaterPocketWorld {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if wx == self.coord.base_x() && wz == self.coord.base_z() && wy == 50 - Y_SHIFT {
            return Some(Block::new(1));
        }
        Some(if wy < 0 {
            Block::new(2)
        } else {
            Block::new(0)
        })
    }
}

// Answers until flipped off partway through a pass.
struct VanishingWorld {
    remaining: std::sync::atomic::AtomicUsize,
}

impl WorldView for VanishingWorld {
    fn block_at(&self, _wx: i32, _wy: i32, _wz: i32) -> Option<Block> {
        use std::sync::atomic::Ordering;
        let left = self.remaining.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
            n.checked_sub(1)
        });
        left.ok().map(|_| Block::new(2))
    }
}

#[test]
fn grid_index_is_a_bijection_over_the_volume() {
    let mut seen = vec![false; GRID_CELLS];
    for x in 0..CHUNK_WIDTH {
        for y in 0..WORLD_HEIGHT {
            for z in 0..CHUNK_WIDTH {
                let i = grid_index(x, y, z);
                assert!(i < GRID_CELLS);
                assert!(!seen[i], "duplicate index at ({x}, {y}, {z})");
                seen[i] = true;
            }
        }
    }
    assert!(seen.into_iter().all(|hit| hit));
}

#[test]
fn encode_writes_classification_plus_one_at_the_layout_index() {
    let reg = registry();
    let coord = ChunkCoord::new(3, 7);
    let grid = encode_chunk(&PatternWorld, &reg, coord).expect("grid");
    let bytes = grid.as_bytes();
    assert_eq!(bytes.len(), GRID_CELLS);
    for x in 0..CHUNK_WIDTH {
        for z in 0..CHUNK_WIDTH {
            for y in 0..WORLD_HEIGHT {
                let wx = coord.base_x() + x as i32;
                let wy = y as i32 - Y_SHIFT;
                let wz = coord.base_z() + z as i32;
                let expect = reg.classify(Block::new(pattern_id(wx, wy, wz))).encode();
                assert_eq!(
                    bytes[x * CHUNK_WIDTH * WORLD_HEIGHT + y * CHUNK_WIDTH + z],
                    expect,
                    "mismatch at ({x}, {y}, {z})"
                );
            }
        }
    }
}

#[test]
fn water_pocket_scenario() {
    let reg = registry();
    let coord = ChunkCoord::new(3, 7);
    let grid = encode_chunk(&WaterPocketWorld { coord }, &reg, coord).expect("grid");
    // The single water cell at local (0, 50, 0).
    assert_eq!(grid.get(0, 50, 0), Classification::Water.encode());
    // Ground fills every row below grid Y 64.
    assert_eq!(grid.get(0, 0, 0), Classification::Solid.encode());
    assert_eq!(grid.get(5, 63, 9), Classification::Solid.encode());
    // Open air above.
    assert_eq!(grid.get(0, 64, 0), Classification::Air.encode());
    assert_eq!(grid.get(15, 200, 15), Classification::Air.encode());
    // Nothing is left unclassified.
    assert!(grid.as_bytes().iter().all(|&b| b != 0));
}

#[test]
fn failed_block_query_aborts_the_pass() {
    let reg = registry();
    let world = VanishingWorld {
        remaining: std::sync::atomic::AtomicUsize::new(GRID_CELLS / 2),
    };
    assert!(encode_chunk(&world, &reg, ChunkCoord::new(0, 0)).is_none());
}

#[test]
fn voxel_grid_set_get_round_trip() {
    let mut grid = VoxelGrid::new();
    assert_eq!(grid.get(4, 100, 11), 0);
    grid.set(4, 100, 11, 3);
    assert_eq!(grid.get(4, 100, 11), 3);
    assert_eq!(grid.as_bytes()[grid_index(4, 100, 11)], 3);
}

proptest! {
    #[test]
    fn grid_y_maps_exactly_the_encoded_range(wy in -1_000i32..=1_000) {
        match grid_y(wy) {
            Some(y) => {
                prop_assert!((-Y_SHIFT..WORLD_HEIGHT as i32 - Y_SHIFT).contains(&wy));
                prop_assert_eq!(y as i32, wy + Y_SHIFT);
            }
            None => {
                prop_assert!(wy < -Y_SHIFT || wy >= WORLD_HEIGHT as i32 - Y_SHIFT);
            }
        }
    }

    // z is the minor axis, y strides by one chunk row, x by a full column.
    #[test]
    fn grid_index_strides(
        x in 0usize..CHUNK_WIDTH - 1,
        y in 0usize..WORLD_HEIGHT - 1,
        z in 0usize..CHUNK_WIDTH - 1,
    ) {
        let base = grid_index(x, y, z);
        prop_assert_eq!(grid_index(x, y, z + 1), base + 1);
        prop_assert_eq!(grid_index(x, y + 1, z), base + CHUNK_WIDTH);
        prop_assert_eq!(grid_index(x + 1, y, z), base + CHUNK_WIDTH * WORLD_HEIGHT);
    }
}
