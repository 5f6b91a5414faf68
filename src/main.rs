use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use navbridge::NavBridge;
use navbridge::commands::CommandSink;
use navbridge_blocks::{Block, BlockRegistry};
use navbridge_engine::MemoryEngine;
use navbridge_world::{ChunkCoord, MAX_WORLD_Y, World, WorldGenMode, WorldView, Y_SHIFT};

#[derive(Parser, Debug)]
#[command(
    name = "navbridge",
    about = "Mirror a voxel world into a navigation grid engine"
)]
struct Cli {
    /// Blocks config (TOML)
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// World seed
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Use a flat world with the given ground thickness instead of noise
    /// terrain
    #[arg(long)]
    flat: Option<i32>,
    /// Chunk radius streamed around the origin
    #[arg(long, default_value_t = 3)]
    radius: i32,
    /// Chat prefix routed to the command sink
    #[arg(long, default_value_t = '!')]
    prefix: char,
}

struct EngineCommands {
    engine: Arc<MemoryEngine>,
}

impl CommandSink for EngineCommands {
    fn dispatch(&self, line: &str) -> Result<(), Box<dyn Error>> {
        match line.trim() {
            "stats" => {
                log::info!(
                    target: "commands",
                    "{} chunks resident ({} bytes)",
                    self.engine.resident_chunks(),
                    self.engine.resident_bytes()
                );
                Ok(())
            }
            other => Err(format!("unknown command: {other}").into()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let blocks = Arc::new(BlockRegistry::from_path(&cli.blocks)?);
    let mode = match cli.flat {
        Some(thickness) => WorldGenMode::Flat { thickness },
        None => WorldGenMode::Normal,
    };
    let world = Arc::new(World::new(cli.seed, mode, &blocks)?);
    let engine = Arc::new(MemoryEngine::new());
    let bridge = NavBridge::new(world.clone(), blocks.clone(), engine.clone()).with_command_sink(
        cli.prefix,
        Arc::new(EngineCommands {
            engine: engine.clone(),
        }),
    );
    log::info!("world seed {} ({:?})", world.seed, world.mode);

    // Stream a square of chunks around the origin, the way the world runtime
    // fires load events while a player stands at (0, 0).
    let mut loaded = Vec::new();
    for cx in -cli.radius..=cli.radius {
        for cz in -cli.radius..=cli.radius {
            let coord = ChunkCoord::new(cx, cz);
            bridge.on_chunk_load(coord);
            loaded.push(coord);
        }
    }
    // A duplicate load is absorbed by the claim.
    bridge.on_chunk_load(ChunkCoord::new(0, 0));

    let expected = loaded.len() as u64;
    while bridge.completed_encodes() < expected {
        bridge.pump();
        thread::sleep(Duration::from_millis(5));
    }
    bridge.pump();
    log::info!(
        "{} chunks tracked, {} resident in engine",
        bridge.tracked_chunks(),
        engine.resident_chunks()
    );

    bridge.on_chat_message(&format!("{}stats", cli.prefix));

    // Dig out the surface block under the origin and report the patched cell.
    let (wx, wz) = (0, 0);
    let surface = (-Y_SHIFT..=MAX_WORLD_Y)
        .rev()
        .find(|&wy| {
            world
                .block_at(wx, wy, wz)
                .is_some_and(|b| blocks.is_solid(b))
        })
        .unwrap_or(-Y_SHIFT);
    let air = blocks.block_by_name("air").unwrap_or(Block::AIR);
    bridge.on_block_update(wx, surface, wz, air);
    world.set_block(wx, surface, wz, air);
    log::info!(
        "dug ({wx}, {surface}, {wz}); engine cell now {:?}",
        engine.cell(wx, surface, wz)
    );

    // Tear everything down; the engine must end empty.
    for coord in loaded {
        bridge.on_chunk_unload(coord);
    }
    bridge.pump();
    log::info!(
        "{} chunks tracked, {} resident after unload",
        bridge.tracked_chunks(),
        engine.resident_chunks()
    );
    Ok(())
}
