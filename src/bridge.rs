use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use navbridge_blocks::{Block, BlockRegistry};
use navbridge_engine::SpatialEngine;
use navbridge_runtime::{ChunkRegistry, EncodeJob, Runtime};
use navbridge_world::{ChunkCoord, WorldView};

use crate::commands::{CommandSink, strip_command};

/// Event router between the world runtime and the spatial engine. Load events
/// claim a chunk and hand it to the encode pool; unloads tear the chunk down;
/// block updates patch single cells; `pump` turns finished encodes into
/// engine builds.
///
/// Per coordinate the router moves through three states: untracked, pending
/// (claimed, encode in flight), and tracked (build issued). Registry
/// membership covers both pending and tracked.
pub struct NavBridge {
    world: Arc<dyn WorldView>,
    blocks: Arc<BlockRegistry>,
    engine: Arc<dyn SpatialEngine>,
    registry: Arc<ChunkRegistry>,
    runtime: Runtime,
    next_job_id: AtomicU64,
    command_prefix: char,
    commands: Option<Arc<dyn CommandSink>>,
}

impl NavBridge {
    pub fn new(
        world: Arc<dyn WorldView>,
        blocks: Arc<BlockRegistry>,
        engine: Arc<dyn SpatialEngine>,
    ) -> Self {
        let runtime = Runtime::new(world.clone());
        Self::with_runtime(world, blocks, engine, runtime)
    }

    /// Wire in a runtime built elsewhere, e.g. one with a pinned worker count.
    pub fn with_runtime(
        world: Arc<dyn WorldView>,
        blocks: Arc<BlockRegistry>,
        engine: Arc<dyn SpatialEngine>,
        runtime: Runtime,
    ) -> Self {
        Self {
            world,
            blocks,
            engine,
            registry: Arc::new(ChunkRegistry::new()),
            runtime,
            next_job_id: AtomicU64::new(1),
            command_prefix: '!',
            commands: None,
        }
    }

    pub fn with_command_sink(mut self, prefix: char, sink: Arc<dyn CommandSink>) -> Self {
        self.command_prefix = prefix;
        self.commands = Some(sink);
        self
    }

    /// Chunks currently claimed (pending or tracked).
    pub fn tracked_chunks(&self) -> usize {
        self.registry.len()
    }

    /// (queued, inflight) encode jobs.
    pub fn encoder_counts(&self) -> (usize, usize) {
        self.runtime.queue_debug_counts()
    }

    /// Encode jobs fully processed since startup, current or stale.
    pub fn completed_encodes(&self) -> u64 {
        self.runtime.completed_jobs()
    }

    /// World runtime reports a chunk column loaded. First claimant wins; a
    /// coordinate already pending or tracked is left alone.
    pub fn on_chunk_load(&self, coord: ChunkCoord) {
        let Some(rev) = self.registry.claim(coord) else {
            log::trace!(
                target: "chunks",
                "load ({}, {}) ignored: already claimed",
                coord.cx,
                coord.cz
            );
            return;
        };
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            target: "chunks",
            "claimed ({}, {}) rev={rev} job={job_id}",
            coord.cx,
            coord.cz
        );
        self.runtime.submit_encode_job(EncodeJob {
            coord,
            rev,
            job_id,
            reg: self.blocks.clone(),
        });
    }

    /// World runtime reports a chunk column unloaded. Remove precedes
    /// release; an in-flight encode for this coordinate loses its stamp and
    /// is dropped at the next `pump`.
    pub fn on_chunk_unload(&self, coord: ChunkCoord) {
        self.engine.remove(coord.cx, coord.cz);
        self.registry.release(coord);
        log::debug!(target: "chunks", "released ({}, {})", coord.cx, coord.cz);
    }

    /// World runtime reports a single block changing to `new`. The world
    /// still holds the old state when this fires. Returns the "consumed"
    /// flag for the runtime's handler chain; this router only observes, so
    /// it always returns `false`.
    pub fn on_block_update(&self, wx: i32, wy: i32, wz: i32, new: Block) -> bool {
        let coord = ChunkCoord::containing(wx, wz);
        if !self.registry.contains(coord) {
            return false;
        }
        let Some(old) = self.world.block_at(wx, wy, wz) else {
            log::debug!(
                target: "chunks",
                "update at ({wx}, {wy}, {wz}) skipped: world unavailable"
            );
            return false;
        };
        let class = self.blocks.classify(new);
        if self.blocks.classify(old) != class {
            self.engine.set(wx, wy, wz, class);
        }
        false
    }

    /// Chat boundary: prefixed lines go to the command sink and are consumed,
    /// everything else passes through untouched.
    pub fn on_chat_message(&self, text: &str) -> bool {
        let Some(sink) = self.commands.as_ref() else {
            return false;
        };
        let Some(line) = strip_command(text, self.command_prefix) else {
            return false;
        };
        if let Err(err) = sink.dispatch(line) {
            log::warn!(target: "commands", "{err}");
        }
        true
    }

    /// Drain finished encodes and forward the still-current ones to the
    /// engine. A result whose coordinate was released (or reclaimed under a
    /// newer stamp) since submission is dropped. Returns the number of
    /// builds issued.
    pub fn pump(&self) -> usize {
        let mut built = 0usize;
        for out in self.runtime.drain_worker_results() {
            if self.registry.generation(out.coord) != Some(out.rev) {
                log::debug!(
                    target: "chunks",
                    "discarding stale encode for ({}, {}) rev={}",
                    out.coord.cx,
                    out.coord.cz,
                    out.rev
                );
                continue;
            }
            match out.grid {
                Some(grid) => {
                    self.engine.build(out.coord.cx, out.coord.cz, grid);
                    built += 1;
                    log::info!(
                        target: "chunks",
                        "built ({}, {}) in {} ms",
                        out.coord.cx,
                        out.coord.cz,
                        out.t_encode_ms
                    );
                }
                None => {
                    // Drop the claim so a later load event can retry.
                    self.registry.release(out.coord);
                    log::warn!(
                        target: "chunks",
                        "encode for ({}, {}) aborted: world unavailable",
                        out.coord.cx,
                        out.coord.cz
                    );
                }
            }
        }
        built
    }
}
