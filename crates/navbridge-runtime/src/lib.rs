//! Encode job queue, worker orchestration, and the tracked-chunk registry.
#![forbid(unsafe_code)]

mod registry;

pub use registry::{ChunkRegistry, Generation};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use navbridge_blocks::BlockRegistry;
use navbridge_grid::{VoxelGrid, encode_chunk};
use navbridge_world::{ChunkCoord, WorldView};
use rayon::ThreadPoolBuilder;

#[derive(Clone, Debug)]
pub struct EncodeJob {
    pub coord: ChunkCoord,
    pub rev: Generation,
    pub job_id: u64,
    pub reg: Arc<BlockRegistry>,
}

pub struct EncodeOut {
    pub coord: ChunkCoord,
    pub rev: Generation,
    pub job_id: u64,
    /// `None` records a world query failure partway through the pass.
    pub grid: Option<VoxelGrid>,
    pub t_encode_ms: u32,
}

fn process_encode_job(job: EncodeJob, world: &dyn WorldView, tx: &Sender<EncodeOut>) {
    let EncodeJob {
        coord,
        rev,
        job_id,
        reg,
    } = job;
    let t0 = Instant::now();
    let grid = encode_chunk(world, &reg, coord);
    let t_encode_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    let _ = tx.send(EncodeOut {
        coord,
        rev,
        job_id,
        grid,
        t_encode_ms,
    });
}

/// Background encode pool. Jobs go in over a channel, workers classify whole
/// chunk columns, results come back out; the event path never blocks here.
pub struct Runtime {
    job_tx: Sender<EncodeJob>,
    res_rx: Receiver<EncodeOut>,
    _pool: Arc<rayon::ThreadPool>,
    q_encode: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
    pub workers: usize,
}

impl Runtime {
    pub fn new(world: Arc<dyn WorldView>) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_workers(world, workers)
    }

    pub fn with_workers(world: Arc<dyn WorldView>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<EncodeJob>();
        let (res_tx, res_rx) = unbounded::<EncodeOut>();
        let q_encode = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("navbridge-encode-{i}"))
                .build()
                .expect("encode pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            let q_encode = q_encode.clone();
            let inflight = inflight.clone();
            let completed = completed.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q_encode.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_encode_job(job, world.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    completed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
        Self {
            job_tx,
            res_rx,
            _pool: pool,
            q_encode,
            inflight,
            completed,
            workers,
        }
    }

    pub fn submit_encode_job(&self, job: EncodeJob) {
        self.q_encode.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.q_encode.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn drain_worker_results(&self) -> Vec<EncodeOut> {
        self.res_rx.try_iter().collect()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.q_encode.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    /// Jobs fully processed since startup. The matching results are already
    /// in the output channel when this count ticks up.
    pub fn completed_jobs(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}
