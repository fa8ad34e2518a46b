//! Parallel Monte Carlo search.
//!
//! The rollout budget is split into one job per worker. Jobs go through a
//! bounded queue to a fixed pool of threads; each thread owns one
//! [`Simulator`] (and therefore its two state buffers) for its whole lifetime.
//! Every job produces exactly one result on a bounded result channel.
//!
//! The template is only ever borrowed immutably, so workers share it without
//! locks. Results are reduced in job order once all of them have arrived,
//! which makes the outcome independent of which worker finishes first.

use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, info, warn};

use crate::coord::Move;
use crate::game::GameState;
use crate::playout::{Rollout, Simulator};

/// Search parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Total number of playouts across all workers.
    pub iterations: usize,
    /// Number of worker threads.
    pub workers: usize,
    /// Seed of job 0; job `i` uses `base_seed + i`.
    pub base_seed: u64,
}

impl SearchConfig {
    /// One worker per hardware thread, seeded from the wall clock.
    pub fn new(iterations: usize) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let base_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            iterations,
            workers,
            base_seed,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Seed for dealing a random puzzle. It sits just below job 0's seed, so
    /// the deal never replays a worker's RNG stream.
    pub fn deal_seed(&self) -> u64 {
        self.base_seed.wrapping_sub(1)
    }
}

/// A unit of work for one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub index: usize,
    pub rollouts: usize,
    pub seed: u64,
}

/// Best playout found by one job.
#[derive(Clone, Debug)]
struct JobResult {
    index: usize,
    best: Option<Rollout>,
}

/// Final outcome of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub score: u32,
    pub moves: Vec<Move>,
    /// Number of playouts actually run.
    pub rollouts: usize,
}

/// Split `config.iterations` across `config.workers`.
///
/// Every worker gets `iterations / workers`; the last one also takes the
/// remainder. Jobs with no rollouts are dropped.
pub fn plan_jobs(config: &SearchConfig) -> Vec<Job> {
    let workers = config.workers.max(1);
    let per_worker = config.iterations / workers;
    let remainder = config.iterations % workers;

    (0..workers)
        .map(|index| Job {
            index,
            rollouts: per_worker + if index == workers - 1 { remainder } else { 0 },
            seed: config.base_seed.wrapping_add(index as u64),
        })
        .filter(|job| job.rollouts > 0)
        .collect()
}

/// Run the search and return the best move sequence found.
///
/// With a zero budget no playout runs and the result is the template's own
/// score with an empty move list.
pub fn search(template: &GameState, config: &SearchConfig) -> SearchResult {
    let jobs = plan_jobs(config);
    let workers = config.workers.max(1);
    info!(
        "Running {} playouts on {} workers ({} jobs)",
        config.iterations,
        workers,
        jobs.len()
    );

    let mut results: Vec<JobResult> = Vec::with_capacity(jobs.len());

    thread::scope(|s| {
        let (job_tx, job_rx) = bounded::<Job>(workers);
        let (result_tx, result_rx) = bounded::<JobResult>(workers);

        for id in 0..workers {
            let queue = job_rx.clone();
            let sink = result_tx.clone();
            s.spawn(move || worker(id, template, queue, sink));
        }
        drop(job_rx);
        drop(result_tx);

        for job in &jobs {
            debug!(
                "Dispatching job {} ({} playouts, seed {})",
                job.index, job.rollouts, job.seed
            );
            if job_tx.send(*job).is_err() {
                warn!("All workers exited before job {} was dispatched", job.index);
                break;
            }
        }
        drop(job_tx);

        for _ in 0..jobs.len() {
            match result_rx.recv() {
                Ok(result) => results.push(result),
                Err(_) => {
                    warn!(
                        "Result channel closed with {} of {} results",
                        results.len(),
                        jobs.len()
                    );
                    break;
                }
            }
        }
    });

    let rollouts = results
        .iter()
        .filter_map(|r| jobs.iter().find(|j| j.index == r.index))
        .map(|j| j.rollouts)
        .sum();
    let best = reduce(results);

    let result = match best {
        Some(best) => SearchResult {
            score: best.score,
            moves: best.moves,
            rollouts,
        },
        None => SearchResult {
            score: template.score(),
            moves: Vec::new(),
            rollouts,
        },
    };
    info!(
        "Search complete: best score {} in {} moves",
        result.score,
        result.moves.len()
    );
    result
}

/// Merge job results in job order; a later result wins only with a strictly higher score.
fn reduce(mut results: Vec<JobResult>) -> Option<Rollout> {
    results.sort_by_key(|r| r.index);
    let mut best: Option<Rollout> = None;
    for candidate in results.into_iter().filter_map(|r| r.best) {
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

/// Worker loop: run every job received and report one result per job.
fn worker(id: usize, template: &GameState, jobs: Receiver<Job>, results: Sender<JobResult>) {
    let mut sim = Simulator::new(template, 0);

    while let Ok(job) = jobs.recv() {
        sim.reseed(job.seed);
        let best = sim.best_of(template, job.rollouts);
        debug!(
            "Worker {id}: job {} done, best score {}",
            job.index,
            best.as_ref().map_or(0, |b| b.score)
        );
        if results
            .send(JobResult {
                index: job.index,
                best,
            })
            .is_err()
        {
            break;
        }
    }
}
