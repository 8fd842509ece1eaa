//! Match scheduler pass execution.
//!
//! [`MatchScheduler`] runs one scheduling pass per generation over every
//! subpopulation: shuffle and partition every subpopulation, preprocess,
//! then dispatch and collect each one. Parallel styles
//! are split into immutable [`WorkerTask`] descriptors and joined on a
//! private rayon pool; single-elimination always runs on the calling thread.

use super::arena::MatchArena;
use super::config::{TournamentConfig, TournamentStyle};
use super::quota::OpponentQuota;
use super::styles;
use crate::error::{CoevoError, Result};
use crate::population::{partition, Chunk, Population};
use crate::problem::GroupedProblem;
use crate::random::{create_rng, rng_from_config, worker_seeds, CoevoRng};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Individuals whose fitness the problem finalized.
    pub assessed: usize,
    /// Matches submitted to the problem.
    pub matches: usize,
}

/// One worker's share of a pass.
#[derive(Debug, Clone, Copy)]
struct WorkerTask {
    worker: usize,
    rows: Chunk,
    seed: u64,
}

/// Single-population tournament engine.
///
/// # Usage
///
/// ```ignore
/// let config = TournamentConfig::new(TournamentStyle::RoundRobin)
///     .with_workers(4)
///     .with_seed(42);
/// let mut scheduler = MatchScheduler::new(config)?;
/// let report = scheduler.evaluate_population(&mut population, &mut problem)?;
/// println!("{} matches, {} assessed", report.matches, report.assessed);
/// ```
pub struct MatchScheduler {
    config: TournamentConfig,
    rng: CoevoRng,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for MatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScheduler")
            .field("config", &self.config)
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

impl MatchScheduler {
    /// Validates `config` and builds the worker pool it needs.
    pub fn new(config: TournamentConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.workers > 1 && config.style.is_parallel() {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("coevo-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            rng: rng_from_config(config.seed),
            config,
            pool,
        })
    }

    /// The configuration this scheduler was built with.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Runs one scheduling pass over every subpopulation.
    ///
    /// Every subpopulation is shuffled in place and partitioned before the
    /// problem is preprocessed, so `preprocess` sees the order that is
    /// scheduled. Each subpopulation is then paired according to the
    /// configured style, and the problem is postprocessed once at the end.
    /// Both hooks receive every subpopulation flagged.
    ///
    /// A failed worker aborts the pass. The subpopulation it was working on
    /// is still restored into `population`, but fitness values are partial.
    pub fn evaluate_population<P: GroupedProblem>(
        &mut self,
        population: &mut Population<P::Individual>,
        problem: &mut P,
    ) -> Result<EvaluationReport> {
        if population.subpops.is_empty() {
            return Err(CoevoError::NoSubpopulations);
        }
        if let Some(group_size) = self.config.style.group_size() {
            for (subpop, size) in population.sizes().into_iter().enumerate() {
                if group_size >= size {
                    return Err(CoevoError::GroupSizeTooLarge {
                        group_size,
                        subpop,
                        size,
                    });
                }
            }
        }

        let count_victories_only = self.config.style.counts_victories_only();
        let assess = vec![true; population.num_subpops()];

        let workers = if self.config.style.is_parallel() {
            self.config.workers
        } else {
            1
        };
        let chunks: Vec<Vec<Chunk>> = population
            .subpops
            .iter_mut()
            .map(|subpop| {
                subpop.individuals.shuffle(&mut self.rng);
                partition(subpop.len(), workers)
            })
            .collect();

        problem.preprocess(population, &assess, count_victories_only);

        let mut matches = 0;
        for (subpop, chunks) in chunks.into_iter().enumerate() {
            matches += self.evaluate_subpopulation(population, subpop, chunks, problem)?;
        }

        let assessed = problem.postprocess(population, &assess, count_victories_only);

        info!(
            style = %self.config.style,
            subpops = population.num_subpops(),
            matches,
            assessed,
            "tournament pass complete"
        );

        Ok(EvaluationReport { assessed, matches })
    }

    /// Schedules one subpopulation that has already been shuffled and split
    /// into `chunks`.
    fn evaluate_subpopulation<P: GroupedProblem>(
        &mut self,
        population: &mut Population<P::Individual>,
        subpop: usize,
        chunks: Vec<Chunk>,
        problem: &P,
    ) -> Result<usize> {
        let individuals = &mut population.subpops[subpop].individuals;
        let n = individuals.len();
        let workers = chunks.len();

        let matches = match self.config.style {
            TournamentStyle::SingleElimination => {
                let rng = &mut self.rng;
                panic::catch_unwind(AssertUnwindSafe(|| {
                    styles::single_elimination(individuals, problem, subpop, rng)
                }))
                .map_err(|payload| worker_failed(0, payload.as_ref()))?
            }
            style => {
                let seeds = worker_seeds(&mut self.rng, chunks.len());
                let tasks: Vec<WorkerTask> = chunks
                    .into_iter()
                    .zip(seeds)
                    .enumerate()
                    .map(|(worker, (rows, seed))| WorkerTask { worker, rows, seed })
                    .collect();
                self.dispatch(individuals, problem, subpop, style, &tasks)?
            }
        };

        debug!(subpop, size = n, workers, matches, "subpopulation scheduled");
        Ok(matches)
    }

    /// Runs `tasks` over a locked view of `individuals`, then restores them.
    fn dispatch<P: GroupedProblem>(
        &self,
        individuals: &mut Vec<P::Individual>,
        problem: &P,
        subpop: usize,
        style: TournamentStyle,
        tasks: &[WorkerTask],
    ) -> Result<usize> {
        let cells: Vec<Mutex<P::Individual>> =
            std::mem::take(individuals).into_iter().map(Mutex::new).collect();
        let quota = match style {
            TournamentStyle::RandomTwoWay { group_size, .. } => {
                Some(OpponentQuota::new(cells.len(), group_size))
            }
            _ => None,
        };

        let arena = MatchArena::new(&cells, problem, subpop, false);
        let run = |task: &WorkerTask| run_task(&arena, style, quota.as_ref(), task);
        let outcome: Result<Vec<()>> = match &self.pool {
            Some(pool) => pool.install(|| tasks.par_iter().map(run).collect()),
            None => tasks.iter().map(run).collect(),
        };
        let matches = arena.into_matches();

        *individuals = cells
            .into_iter()
            .map(|cell| cell.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect();

        outcome.map(|_| matches)
    }
}

/// Runs one worker's rows, turning a panic into [`CoevoError::WorkerFailed`].
fn run_task<P: GroupedProblem>(
    arena: &MatchArena<'_, P>,
    style: TournamentStyle,
    quota: Option<&OpponentQuota>,
    task: &WorkerTask,
) -> Result<()> {
    let mut rng = create_rng(task.seed);
    let worker = task.worker;

    let result = panic::catch_unwind(AssertUnwindSafe(|| match (style, quota) {
        (TournamentStyle::RoundRobin, _) => styles::round_robin(arena, task.rows, worker),
        (TournamentStyle::RandomOneWay { group_size }, _) => {
            styles::random_one_way(arena, task.rows, group_size, &mut rng, worker)
        }
        (
            TournamentStyle::RandomTwoWay {
                allow_over_evaluation,
                ..
            },
            Some(quota),
        ) => styles::random_two_way(
            arena,
            task.rows,
            quota,
            allow_over_evaluation,
            &mut rng,
            worker,
        ),
        (style, _) => unreachable!("{style} is not dispatched to workers"),
    }));

    result.unwrap_or_else(|payload| Err(worker_failed(worker, payload.as_ref())))
}

fn worker_failed(worker: usize, payload: &(dyn Any + Send)) -> CoevoError {
    let reason = panic_message(payload);
    warn!(worker, %reason, "worker failed");
    CoevoError::WorkerFailed { worker, reason }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
