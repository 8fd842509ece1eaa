//! Partner coordinator generation loop.

use super::config::PartnerConfig;
use super::elite::EliteSet;
use crate::error::Result;
use crate::population::{GenerationSnapshot, Individual, Population};
use crate::problem::{Breeder, GenerationState, GroupedProblem, SelectionContext, SelectionMethod};
use crate::random::{rng_from_config, CoevoRng};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::iter;
use tracing::{debug, info};

/// Outcome of one coordinated generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoevolutionReport {
    /// Generation that was evaluated.
    pub generation: usize,
    /// Individuals whose fitness the problem finalized this generation.
    pub assessed: usize,
    /// Running total of `assessed` across every generation so far.
    pub total_assessed: usize,
    /// Teams submitted to the problem.
    pub teams: usize,
    /// Subpopulations the breeder scheduled for assessment.
    pub assessed_subpops: Vec<usize>,
}

/// Where a team's partners come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    /// Round `k` of the per-generation permutations.
    Shuffled(usize),
    /// Entry `e` of each other subpopulation's elite set.
    Guru(usize),
    Current,
    Previous,
}

impl Pool {
    /// Whether partners drawn from this pool may have their fitness changed.
    fn updates_partner(self) -> bool {
        matches!(self, Pool::Shuffled(_) | Pool::Current)
    }
}

/// One slot of a team: a live individual or a scratch copy.
enum Partner<I> {
    Live(usize),
    Detached(I),
}

#[derive(Clone, Copy)]
enum Phase {
    Prepare,
    Finish,
}

impl Phase {
    fn apply<I, M>(self, method: &mut M, ctx: &SelectionContext<'_, I>)
    where
        I: Individual,
        M: SelectionMethod<I> + ?Sized,
    {
        match self {
            Phase::Prepare => method.prepare(ctx, 0),
            Phase::Finish => method.finish(ctx, 0),
        }
    }
}

/// Multi-population partner coordinator.
///
/// Builds one team of arity `S` per focal individual and partner draw, one
/// slot per subpopulation, and submits each to the problem. Owns the
/// per-subpopulation [`EliteSet`]s and the previous-generation
/// [`GenerationSnapshot`], both replaced only between generations.
///
/// The coordinator is single-threaded; every `evaluate` call receives worker
/// index 0.
///
/// # Examples
///
/// ```ignore
/// let config = PartnerConfig::new()
///     .with_num_gurus(1)
///     .with_num_current(2)
///     .with_selection(2, Selection::Random, Selection::Random)
///     .with_seed(42);
/// let mut coordinator = PartnerCoordinator::new(config, &population)?;
/// for generation in 0..50 {
///     let report = coordinator.evaluate_population(
///         generation,
///         &mut population,
///         &mut problem,
///         &BreedingSchedule::All,
///     )?;
///     breed(&mut population);
/// }
/// ```
pub struct PartnerCoordinator<I: Individual> {
    config: PartnerConfig<I>,
    rng: CoevoRng,
    elites: Vec<EliteSet<I>>,
    snapshot: Option<GenerationSnapshot<I>>,
    total_assessed: usize,
}

impl<I: Individual> fmt::Debug for PartnerCoordinator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerCoordinator")
            .field("config", &self.config)
            .field("elite_sets", &self.elites.len())
            .field(
                "snapshot_generation",
                &self.snapshot.as_ref().map(|s| s.generation()),
            )
            .field("total_assessed", &self.total_assessed)
            .finish()
    }
}

impl<I: Individual> PartnerCoordinator<I> {
    /// Validates `config` against `population` and seeds the elite sets.
    pub fn new(config: PartnerConfig<I>, population: &Population<I>) -> Result<Self> {
        config.validate(&population.sizes())?;
        let rng = rng_from_config(config.seed);
        let elites = seed_elites(population, config.num_gurus);
        Ok(Self {
            config,
            rng,
            elites,
            snapshot: None,
            total_assessed: 0,
        })
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &PartnerConfig<I> {
        &self.config
    }

    /// Elite set of `subpop`, if it exists.
    pub fn elites(&self, subpop: usize) -> Option<&EliteSet<I>> {
        self.elites.get(subpop)
    }

    /// The previous-generation snapshot, once one has been captured.
    pub fn snapshot(&self) -> Option<&GenerationSnapshot<I>> {
        self.snapshot.as_ref()
    }

    /// Individuals finalized across every generation so far.
    pub fn total_assessed(&self) -> usize {
        self.total_assessed
    }

    /// Runs one generation of team evaluation.
    ///
    /// The breeder decides which subpopulations are assessed. Configuration
    /// errors are reported before `preprocess` is called.
    pub fn evaluate_population<P, B>(
        &mut self,
        generation: usize,
        population: &mut Population<I>,
        problem: &mut P,
        breeder: &B,
    ) -> Result<CoevolutionReport>
    where
        P: GroupedProblem<Individual = I>,
        B: Breeder + ?Sized,
    {
        let sizes = population.sizes();
        self.config.validate(&sizes)?;
        let num_subpops = sizes.len();

        if generation == 0 || self.elites.len() != num_subpops {
            self.elites = seed_elites(population, self.config.num_gurus);
        }

        let state = GenerationState {
            generation,
            num_subpops,
        };
        let assess: Vec<bool> = (0..num_subpops)
            .map(|subpop| breeder.should_assess(&state, subpop, 0))
            .collect();
        let prepare: Vec<bool> = assess.iter().map(|&a| a || generation == 0).collect();
        problem.preprocess(population, &prepare, false);

        let assessed_subpops: Vec<usize> = (0..num_subpops).filter(|&i| assess[i]).collect();
        let shuffles = if self.config.num_shuffled > 0 && !assessed_subpops.is_empty() {
            self.shuffle_rounds(&sizes)
        } else {
            Vec::new()
        };

        let mut teams = 0;
        for &subpop in &assessed_subpops {
            let played = self.assess_subpopulation(subpop, generation, population, &*problem, &shuffles);
            debug!(generation, subpop, teams = played, "subpopulation assessed");
            teams += played;
        }

        let assessed = problem.postprocess(population, &assess, false);
        self.total_assessed += assessed;

        for &subpop in &assessed_subpops {
            self.elites[subpop] =
                EliteSet::refresh(&population.subpops[subpop].individuals, self.config.num_gurus);
            debug!(generation, subpop, elites = self.elites[subpop].len(), "elite set refreshed");
        }
        if self.config.num_prev > 0 {
            self.snapshot = Some(GenerationSnapshot::capture(population, generation));
            debug!(generation, "snapshot captured");
        }

        info!(
            generation,
            assessed,
            teams,
            subpops = assessed_subpops.len(),
            "coevolution generation complete"
        );
        Ok(CoevolutionReport {
            generation,
            assessed,
            total_assessed: self.total_assessed,
            teams,
            assessed_subpops,
        })
    }

    /// One permutation per subpopulation for each shuffled round.
    fn shuffle_rounds(&mut self, sizes: &[usize]) -> Vec<Vec<Vec<usize>>> {
        (0..self.config.num_shuffled)
            .map(|_| {
                sizes
                    .iter()
                    .map(|&n| {
                        let mut order: Vec<usize> = (0..n).collect();
                        order.shuffle(&mut self.rng);
                        order
                    })
                    .collect()
            })
            .collect()
    }

    fn assess_subpopulation<P>(
        &mut self,
        focal: usize,
        generation: usize,
        population: &mut Population<I>,
        problem: &P,
        shuffles: &[Vec<Vec<usize>>],
    ) -> usize
    where
        P: GroupedProblem<Individual = I>,
    {
        let subpops: Vec<usize> = (0..population.num_subpops()).collect();
        let num_shuffled = self.config.num_shuffled;
        let num_gurus = self.config.num_gurus;
        let num_current = self.config.num_current;
        let num_prev = self.config.num_prev;

        self.run_selectors(Phase::Prepare, focal, generation, population);
        let mut teams = 0;
        for x in 0..population.subpops[focal].len() {
            let pools = (0..num_shuffled)
                .map(Pool::Shuffled)
                .chain((0..num_gurus).map(Pool::Guru))
                .chain(iter::repeat(Pool::Current).take(num_current))
                .chain(iter::repeat(Pool::Previous).take(num_prev));
            for pool in pools {
                let (mut partners, update) =
                    self.draw_team(pool, focal, x, generation, population, shuffles);
                play_team(population, problem, &mut partners, &update, &subpops);
                teams += 1;
            }
        }
        self.run_selectors(Phase::Finish, focal, generation, population);
        teams
    }

    /// Brackets a focal subpopulation's draws with `prepare` / `finish` on
    /// every other subpopulation's selection methods.
    fn run_selectors(
        &mut self,
        phase: Phase,
        focal: usize,
        generation: usize,
        population: &Population<I>,
    ) {
        for j in (0..population.num_subpops()).filter(|&j| j != focal) {
            if self.config.num_current > 0 {
                let ctx = SelectionContext {
                    individuals: &population.subpops[j].individuals,
                    subpop: j,
                    generation,
                };
                phase.apply(&mut *self.config.select_current[j], &ctx);
            }
            if self.config.num_prev > 0 {
                if let Some(snapshot) = self.snapshot.as_ref().filter(|_| generation > 0) {
                    let ctx = SelectionContext {
                        individuals: snapshot.subpopulation(j),
                        subpop: j,
                        generation: snapshot.generation(),
                    };
                    phase.apply(&mut *self.config.select_prev[j], &ctx);
                }
            }
        }
    }

    /// Picks one partner per other subpopulation. The focal slot is always
    /// live and always updated.
    fn draw_team(
        &mut self,
        pool: Pool,
        focal: usize,
        x: usize,
        generation: usize,
        population: &Population<I>,
        shuffles: &[Vec<Vec<usize>>],
    ) -> (Vec<Partner<I>>, Vec<bool>) {
        let num_subpops = population.num_subpops();
        let mut partners = Vec::with_capacity(num_subpops);
        let mut update = Vec::with_capacity(num_subpops);

        for j in 0..num_subpops {
            if j == focal {
                partners.push(Partner::Live(x));
                update.push(true);
                continue;
            }
            let partner = match pool {
                Pool::Shuffled(k) => Partner::Live(shuffles[k][j][x]),
                Pool::Guru(e) => Partner::Detached(self.elites[j].as_slice()[e].clone()),
                Pool::Current => {
                    let ctx = SelectionContext {
                        individuals: &population.subpops[j].individuals,
                        subpop: j,
                        generation,
                    };
                    Partner::Live(self.config.select_current[j].produce(&ctx, &mut self.rng, 0))
                }
                Pool::Previous => match self.snapshot.as_ref().filter(|_| generation > 0) {
                    Some(snapshot) => {
                        let ctx = SelectionContext {
                            individuals: snapshot.subpopulation(j),
                            subpop: j,
                            generation: snapshot.generation(),
                        };
                        let idx = self.config.select_prev[j].produce(&ctx, &mut self.rng, 0);
                        Partner::Detached(snapshot.individual(j, idx).clone())
                    }
                    // No previous generation yet.
                    None => Partner::Live(self.rng.random_range(0..population.subpops[j].len())),
                },
            };
            partners.push(partner);
            update.push(pool.updates_partner());
        }
        (partners, update)
    }
}

fn seed_elites<I: Individual>(population: &Population<I>, k: usize) -> Vec<EliteSet<I>> {
    population
        .subpops
        .iter()
        .map(|subpop| EliteSet::seed(&subpop.individuals, k))
        .collect()
}

/// Borrows one individual per subpopulation and submits the team.
fn play_team<P: GroupedProblem>(
    population: &mut Population<P::Individual>,
    problem: &P,
    partners: &mut [Partner<P::Individual>],
    update: &[bool],
    subpops: &[usize],
) {
    let mut group: Vec<&mut P::Individual> = population
        .subpops
        .iter_mut()
        .zip(partners.iter_mut())
        .map(|(subpop, partner)| match partner {
            Partner::Live(idx) => &mut subpop.individuals[*idx],
            Partner::Detached(copy) => copy,
        })
        .collect();
    problem.evaluate(&mut group, update, false, subpops, 0);
}
