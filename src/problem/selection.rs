//! Partner selection methods.
//!
//! The partner coordinator draws teammates through a [`SelectionMethod`],
//! one per subpopulation and role ("current" or "previous" generation).
//! The population a method reads is passed in explicitly as a
//! [`SelectionContext`], so there is no shared "current population" to swap
//! in and out while selecting from a snapshot.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Wiegand, Liles & De Jong (2001), "An Empirical Analysis of
//!   Collaboration Methods in Cooperative Coevolutionary Algorithms"

use crate::population::{best_first, Fitness, Individual};
use rand::{Rng, RngCore};

/// The individuals a selection method draws from, and where they came from.
#[derive(Debug)]
pub struct SelectionContext<'a, I> {
    /// Candidate individuals (a live subpopulation or a snapshot of one).
    pub individuals: &'a [I],
    /// Subpopulation the candidates belong to.
    pub subpop: usize,
    /// Generation the candidates belong to.
    pub generation: usize,
}

impl<I> Clone for SelectionContext<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for SelectionContext<'_, I> {}

/// Picks partner indices out of a [`SelectionContext`].
///
/// `prepare` is called once before a batch of `produce` calls over the same
/// context, and `finish` once after it.
pub trait SelectionMethod<I: Individual>: Send {
    /// Whether this method reads fitness.
    ///
    /// Methods used for current-generation partners must return `false`,
    /// since fitness in the live generation is not yet final.
    fn uses_fitness(&self) -> bool;

    /// Called before a batch of selections. The default is a no-op.
    fn prepare(&mut self, _ctx: &SelectionContext<'_, I>, _worker: usize) {}

    /// Returns the index of the selected individual in `ctx.individuals`.
    fn produce(
        &mut self,
        ctx: &SelectionContext<'_, I>,
        rng: &mut dyn RngCore,
        worker: usize,
    ) -> usize;

    /// Called after a batch of selections. The default is a no-op.
    fn finish(&mut self, _ctx: &SelectionContext<'_, I>, _worker: usize) {}
}

/// Built-in selection strategies.
///
/// All strategies treat a **higher** rank under [`Fitness::better_than`] as
/// better.
///
/// # Examples
///
/// ```
/// use u_coevo::problem::Selection;
///
/// // Uniform pick, safe for current-generation partners
/// let current = Selection::Random;
///
/// // Tournament with size 2 for previous-generation partners
/// let prev = Selection::Tournament(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Uniform random pick. Does not read fitness.
    #[default]
    Random,

    /// Tournament selection: pick `k` individuals at random, select the best.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Linear rank-based selection; the best individual gets weight `n`,
    /// the worst weight `1`.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Always the best individual (first one on ties).
    Best,
}

impl Selection {
    /// Select an index from `individuals`.
    ///
    /// # Panics
    /// Panics if `individuals` is empty.
    pub fn select<I: Individual, R: Rng + ?Sized>(&self, individuals: &[I], rng: &mut R) -> usize {
        assert!(
            !individuals.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Random => rng.random_range(0..individuals.len()),
            Selection::Tournament(k) => tournament(individuals, *k, rng),
            Selection::Rank => rank(individuals, rng),
            Selection::Best => best(individuals),
        }
    }
}

impl<I: Individual> SelectionMethod<I> for Selection {
    fn uses_fitness(&self) -> bool {
        !matches!(self, Selection::Random)
    }

    fn produce(
        &mut self,
        ctx: &SelectionContext<'_, I>,
        rng: &mut dyn RngCore,
        _worker: usize,
    ) -> usize {
        self.select(ctx.individuals, rng)
    }
}

/// Tournament selection: pick k random individuals, return best.
fn tournament<I: Individual, R: Rng + ?Sized>(individuals: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = individuals.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if individuals[idx]
            .fitness()
            .better_than(individuals[best_idx].fitness())
        {
            best_idx = idx;
        }
    }
    best_idx
}

/// Rank-based selection using linear ranking.
fn rank<I: Individual, R: Rng + ?Sized>(individuals: &[I], rng: &mut R) -> usize {
    let n = individuals.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| best_first(individuals[a].fitness(), individuals[b].fitness()));

    // weight of rank r (0 = best) is n - r
    let total = n * (n + 1) / 2;
    let threshold = rng.random_range(0..total);
    let mut cumulative = 0;
    for (r, &idx) in order.iter().enumerate() {
        cumulative += n - r;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}

/// Index of the best individual, first on ties.
fn best<I: Individual>(individuals: &[I]) -> usize {
    let mut best_idx = 0;
    for (idx, ind) in individuals.iter().enumerate().skip(1) {
        if ind.fitness().better_than(individuals[best_idx].fitness()) {
            best_idx = idx;
        }
    }
    best_idx
}
