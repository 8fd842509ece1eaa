//! Core trait definitions for scheduled individuals.
//!
//! [`Fitness`] and [`Individual`] are the contract between the scheduling
//! engines and the domain types they move around. The engines never compute
//! fitness themselves; they only compare it, copy individuals, and hand them
//! to a [`GroupedProblem`](crate::problem::GroupedProblem).

use std::cmp::Ordering;

/// An opaque, comparable score.
///
/// The engines only ask two questions of a fitness value: is it strictly
/// better than another, and is it tied with another. How trials accumulate
/// into the value (including the victory-only mode used by single-elimination
/// brackets) is decided by the problem.
///
/// Built-in implementations exist for `f64`, `f32` and `u32`, where a
/// **higher** value is better (scores and victory counts).
pub trait Fitness: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Returns `true` if `self` is strictly better than `other`.
    fn better_than(&self, other: &Self) -> bool;

    /// Returns `true` if neither value is better than the other.
    fn equivalent_to(&self, other: &Self) -> bool {
        !self.better_than(other) && !other.better_than(self)
    }
}

impl Fitness for f64 {
    fn better_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl Fitness for f32 {
    fn better_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl Fitness for u32 {
    fn better_than(&self, other: &Self) -> bool {
        self > other
    }
}

/// Orders two fitness values best-first, for use with `sort_by`.
pub fn best_first<F: Fitness>(a: &F, b: &F) -> Ordering {
    if a.better_than(b) {
        Ordering::Less
    } else if b.better_than(a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// A candidate solution held in a subpopulation.
///
/// Individuals carry their own fitness and an `evaluated` flag. Matches
/// mutate fitness in place through [`fitness_mut`](Individual::fitness_mut);
/// the problem's postprocess step sets the flag once fitness is final.
///
/// `Clone` must produce a deep, independent copy: snapshots and elite sets
/// rely on later mutation of the original leaving the copy untouched.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Player {
///     weights: Vec<f64>,
///     score: f64,
///     evaluated: bool,
/// }
///
/// impl Individual for Player {
///     type Fitness = f64;
///     fn fitness(&self) -> &f64 { &self.score }
///     fn fitness_mut(&mut self) -> &mut f64 { &mut self.score }
///     fn is_evaluated(&self) -> bool { self.evaluated }
///     fn set_evaluated(&mut self, evaluated: bool) { self.evaluated = evaluated; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this individual.
    fn fitness(&self) -> &Self::Fitness;

    /// Returns the fitness for in-place accumulation by a match.
    fn fitness_mut(&mut self) -> &mut Self::Fitness;

    /// Whether this individual's fitness has been finalized.
    fn is_evaluated(&self) -> bool;

    /// Marks the fitness as finalized (or not).
    fn set_evaluated(&mut self, evaluated: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_fitness_higher_is_better() {
        assert!(3.0f64.better_than(&2.0));
        assert!(!2.0f64.better_than(&3.0));
        assert!(2.0f64.equivalent_to(&2.0));
        assert!(1.5f32.better_than(&1.0));
    }

    #[test]
    fn test_nan_is_never_better() {
        assert!(!f64::NAN.better_than(&1.0));
        assert!(!1.0f64.better_than(&f64::NAN));
        assert!(f64::NAN.equivalent_to(&1.0));
    }

    #[test]
    fn test_best_first_sorts_descending() {
        let mut values = vec![2u32, 7, 1, 7, 4];
        values.sort_by(best_first);
        assert_eq!(values, vec![7, 7, 4, 2, 1]);
    }
}
