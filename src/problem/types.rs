//! External contracts: the grouped problem and the breeder query.
//!
//! The engines decide who plays whom; the types implementing these traits
//! decide what a match means and which subpopulations are due for assessment.

use crate::population::{Individual, Population};

/// A problem that scores individuals in groups (matches or teams).
///
/// The scheduling engines call [`preprocess`](GroupedProblem::preprocess)
/// once before a pass, [`evaluate`](GroupedProblem::evaluate) once per match,
/// and [`postprocess`](GroupedProblem::postprocess) once after it.
///
/// # Update flags
///
/// `evaluate` receives one `update` flag per group slot. A problem must only
/// change the fitness of slots whose flag is `true`; the other members are
/// present as reference partners (elites, previous-generation members, or
/// opponents that have already met their quota).
///
/// # Thread Safety
///
/// `GroupedProblem` must be `Send + Sync` because the match scheduler calls
/// `evaluate` from several workers at once. Each call owns exclusive access
/// to the individuals in its group for its duration.
pub trait GroupedProblem: Send + Sync {
    /// The individual type scored by this problem.
    type Individual: Individual;

    /// Prepares the flagged subpopulations for a new round of trials.
    ///
    /// `count_victories_only` is set for single-elimination brackets, where
    /// only wins count and score magnitudes must be ignored.
    ///
    /// The default implementation is a no-op.
    fn preprocess(
        &mut self,
        _population: &mut Population<Self::Individual>,
        _assess: &[bool],
        _count_victories_only: bool,
    ) {
    }

    /// Plays one match between the members of `group`.
    ///
    /// `group`, `update` and `subpops` all have the group's arity. `subpops[k]`
    /// names the subpopulation slot `k` was drawn from and `worker` is the
    /// index of the calling worker.
    fn evaluate(
        &self,
        group: &mut [&mut Self::Individual],
        update: &[bool],
        count_victories_only: bool,
        subpops: &[usize],
        worker: usize,
    );

    /// Finalizes fitness for the flagged subpopulations.
    ///
    /// Returns the number of individuals whose fitness was finalized. The
    /// default implementation marks every individual of each flagged
    /// subpopulation as evaluated and counts them.
    fn postprocess(
        &mut self,
        population: &mut Population<Self::Individual>,
        assess: &[bool],
        _count_victories_only: bool,
    ) -> usize {
        let mut finalized = 0;
        for (subpop, &flag) in population.subpops.iter_mut().zip(assess) {
            if !flag {
                continue;
            }
            for ind in subpop.individuals.iter_mut() {
                ind.set_evaluated(true);
                finalized += 1;
            }
        }
        finalized
    }
}

/// Generation-level facts passed to the breeder query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationState {
    /// Current generation number, starting at 0.
    pub generation: usize,
    /// Number of subpopulations in the run.
    pub num_subpops: usize,
}

/// Tells the coordinator which subpopulations are assessed this generation.
pub trait Breeder {
    /// Returns `true` if `subpop` should be assessed in this generation.
    fn should_assess(&self, state: &GenerationState, subpop: usize, worker: usize) -> bool;
}

/// Built-in assessment schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreedingSchedule {
    /// Every subpopulation is assessed every generation.
    #[default]
    All,
    /// Exactly one subpopulation per generation: `generation mod S`.
    Sequential,
}

impl Breeder for BreedingSchedule {
    fn should_assess(&self, state: &GenerationState, subpop: usize, _worker: usize) -> bool {
        match self {
            BreedingSchedule::All => true,
            BreedingSchedule::Sequential => {
                state.num_subpops > 0 && state.generation % state.num_subpops == subpop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Ind {
        done: bool,
    }

    impl Individual for Ind {
        type Fitness = u32;
        fn fitness(&self) -> &u32 {
            &0
        }
        fn fitness_mut(&mut self) -> &mut u32 {
            unreachable!("not used by these tests")
        }
        fn is_evaluated(&self) -> bool {
            self.done
        }
        fn set_evaluated(&mut self, evaluated: bool) {
            self.done = evaluated;
        }
    }

    struct Noop;

    impl GroupedProblem for Noop {
        type Individual = Ind;
        fn evaluate(&self, _: &mut [&mut Ind], _: &[bool], _: bool, _: &[usize], _: usize) {}
    }

    #[test]
    fn test_default_postprocess_finalizes_flagged_subpops() {
        let mut pop = Population::from_vecs(vec![
            vec![Ind { done: false }, Ind { done: false }],
            vec![Ind { done: false }],
        ]);
        let finalized = Noop.postprocess(&mut pop, &[true, false], false);
        assert_eq!(finalized, 2);
        assert_eq!(pop.subpops[0].evaluated_count(), 2);
        assert_eq!(pop.subpops[1].evaluated_count(), 0);
    }

    #[test]
    fn test_sequential_schedule_rotates() {
        let schedule = BreedingSchedule::Sequential;
        for generation in 0..6 {
            let state = GenerationState {
                generation,
                num_subpops: 3,
            };
            let assessed: Vec<usize> = (0..3)
                .filter(|&s| schedule.should_assess(&state, s, 0))
                .collect();
            assert_eq!(assessed, vec![generation % 3]);
        }
    }

    #[test]
    fn test_all_schedule_assesses_everything() {
        let state = GenerationState {
            generation: 5,
            num_subpops: 2,
        };
        assert!(BreedingSchedule::All.should_assess(&state, 0, 0));
        assert!(BreedingSchedule::All.should_assess(&state, 1, 0));
    }
}
