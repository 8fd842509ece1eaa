//! Previous-generation snapshot.
//!
//! A [`GenerationSnapshot`] is a deep copy of the whole population taken at a
//! generation boundary. It is read-only from the outside and is replaced, not
//! mutated, when the next generation completes.

use super::containers::Population;
use super::types::Individual;

/// Deep copy of a population, frozen at the end of a generation.
#[derive(Debug, Clone)]
pub struct GenerationSnapshot<I> {
    generation: usize,
    population: Population<I>,
}

impl<I: Individual> GenerationSnapshot<I> {
    /// Captures an independent copy of `population` as of `generation`.
    pub fn capture(population: &Population<I>, generation: usize) -> Self {
        Self {
            generation,
            population: population.clone(),
        }
    }

    /// The generation this snapshot was taken at.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of subpopulations captured.
    pub fn num_subpops(&self) -> usize {
        self.population.num_subpops()
    }

    /// The captured individuals of one subpopulation.
    ///
    /// # Panics
    /// Panics if `subpop` is out of range.
    pub fn subpopulation(&self, subpop: usize) -> &[I] {
        &self.population.subpops[subpop].individuals
    }

    /// One captured individual.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn individual(&self, subpop: usize, index: usize) -> &I {
        &self.population.subpops[subpop].individuals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Ind {
        fit: f64,
        history: Vec<f64>,
    }

    impl Individual for Ind {
        type Fitness = f64;
        fn fitness(&self) -> &f64 {
            &self.fit
        }
        fn fitness_mut(&mut self) -> &mut f64 {
            &mut self.fit
        }
        fn is_evaluated(&self) -> bool {
            true
        }
        fn set_evaluated(&mut self, _evaluated: bool) {}
    }

    #[test]
    fn test_snapshot_is_independent_of_live_population() {
        let mut live = Population::from_vecs(vec![
            vec![
                Ind { fit: 1.0, history: vec![1.0] },
                Ind { fit: 2.0, history: vec![2.0] },
            ],
            vec![Ind { fit: 5.0, history: vec![] }],
        ]);
        let snapshot = GenerationSnapshot::capture(&live, 3);

        *live.subpops[0].individuals[1].fitness_mut() = 99.0;
        live.subpops[0].individuals[1].history.push(99.0);
        live.subpops[1].individuals.clear();

        assert_eq!(snapshot.generation(), 3);
        assert_eq!(*snapshot.individual(0, 1).fitness(), 2.0);
        assert_eq!(snapshot.individual(0, 1).history, vec![2.0]);
        assert_eq!(snapshot.subpopulation(1).len(), 1);
        assert_eq!(snapshot.num_subpops(), 2);
    }
}
