//! Subpopulation and population containers.

use super::types::Individual;

/// An ordered, mutable sequence of individuals.
///
/// Order carries no meaning between generations, but scheduling passes read
/// it positionally (the round-robin `y > x` rule, bracket slots).
#[derive(Debug, Clone, PartialEq)]
pub struct Subpopulation<I> {
    /// The individuals, in scheduling order.
    pub individuals: Vec<I>,
}

impl<I: Individual> Subpopulation<I> {
    /// Wraps a vector of individuals.
    pub fn new(individuals: Vec<I>) -> Self {
        Self { individuals }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the subpopulation holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Number of individuals whose fitness is final.
    pub fn evaluated_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_evaluated()).count()
    }
}

impl<I> From<Vec<I>> for Subpopulation<I> {
    fn from(individuals: Vec<I>) -> Self {
        Self { individuals }
    }
}

/// An ordered collection of subpopulations. The count is fixed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<I> {
    /// The subpopulations, indexed by subpopulation number.
    pub subpops: Vec<Subpopulation<I>>,
}

impl<I: Individual> Population<I> {
    /// Wraps a vector of subpopulations.
    pub fn new(subpops: Vec<Subpopulation<I>>) -> Self {
        Self { subpops }
    }

    /// Builds a population from plain individual vectors.
    pub fn from_vecs(subpops: Vec<Vec<I>>) -> Self {
        Self {
            subpops: subpops.into_iter().map(Subpopulation::from).collect(),
        }
    }

    /// Number of subpopulations.
    pub fn num_subpops(&self) -> usize {
        self.subpops.len()
    }

    /// Sizes of every subpopulation, in order.
    pub fn sizes(&self) -> Vec<usize> {
        self.subpops.iter().map(Subpopulation::len).collect()
    }

    /// Total number of individuals across subpopulations.
    pub fn total_individuals(&self) -> usize {
        self.subpops.iter().map(Subpopulation::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Ind {
        fit: f64,
        done: bool,
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
            self.done
        }
        fn set_evaluated(&mut self, evaluated: bool) {
            self.done = evaluated;
        }
    }

    fn ind(fit: f64, done: bool) -> Ind {
        Ind { fit, done }
    }

    #[test]
    fn test_sizes_and_totals() {
        let pop = Population::from_vecs(vec![
            vec![ind(1.0, false), ind(2.0, true)],
            vec![ind(3.0, true)],
        ]);
        assert_eq!(pop.num_subpops(), 2);
        assert_eq!(pop.sizes(), vec![2, 1]);
        assert_eq!(pop.total_individuals(), 3);
        assert_eq!(pop.subpops[0].evaluated_count(), 1);
        assert!(!pop.subpops[1].is_empty());
    }
}
