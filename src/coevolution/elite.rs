//! Per-subpopulation elite ("guru") sets.

use crate::population::{best_first, Individual};

/// Deep copies of the best individuals of one subpopulation.
///
/// Elites are detached from the live population: matches against them never
/// change the copies, and breeding never touches them.
#[derive(Debug, Clone)]
pub struct EliteSet<I> {
    members: Vec<I>,
}

impl<I: Individual> EliteSet<I> {
    /// Copies the first `k` individuals, used before any fitness is known.
    pub fn seed(individuals: &[I], k: usize) -> Self {
        Self {
            members: individuals.iter().take(k).cloned().collect(),
        }
    }

    /// Copies the `k` best individuals, best first.
    ///
    /// Ties keep their positional order.
    pub fn refresh(individuals: &[I], k: usize) -> Self {
        let mut order: Vec<usize> = (0..individuals.len()).collect();
        order.sort_by(|&a, &b| best_first(individuals[a].fitness(), individuals[b].fitness()));
        Self {
            members: order
                .into_iter()
                .take(k)
                .map(|i| individuals[i].clone())
                .collect(),
        }
    }

    /// The elite copies, best first after a refresh.
    pub fn as_slice(&self) -> &[I] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The top elite, if any.
    pub fn best(&self) -> Option<&I> {
        self.members.first()
    }
}
