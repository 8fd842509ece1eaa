//! Shared match arena for one parallel scheduling pass.
//!
//! During a pass every individual of the subpopulation sits behind its own
//! lock. A match locks its two individuals in ascending index order, which
//! gives all workers one global lock order and rules out deadlock.

use crate::error::{CoevoError, Result};
use crate::problem::GroupedProblem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

pub(crate) struct MatchArena<'a, P: GroupedProblem> {
    cells: &'a [Mutex<P::Individual>],
    problem: &'a P,
    subpop: usize,
    count_victories_only: bool,
    matches: AtomicUsize,
}

impl<'a, P: GroupedProblem> MatchArena<'a, P> {
    pub(crate) fn new(
        cells: &'a [Mutex<P::Individual>],
        problem: &'a P,
        subpop: usize,
        count_victories_only: bool,
    ) -> Self {
        Self {
            cells,
            problem,
            subpop,
            count_victories_only,
            matches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Plays `first` against `second`; slot order follows the arguments.
    pub(crate) fn play(
        &self,
        first: usize,
        second: usize,
        update: [bool; 2],
        worker: usize,
    ) -> Result<()> {
        debug_assert_ne!(first, second, "an individual cannot play itself");

        let (mut a, mut b) = if first < second {
            let a = lock(&self.cells[first], first, worker)?;
            let b = lock(&self.cells[second], second, worker)?;
            (a, b)
        } else {
            let b = lock(&self.cells[second], second, worker)?;
            let a = lock(&self.cells[first], first, worker)?;
            (a, b)
        };

        let mut group = [&mut *a, &mut *b];
        self.problem.evaluate(
            &mut group,
            &update,
            self.count_victories_only,
            &[self.subpop, self.subpop],
            worker,
        );
        self.matches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn into_matches(self) -> usize {
        self.matches.into_inner()
    }
}

fn lock<I>(cell: &Mutex<I>, index: usize, worker: usize) -> Result<MutexGuard<'_, I>> {
    cell.lock().map_err(|_| CoevoError::WorkerFailed {
        worker,
        reason: format!("individual {index} was left poisoned by a failed worker"),
    })
}
