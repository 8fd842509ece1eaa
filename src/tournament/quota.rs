//! Per-individual opponent quota for two-way random scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many quota slots each individual has consumed in one pass.
///
/// Slots are claimed with a compare-and-swap, so workers that touch the same
/// opponent concurrently can never push its count past the quota. A count
/// reaching the quota means the individual has met its `group_size`
/// opponents; it never exceeds it.
#[derive(Debug)]
pub(crate) struct OpponentQuota {
    met: Vec<AtomicUsize>,
    quota: usize,
}

impl OpponentQuota {
    /// Creates zeroed counters for `n` individuals.
    pub(crate) fn new(n: usize, quota: usize) -> Self {
        Self {
            met: (0..n).map(|_| AtomicUsize::new(0)).collect(),
            quota,
        }
    }

    /// Slots consumed so far by individual `i`.
    pub(crate) fn met(&self, i: usize) -> usize {
        self.met[i].load(Ordering::Acquire)
    }

    /// Slots individual `i` still needs.
    pub(crate) fn remaining(&self, i: usize) -> usize {
        self.quota.saturating_sub(self.met(i))
    }

    /// Claims one slot for individual `i`.
    ///
    /// Returns `false` without changing anything if `i` is already full.
    pub(crate) fn try_claim(&self, i: usize) -> bool {
        let quota = self.quota;
        self.met[i]
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |m| {
                (m < quota).then_some(m + 1)
            })
            .is_ok()
    }

    /// Consumes the counters, returning each individual's final count.
    #[cfg(test)]
    pub(crate) fn into_counts(self) -> Vec<usize> {
        self.met.into_iter().map(AtomicUsize::into_inner).collect()
    }
}
