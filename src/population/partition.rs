//! Work partitioning across workers.

/// A contiguous `[start, start + len)` range of subpopulation indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First index in the range.
    pub start: usize,
    /// Number of indices in the range.
    pub len: usize,
}

impl Chunk {
    /// One past the last index in the range.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Iterates the indices of the range.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Splits `n` indices into `workers` contiguous chunks.
///
/// Every chunk but the last gets `n / workers` indices; the last absorbs the
/// remainder. A worker count of zero is treated as one.
///
/// # Examples
///
/// ```
/// use u_coevo::population::partition;
///
/// let chunks = partition(10, 3);
/// let lens: Vec<usize> = chunks.iter().map(|c| c.len).collect();
/// assert_eq!(lens, vec![3, 3, 4]);
/// ```
pub fn partition(n: usize, workers: usize) -> Vec<Chunk> {
    let workers = workers.max(1);
    let base = n / workers;
    (0..workers)
        .map(|w| {
            let start = w * base;
            let len = if w + 1 == workers { n - start } else { base };
            Chunk { start, len }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_worker_gets_everything() {
        assert_eq!(partition(7, 1), vec![Chunk { start: 0, len: 7 }]);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let chunks = partition(11, 4);
        assert_eq!(
            chunks,
            vec![
                Chunk { start: 0, len: 2 },
                Chunk { start: 2, len: 2 },
                Chunk { start: 4, len: 2 },
                Chunk { start: 6, len: 5 },
            ]
        );
    }

    #[test]
    fn test_more_workers_than_individuals() {
        let chunks = partition(2, 5);
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[4], Chunk { start: 0, len: 2 });
        assert!(chunks[..4].iter().all(|c| c.len == 0));
    }

    #[test]
    fn test_zero_workers_treated_as_one() {
        assert_eq!(partition(3, 0), vec![Chunk { start: 0, len: 3 }]);
    }

    proptest! {
        #[test]
        fn prop_chunks_tile_the_range(n in 0usize..500, workers in 1usize..32) {
            let chunks = partition(n, workers);
            prop_assert_eq!(chunks.len(), workers);
            prop_assert_eq!(chunks.iter().map(|c| c.len).sum::<usize>(), n);

            let mut covered = vec![0u8; n];
            for c in chunks.iter().filter(|c| c.len > 0) {
                for i in c.indices() {
                    covered[i] += 1;
                }
            }
            prop_assert!(covered.iter().all(|&k| k == 1));

            for c in &chunks[..workers - 1] {
                prop_assert_eq!(c.len, n / workers);
            }
        }
    }
}
