//! Error type shared by the scheduling and coordination engines.
//!
//! Every configuration problem is detected before any match is played.
//! Worker failures during a pass abort the whole pass; there is no partial
//! result and no retry.

/// Errors raised by the coevolutionary evaluation engine.
#[derive(Debug, thiserror::Error)]
pub enum CoevoError {
    /// The tournament style name is not one of the recognized styles.
    #[error("unknown tournament style `{0}` (expected single-elim-tournament, round-robin, rand-1-way or rand-2-way)")]
    UnknownStyle(String),

    /// A random-opponent style was configured without a group size.
    #[error("style `{style}` requires a group-size")]
    MissingGroupSize {
        /// Name of the style that needs the group size.
        style: String,
    },

    /// The group size is smaller than 1.
    #[error("group-size must be at least 1, got {0}")]
    InvalidGroupSize(i64),

    /// The group size cannot be met by sampling without replacement.
    #[error("group-size {group_size} must be smaller than subpopulation {subpop}'s size {size}")]
    GroupSizeTooLarge {
        /// Configured number of opponents per individual.
        group_size: usize,
        /// Subpopulation being scheduled.
        subpop: usize,
        /// Size of that subpopulation.
        size: usize,
    },

    /// A partner count key holds a negative value.
    #[error("{key} must be >= 0, got {value}")]
    NegativePartnerCount {
        /// Parameter key.
        key: &'static str,
        /// Offending value.
        value: i64,
    },

    /// All partner counts are zero.
    #[error("the total number of partners (gurus + shuffled + current + prev) must be > 0")]
    NoPartners,

    /// More gurus were requested than a subpopulation holds.
    #[error("num-gurus {num_gurus} exceeds subpopulation {subpop}'s size {size}")]
    TooManyGurus {
        /// Configured elite count.
        num_gurus: usize,
        /// Subpopulation that is too small.
        subpop: usize,
        /// Size of that subpopulation.
        size: usize,
    },

    /// Shuffled pairing requires every subpopulation to have the same size.
    #[error("num-shuffled > 0 requires equal subpopulation sizes, got {sizes:?}")]
    UnequalSubpopulations {
        /// Observed sizes in subpopulation order.
        sizes: Vec<usize>,
    },

    /// The number of per-subpopulation selection methods does not match.
    #[error("{role} has {got} selection methods but the population has {expected} subpopulations")]
    SelectorCountMismatch {
        /// `select-current` or `select-prev`.
        role: &'static str,
        /// Number of methods configured.
        got: usize,
        /// Number of subpopulations.
        expected: usize,
    },

    /// A fitness-based method was configured for current-generation partners.
    #[error("select-current for subpopulation {subpop} reads fitness, which is not final for the live generation")]
    FitnessBasedCurrentSelection {
        /// Subpopulation whose selector is invalid.
        subpop: usize,
    },

    /// The population has no subpopulations, or one of them is empty.
    #[error("population must contain at least one non-empty subpopulation")]
    NoSubpopulations,

    /// Zero workers were requested.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker was interrupted during an evaluation pass.
    #[error("worker {worker} failed: {reason}")]
    WorkerFailed {
        /// Index of the failing worker.
        worker: usize,
        /// Panic message or lock failure description.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoevoError>;
