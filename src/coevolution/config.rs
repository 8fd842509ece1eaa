//! Partner coordinator configuration.
//!
//! [`PartnerConfig`] holds the partner counts and the per-subpopulation
//! selection methods. [`PartnerParams`] is the raw set of recognized count
//! keys (`num-current`, `num-gurus`, `num-prev`, `num-shuffled`).

use crate::error::{CoevoError, Result};
use crate::population::Individual;
use crate::problem::{Selection, SelectionMethod};
use std::fmt;

/// Configuration for the [`PartnerCoordinator`](super::PartnerCoordinator).
///
/// Each focal individual is teamed with, per other subpopulation:
/// `num_shuffled` shuffled partners, `num_gurus` elites, `num_current`
/// partners from the live generation and `num_prev` partners from the
/// previous generation's snapshot.
///
/// # Builder Pattern
///
/// ```
/// use u_coevo::coevolution::PartnerConfig;
/// use u_coevo::problem::Selection;
/// # #[derive(Clone)] struct P(f64);
/// # impl u_coevo::population::Individual for P {
/// #     type Fitness = f64;
/// #     fn fitness(&self) -> &f64 { &self.0 }
/// #     fn fitness_mut(&mut self) -> &mut f64 { &mut self.0 }
/// #     fn is_evaluated(&self) -> bool { true }
/// #     fn set_evaluated(&mut self, _: bool) {}
/// # }
///
/// let config: PartnerConfig<P> = PartnerConfig::new()
///     .with_num_gurus(1)
///     .with_num_current(2)
///     .with_num_prev(1)
///     .with_selection(2, Selection::Random, Selection::Tournament(2))
///     .with_seed(42);
/// assert!(config.validate(&[10, 10]).is_ok());
/// ```
pub struct PartnerConfig<I: Individual> {
    /// Elite partners per other subpopulation.
    pub num_gurus: usize,

    /// Shuffled partners per other subpopulation.
    ///
    /// Requires every subpopulation to have the same size.
    pub num_shuffled: usize,

    /// Live-generation partners per other subpopulation.
    pub num_current: usize,

    /// Previous-generation partners per other subpopulation.
    pub num_prev: usize,

    /// Selection method for live-generation partners, one per subpopulation.
    ///
    /// Must not read fitness. Required when `num_current > 0`.
    pub select_current: Vec<Box<dyn SelectionMethod<I>>>,

    /// Selection method for previous-generation partners, one per
    /// subpopulation. Required when `num_prev > 0`.
    pub select_prev: Vec<Box<dyn SelectionMethod<I>>>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl<I: Individual> Default for PartnerConfig<I> {
    fn default() -> Self {
        Self {
            num_gurus: 0,
            num_shuffled: 0,
            num_current: 0,
            num_prev: 0,
            select_current: Vec::new(),
            select_prev: Vec::new(),
            seed: None,
        }
    }
}

impl<I: Individual> fmt::Debug for PartnerConfig<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerConfig")
            .field("num_gurus", &self.num_gurus)
            .field("num_shuffled", &self.num_shuffled)
            .field("num_current", &self.num_current)
            .field("num_prev", &self.num_prev)
            .field("select_current", &self.select_current.len())
            .field("select_prev", &self.select_prev.len())
            .field("seed", &self.seed)
            .finish()
    }
}

impl<I: Individual + 'static> PartnerConfig<I> {
    /// Uses the same built-in selection for every subpopulation.
    pub fn with_selection(mut self, num_subpops: usize, current: Selection, prev: Selection) -> Self {
        self.select_current = (0..num_subpops)
            .map(|_| Box::new(current) as Box<dyn SelectionMethod<I>>)
            .collect();
        self.select_prev = (0..num_subpops)
            .map(|_| Box::new(prev) as Box<dyn SelectionMethod<I>>)
            .collect();
        self
    }
}

impl<I: Individual> PartnerConfig<I> {
    /// Creates a configuration with every count at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds counts from raw parameter keys. Selection methods still have to
    /// be supplied.
    pub fn from_params(params: PartnerParams) -> Result<Self> {
        let count = |key: &'static str, value: i64| -> Result<usize> {
            usize::try_from(value).map_err(|_| CoevoError::NegativePartnerCount { key, value })
        };
        Ok(Self {
            num_current: count(PartnerParams::NUM_CURRENT, params.num_current)?,
            num_gurus: count(PartnerParams::NUM_GURUS, params.num_gurus)?,
            num_prev: count(PartnerParams::NUM_PREV, params.num_prev)?,
            num_shuffled: count(PartnerParams::NUM_SHUFFLED, params.num_shuffled)?,
            ..Self::default()
        })
    }

    /// Sets the number of elite partners.
    pub fn with_num_gurus(mut self, n: usize) -> Self {
        self.num_gurus = n;
        self
    }

    /// Sets the number of shuffled partners.
    pub fn with_num_shuffled(mut self, n: usize) -> Self {
        self.num_shuffled = n;
        self
    }

    /// Sets the number of live-generation partners.
    pub fn with_num_current(mut self, n: usize) -> Self {
        self.num_current = n;
        self
    }

    /// Sets the number of previous-generation partners.
    pub fn with_num_prev(mut self, n: usize) -> Self {
        self.num_prev = n;
        self
    }

    /// Sets the live-generation selection methods, one per subpopulation.
    pub fn with_select_current(mut self, methods: Vec<Box<dyn SelectionMethod<I>>>) -> Self {
        self.select_current = methods;
        self
    }

    /// Sets the previous-generation selection methods, one per subpopulation.
    pub fn with_select_prev(mut self, methods: Vec<Box<dyn SelectionMethod<I>>>) -> Self {
        self.select_prev = methods;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Teams built per focal individual.
    pub fn teams_per_individual(&self) -> usize {
        self.num_gurus + self.num_shuffled + self.num_current + self.num_prev
    }

    /// Validates the configuration against the subpopulation sizes.
    pub fn validate(&self, sizes: &[usize]) -> Result<()> {
        if sizes.is_empty() || sizes.contains(&0) {
            return Err(CoevoError::NoSubpopulations);
        }
        if self.teams_per_individual() == 0 {
            return Err(CoevoError::NoPartners);
        }
        for (subpop, &size) in sizes.iter().enumerate() {
            if self.num_gurus > size {
                return Err(CoevoError::TooManyGurus {
                    num_gurus: self.num_gurus,
                    subpop,
                    size,
                });
            }
        }
        if self.num_shuffled > 0 && sizes.iter().any(|&s| s != sizes[0]) {
            return Err(CoevoError::UnequalSubpopulations {
                sizes: sizes.to_vec(),
            });
        }
        if self.num_current > 0 {
            check_count("select-current", self.select_current.len(), sizes.len())?;
            if let Some(subpop) = self.select_current.iter().position(|m| m.uses_fitness()) {
                return Err(CoevoError::FitnessBasedCurrentSelection { subpop });
            }
        }
        if self.num_prev > 0 {
            check_count("select-prev", self.select_prev.len(), sizes.len())?;
        }
        Ok(())
    }
}

fn check_count(role: &'static str, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(CoevoError::SelectorCountMismatch {
            role,
            got,
            expected,
        })
    }
}

impl<I: Individual> TryFrom<PartnerParams> for PartnerConfig<I> {
    type Error = CoevoError;

    fn try_from(params: PartnerParams) -> Result<Self> {
        Self::from_params(params)
    }
}

/// Raw partner count keys as read from a parameter source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", default)
)]
pub struct PartnerParams {
    /// `num-current`
    pub num_current: i64,
    /// `num-gurus`
    pub num_gurus: i64,
    /// `num-prev`
    pub num_prev: i64,
    /// `num-shuffled`
    pub num_shuffled: i64,
}

impl PartnerParams {
    /// Key for live-generation partners.
    pub const NUM_CURRENT: &'static str = "num-current";
    /// Key for elite partners.
    pub const NUM_GURUS: &'static str = "num-gurus";
    /// Key for previous-generation partners.
    pub const NUM_PREV: &'static str = "num-prev";
    /// Key for shuffled partners.
    pub const NUM_SHUFFLED: &'static str = "num-shuffled";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Player;

    fn config() -> PartnerConfig<Player> {
        PartnerConfig::new()
            .with_num_gurus(2)
            .with_num_current(1)
            .with_num_prev(1)
            .with_selection(2, Selection::Random, Selection::Tournament(2))
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate(&[5, 5]).is_ok());
        assert_eq!(config().teams_per_individual(), 4);
    }

    #[test]
    fn test_no_partners() {
        let config: PartnerConfig<Player> = PartnerConfig::new();
        assert!(matches!(
            config.validate(&[3, 3]),
            Err(CoevoError::NoPartners)
        ));
    }

    #[test]
    fn test_too_many_gurus() {
        assert!(matches!(
            config().validate(&[5, 1]),
            Err(CoevoError::TooManyGurus {
                num_gurus: 2,
                subpop: 1,
                size: 1
            })
        ));
    }

    #[test]
    fn test_shuffled_needs_equal_sizes() {
        let config = config().with_num_shuffled(1);
        assert!(config.validate(&[4, 4]).is_ok());
        assert!(matches!(
            config.validate(&[4, 6]),
            Err(CoevoError::UnequalSubpopulations { .. })
        ));
    }

    #[test]
    fn test_current_selection_must_ignore_fitness() {
        let config = config().with_selection(2, Selection::Best, Selection::Best);
        assert!(matches!(
            config.validate(&[4, 4]),
            Err(CoevoError::FitnessBasedCurrentSelection { subpop: 0 })
        ));
    }

    #[test]
    fn test_selector_count_must_match() {
        let config = config().with_selection(3, Selection::Random, Selection::Random);
        assert!(matches!(
            config.validate(&[4, 4]),
            Err(CoevoError::SelectorCountMismatch {
                role: "select-current",
                got: 3,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_selectors_only_needed_for_their_pool() {
        let config: PartnerConfig<Player> = PartnerConfig::new().with_num_gurus(1);
        assert!(config.validate(&[2, 2, 2]).is_ok());
    }

    #[test]
    fn test_empty_subpopulation_rejected() {
        assert!(matches!(
            config().validate(&[3, 0]),
            Err(CoevoError::NoSubpopulations)
        ));
        assert!(matches!(
            config().validate(&[]),
            Err(CoevoError::NoSubpopulations)
        ));
    }

    #[test]
    fn test_from_params() {
        let config: PartnerConfig<Player> = PartnerConfig::from_params(PartnerParams {
            num_current: 2,
            num_gurus: 1,
            num_prev: 0,
            num_shuffled: 3,
        })
        .unwrap();
        assert_eq!(config.num_current, 2);
        assert_eq!(config.num_gurus, 1);
        assert_eq!(config.num_prev, 0);
        assert_eq!(config.num_shuffled, 3);
    }

    #[test]
    fn test_from_params_rejects_negative() {
        let err = PartnerConfig::<Player>::try_from(PartnerParams {
            num_prev: -1,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CoevoError::NegativePartnerCount {
                key: "num-prev",
                value: -1
            }
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_from_json_keys() {
        let params: PartnerParams =
            serde_json::from_str(r#"{"num-gurus": 2, "num-current": 1}"#).unwrap();
        assert_eq!(params.num_gurus, 2);
        assert_eq!(params.num_current, 1);
        assert_eq!(params.num_prev, 0);
    }
}
