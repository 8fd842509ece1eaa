//! Match scheduler configuration.
//!
//! [`TournamentStyle`] is a tagged union of the supported styles, each
//! variant carrying the settings only it uses. [`TournamentParams`] is the
//! flat set of recognized keys (`style`, `group-size`, `over-eval`) that
//! converts into a validated style.

use crate::error::{CoevoError, Result};
use std::fmt;
use std::str::FromStr;

/// How individuals of one subpopulation are paired into matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "style", rename_all = "kebab-case")
)]
pub enum TournamentStyle {
    /// Knockout bracket; only victories count. Runs sequentially.
    #[cfg_attr(feature = "serde", serde(rename = "single-elim-tournament"))]
    SingleElimination,

    /// Every unordered pair plays exactly once.
    RoundRobin,

    /// Each individual meets `group_size` random opponents; only the focal
    /// individual's fitness changes.
    #[cfg_attr(feature = "serde", serde(rename = "rand-1-way"))]
    RandomOneWay {
        /// Opponents drawn per individual.
        #[cfg_attr(feature = "serde", serde(rename = "group-size"))]
        group_size: usize,
    },

    /// Each individual meets exactly `group_size` random opponents, counting
    /// matches it plays as an opponent.
    #[cfg_attr(feature = "serde", serde(rename = "rand-2-way"))]
    RandomTwoWay {
        /// Quota of matches per individual.
        #[cfg_attr(feature = "serde", serde(rename = "group-size"))]
        group_size: usize,
        /// Let opponents that met their quota keep accumulating fitness.
        #[cfg_attr(feature = "serde", serde(rename = "over-eval", default))]
        allow_over_evaluation: bool,
    },
}

impl TournamentStyle {
    /// Recognized style name for `single-elim-tournament`.
    pub const SINGLE_ELIMINATION: &'static str = "single-elim-tournament";
    /// Recognized style name for `round-robin`.
    pub const ROUND_ROBIN: &'static str = "round-robin";
    /// Recognized style name for `rand-1-way`.
    pub const RANDOM_ONE_WAY: &'static str = "rand-1-way";
    /// Recognized style name for `rand-2-way`.
    pub const RANDOM_TWO_WAY: &'static str = "rand-2-way";

    /// Builds a style from its recognized name and raw settings.
    ///
    /// `group_size` is required (and must be at least 1) for the two random
    /// styles and ignored otherwise. `over_eval` only affects `rand-2-way`.
    pub fn parse(name: &str, group_size: Option<i64>, over_eval: bool) -> Result<Self> {
        let group = || -> Result<usize> {
            let raw = group_size.ok_or_else(|| CoevoError::MissingGroupSize {
                style: name.to_string(),
            })?;
            if raw < 1 {
                return Err(CoevoError::InvalidGroupSize(raw));
            }
            usize::try_from(raw).map_err(|_| CoevoError::InvalidGroupSize(raw))
        };

        match name {
            Self::SINGLE_ELIMINATION => Ok(TournamentStyle::SingleElimination),
            Self::ROUND_ROBIN => Ok(TournamentStyle::RoundRobin),
            Self::RANDOM_ONE_WAY => Ok(TournamentStyle::RandomOneWay {
                group_size: group()?,
            }),
            Self::RANDOM_TWO_WAY => Ok(TournamentStyle::RandomTwoWay {
                group_size: group()?,
                allow_over_evaluation: over_eval,
            }),
            other => Err(CoevoError::UnknownStyle(other.to_string())),
        }
    }

    /// The recognized name of this style.
    pub fn name(&self) -> &'static str {
        match self {
            TournamentStyle::SingleElimination => Self::SINGLE_ELIMINATION,
            TournamentStyle::RoundRobin => Self::ROUND_ROBIN,
            TournamentStyle::RandomOneWay { .. } => Self::RANDOM_ONE_WAY,
            TournamentStyle::RandomTwoWay { .. } => Self::RANDOM_TWO_WAY,
        }
    }

    /// Opponents per individual for the random styles.
    pub fn group_size(&self) -> Option<usize> {
        match self {
            TournamentStyle::RandomOneWay { group_size }
            | TournamentStyle::RandomTwoWay { group_size, .. } => Some(*group_size),
            _ => None,
        }
    }

    /// Whether matches only count wins (single-elimination).
    pub fn counts_victories_only(&self) -> bool {
        matches!(self, TournamentStyle::SingleElimination)
    }

    /// Whether the style can be split across workers.
    pub fn is_parallel(&self) -> bool {
        !matches!(self, TournamentStyle::SingleElimination)
    }
}

impl Default for TournamentStyle {
    fn default() -> Self {
        TournamentStyle::RoundRobin
    }
}

impl fmt::Display for TournamentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group_size() {
            Some(k) => write!(f, "{}:{k}", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

/// Parses `name` or `name:group-size`, e.g. `round-robin` or `rand-1-way:4`.
/// Over-evaluation is never enabled this way.
impl FromStr for TournamentStyle {
    type Err = CoevoError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, group_size) = match s.split_once(':') {
            Some((name, k)) => {
                let k = k
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| CoevoError::UnknownStyle(s.to_string()))?;
                (name.trim(), Some(k))
            }
            None => (s.trim(), None),
        };
        Self::parse(name, group_size, false)
    }
}

/// Raw tournament keys as read from a parameter source.
///
/// Signed integers are accepted so that negative values are reported as
/// [`CoevoError::InvalidGroupSize`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct TournamentParams {
    /// One of `single-elim-tournament`, `round-robin`, `rand-1-way`, `rand-2-way`.
    pub style: String,
    /// Opponents per individual; required for the random styles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_size: Option<i64>,
    /// Allow over-evaluation of opponents in `rand-2-way`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub over_eval: bool,
}

impl TryFrom<TournamentParams> for TournamentStyle {
    type Error = CoevoError;

    fn try_from(params: TournamentParams) -> Result<Self> {
        TournamentStyle::parse(&params.style, params.group_size, params.over_eval)
    }
}

/// Configuration for the [`MatchScheduler`](super::MatchScheduler).
///
/// # Builder Pattern
///
/// ```
/// use u_coevo::tournament::{TournamentConfig, TournamentStyle};
///
/// let config = TournamentConfig::new(TournamentStyle::RandomOneWay { group_size: 4 })
///     .with_workers(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentConfig {
    /// Pairing style and its settings.
    pub style: TournamentStyle,

    /// Number of workers for the parallel styles.
    ///
    /// Single-elimination always runs on the calling thread.
    pub workers: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            style: TournamentStyle::default(),
            workers: rayon::current_num_threads(),
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Creates a configuration for `style` with default workers and seed.
    pub fn new(style: TournamentStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Builds a configuration from raw parameter keys.
    pub fn from_params(params: TournamentParams) -> Result<Self> {
        Ok(Self::new(TournamentStyle::try_from(params)?))
    }

    /// Sets the pairing style.
    pub fn with_style(mut self, style: TournamentStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CoevoError::InvalidWorkerCount);
        }
        if let Some(k) = self.style.group_size() {
            if k == 0 {
                return Err(CoevoError::InvalidGroupSize(0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_styles() {
        assert_eq!(
            TournamentStyle::parse("single-elim-tournament", None, false).unwrap(),
            TournamentStyle::SingleElimination
        );
        assert_eq!(
            TournamentStyle::parse("round-robin", Some(3), true).unwrap(),
            TournamentStyle::RoundRobin
        );
        assert_eq!(
            TournamentStyle::parse("rand-1-way", Some(3), true).unwrap(),
            TournamentStyle::RandomOneWay { group_size: 3 }
        );
        assert_eq!(
            TournamentStyle::parse("rand-2-way", Some(5), true).unwrap(),
            TournamentStyle::RandomTwoWay {
                group_size: 5,
                allow_over_evaluation: true
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_style() {
        let err = TournamentStyle::parse("swiss", None, false).unwrap_err();
        assert!(matches!(err, CoevoError::UnknownStyle(s) if s == "swiss"));
    }

    #[test]
    fn test_parse_requires_group_size_for_random_styles() {
        assert!(matches!(
            TournamentStyle::parse("rand-1-way", None, false),
            Err(CoevoError::MissingGroupSize { .. })
        ));
        assert!(matches!(
            TournamentStyle::parse("rand-2-way", Some(0), false),
            Err(CoevoError::InvalidGroupSize(0))
        ));
        assert!(matches!(
            TournamentStyle::parse("rand-1-way", Some(-4), false),
            Err(CoevoError::InvalidGroupSize(-4))
        ));
    }

    #[test]
    fn test_over_eval_defaults_false() {
        let style: TournamentStyle = TournamentParams {
            style: "rand-2-way".into(),
            group_size: Some(2),
            ..Default::default()
        }
        .try_into()
        .unwrap();
        assert_eq!(
            style,
            TournamentStyle::RandomTwoWay {
                group_size: 2,
                allow_over_evaluation: false
            }
        );
    }

    #[test]
    fn test_style_flags() {
        assert!(TournamentStyle::SingleElimination.counts_victories_only());
        assert!(!TournamentStyle::SingleElimination.is_parallel());
        assert!(!TournamentStyle::RoundRobin.counts_victories_only());
        assert!(TournamentStyle::RoundRobin.is_parallel());
        assert_eq!(TournamentStyle::RoundRobin.group_size(), None);
        assert_eq!(
            TournamentStyle::RandomOneWay { group_size: 6 }.to_string(),
            "rand-1-way:6"
        );
    }

    #[test]
    fn test_from_str_accepts_display_form() {
        let styles = [
            TournamentStyle::SingleElimination,
            TournamentStyle::RoundRobin,
            TournamentStyle::RandomOneWay { group_size: 4 },
        ];
        for style in styles {
            assert_eq!(style.to_string().parse::<TournamentStyle>().unwrap(), style);
        }
        assert!(matches!(
            "rand-2-way".parse::<TournamentStyle>(),
            Err(CoevoError::MissingGroupSize { .. })
        ));
        assert!(matches!(
            "rand-2-way:many".parse::<TournamentStyle>(),
            Err(CoevoError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let config = TournamentConfig::new(TournamentStyle::SingleElimination)
            .with_workers(3)
            .with_seed(9)
            .with_style(TournamentStyle::RoundRobin);
        assert_eq!(config.style, TournamentStyle::RoundRobin);
        assert_eq!(config.workers, 3);
        assert_eq!(config.seed, Some(9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = TournamentConfig::default().with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(CoevoError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_validate_zero_group_size() {
        let config = TournamentConfig::new(TournamentStyle::RandomOneWay { group_size: 0 });
        assert!(matches!(
            config.validate(),
            Err(CoevoError::InvalidGroupSize(0))
        ));
    }

    #[test]
    fn test_from_params() {
        let config = TournamentConfig::from_params(TournamentParams {
            style: "round-robin".into(),
            group_size: None,
            over_eval: false,
        })
        .unwrap();
        assert_eq!(config.style, TournamentStyle::RoundRobin);
        assert!(config.workers >= 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_from_json_keys() {
        let params: TournamentParams =
            serde_json::from_str(r#"{"style": "rand-2-way", "group-size": 4, "over-eval": true}"#)
                .unwrap();
        assert_eq!(
            TournamentStyle::try_from(params).unwrap(),
            TournamentStyle::RandomTwoWay {
                group_size: 4,
                allow_over_evaluation: true
            }
        );

        let style: TournamentStyle =
            serde_json::from_str(r#"{"style": "single-elim-tournament"}"#).unwrap();
        assert_eq!(style, TournamentStyle::SingleElimination);
    }
}
