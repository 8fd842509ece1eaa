//! Single-population tournament scheduling.
//!
//! The [`MatchScheduler`] decides who plays whom inside each subpopulation,
//! how often, and whose fitness a match may change. Scoring is delegated to a
//! [`GroupedProblem`](crate::problem::GroupedProblem).
//!
//! # Styles
//!
//! - **Single-elimination**: knockout bracket, sequential, victories only
//! - **Round-robin**: every unordered pair exactly once, parallel by rows
//! - **Random one-way**: `group_size` distinct opponents per individual;
//!   only the focal individual is updated
//! - **Random two-way**: every individual meets exactly `group_size`
//!   opponents, counting matches played as an opponent
//!
//! # Key Types
//!
//! - [`TournamentStyle`]: Tagged union of styles and their settings
//! - [`TournamentConfig`]: Style, worker count and seed
//! - [`TournamentParams`]: Raw `style` / `group-size` / `over-eval` keys
//! - [`MatchScheduler`]: Executes a scheduling pass
//!
//! # References
//!
//! - Angeline & Pollack (1993), "Competitive Environments Evolve Better
//!   Solutions for Complex Tasks"
//! - Panait & Luke (2002), "A Comparison of Two Competitive Fitness
//!   Functions"

mod arena;
mod config;
mod quota;
mod runner;
mod styles;

pub use config::{TournamentConfig, TournamentParams, TournamentStyle};
pub use runner::{EvaluationReport, MatchScheduler};
