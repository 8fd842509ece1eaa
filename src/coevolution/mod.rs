//! Multi-population partner coordination.
//!
//! The [`PartnerCoordinator`] evaluates each individual in teams that hold one
//! member from every subpopulation. Partners come from four pools:
//!
//! - **Shuffled**: per-generation random permutations of each subpopulation
//! - **Guru**: the [`EliteSet`] of each other subpopulation
//! - **Current**: drawn from the live generation by a fitness-free method
//! - **Previous**: drawn from the last [`GenerationSnapshot`](crate::population::GenerationSnapshot)
//!
//! Elite sets and the snapshot are refreshed only between generations.
//!
//! # References
//!
//! - Potter & De Jong (2000), "Cooperative Coevolution: An Architecture for
//!   Evolving Coadapted Subcomponents"
//! - Wiegand, Liles & De Jong (2001), "An Empirical Analysis of Collaboration
//!   Methods in Cooperative Coevolutionary Algorithms"

mod config;
mod elite;
mod runner;

pub use config::{PartnerConfig, PartnerParams};
pub use elite::EliteSet;
pub use runner::{CoevolutionReport, PartnerCoordinator};
