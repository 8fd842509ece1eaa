//! Contracts with the world outside the scheduling engines.
//!
//! # Core Traits
//!
//! - [`GroupedProblem`]: Scores a group of individuals with per-slot update flags
//! - [`SelectionMethod`]: Picks partner indices from an explicit [`SelectionContext`]
//! - [`Breeder`]: Says which subpopulations are assessed this generation
//!
//! # Built-ins
//!
//! - [`Selection`]: Random, tournament, rank and best selection
//! - [`BreedingSchedule`]: Assess-all and sequential (one subpopulation per generation)

mod selection;
mod types;

pub use selection::{Selection, SelectionContext, SelectionMethod};
pub use types::{Breeder, BreedingSchedule, GenerationState, GroupedProblem};
