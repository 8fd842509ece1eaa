//! Population data model.
//!
//! Individuals, subpopulations and populations as seen by the scheduling
//! engines, plus the two pieces of cross-generation plumbing they share.
//!
//! # Core Traits
//!
//! - [`Fitness`]: Opaque comparable score (`better_than`, `equivalent_to`)
//! - [`Individual`]: A candidate solution carrying fitness and an evaluated flag
//!
//! # Key Types
//!
//! - [`Subpopulation`] / [`Population`]: Ordered, mutable containers
//! - [`GenerationSnapshot`]: Deep copy taken at a generation boundary
//! - [`Chunk`] / [`partition`]: Contiguous index ranges for workers

mod containers;
mod partition;
mod snapshot;
mod types;

pub use containers::{Population, Subpopulation};
pub use partition::{partition, Chunk};
pub use snapshot::GenerationSnapshot;
pub use types::{best_first, Fitness, Individual};
