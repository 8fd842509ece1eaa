//! Domain-agnostic coevolutionary fitness evaluation.
//!
//! Decides who plays whom, how often, on which worker, and whose fitness a
//! match may change. Scoring itself is delegated to a user-supplied
//! [`GroupedProblem`](problem::GroupedProblem).
//!
//! - **Tournament**: single-population match scheduling. Single-elimination
//!   brackets, round-robin, and random one-way / two-way quotas, split
//!   across a private worker pool.
//! - **Coevolution**: multi-population partner coordination. Teams are built
//!   from shuffled, elite, current-generation and previous-generation
//!   partner pools.
//!
//! # Architecture
//!
//! `population` and `problem` hold the shared data types and the external
//! contracts. Both engines read and write fitness in place on a live
//! [`Population`](population::Population); neither breeds.

pub mod coevolution;
pub mod error;
pub mod population;
pub mod problem;
pub mod random;
pub mod tournament;

#[cfg(test)]
mod test_support;

pub use error::{CoevoError, Result};
