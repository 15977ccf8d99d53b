//! Differential Evolution (DE) adapted to permutations.
//!
//! DE works on real vectors; tours are mapped to vectors by a position
//! encoding ([`to_positions`]) and back by a decoder that accepts any real
//! vector ([`to_tour`]), followed by [`repair_tour`](crate::repair_tour).
//!
//! # Key Types
//!
//! - [`DeConfig`]: population, `F`, `CR`, strategy, crossover, jDE switch
//! - [`DeRunner`]: Executes the generational loop
//! - [`DeResult`]: Best tour and per-generation histories
//!
//! # References
//!
//! - Storn & Price (1997), "Differential Evolution – A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"
//! - Brest et al. (2006), "Self-Adapting Control Parameters in Differential
//!   Evolution" (jDE)

mod config;
mod encoding;
mod runner;

pub use config::{DeConfig, DeCrossover, DeStrategy};
pub use encoding::{to_positions, to_tour};
pub use runner::{DeResult, DeRunner};
