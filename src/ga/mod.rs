//! Genetic Algorithm for tours.
//!
//! A generational GA over permutations with elitism, pluggable operators,
//! optional adaptive mutation, probabilistic 2-opt refinement of offspring
//! and a diversity-triggered restart.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, operator choices)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best tour, per-generation histories, [`GaStatistics`]
//!
//! # Submodules
//!
//! - [`operators`]: Permutation crossover (OX, PMX, ERX) and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Larrañaga et al. (1999), "Genetic Algorithms for the Travelling Salesman
//!   Problem: A Review of Representations and Operators"

mod config;
mod local_search;
pub mod operators;
mod runner;
mod selection;

pub use config::{CrossoverMethod, GaConfig, MutationMethod};
pub use local_search::two_opt;
pub use runner::{population_diversity, GaResult, GaRunner, GaStatistics};
pub use selection::Selection;
