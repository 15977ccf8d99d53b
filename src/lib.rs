//! Metaheuristic solvers for the Traveling Salesman Problem.
//!
//! Provides three interchangeable optimizers over a shared tour model:
//!
//! - **Genetic Algorithm (GA)**: Population-based evolutionary optimization
//!   with pluggable selection, crossover, and mutation operators, adaptive
//!   mutation, 2-opt refinement and diversity restarts.
//! - **Simulated Annealing (SA)**: Single-solution trajectory optimization
//!   with pluggable cooling schedules, reheating and early stopping.
//! - **Differential Evolution (DE)**: Vector-arithmetic search adapted to
//!   permutations through a position encoding, with optional jDE-style
//!   self-adaptive parameters.
//!
//! plus an all-pairs shortest-path preprocessor ([`shortest_path`]) that
//! turns a sparse direct-edge matrix into the complete matrix the
//! optimizers consume.
//!
//! # Architecture
//!
//! Every run owns one seeded generator ([`random`]); two runs with the same
//! configuration and seed produce identical tours and histories. Runs are
//! synchronous loops; [`worker`] runs them on their own threads and
//! [`benchmark`] repeats them over derived seeds.
//!
//! # Example
//!
//! ```
//! use tsp_metaheur::{tour_distance, DistanceMatrix};
//! use tsp_metaheur::ga::{GaConfig, GaRunner};
//!
//! let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0), (2.0, 5.0)]);
//! let result = GaRunner::run(&m, &GaConfig::default().with_generations(50).with_seed(42)).unwrap();
//! assert_eq!(result.best_tour.len(), 5);
//! assert!((tour_distance(&result.best_tour, &m) - result.best_cost).abs() < 1e-9);
//! ```

pub mod benchmark;
pub mod de;
pub mod ga;
pub mod matrix;
pub mod progress;
pub mod random;
pub mod sa;
pub mod shortest_path;
pub mod solver;
pub mod tour;
pub mod worker;

pub use matrix::DistanceMatrix;
pub use progress::{NoProgress, Progress, ProgressObserver};
pub use solver::{Algorithm, AlgorithmConfig, RunDetail, RunOutcome, Solution};
pub use tour::{
    is_valid_tour, nearest_neighbor_tour, random_tour, repair_tour, rotate_to_start,
    tour_distance, Individual, Tour,
};
