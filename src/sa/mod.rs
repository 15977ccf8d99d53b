//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The run walks 2-opt neighbors (by default) of one tour, cools once per
//! block of `iterations_per_temp` evaluations, and may reheat or stop early.
//! A hard iteration cap bounds the run whatever the schedule does.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Geman & Geman (1984), "Stochastic Relaxation, Gibbs Distributions, and
//!   the Bayesian Restoration of Images"

mod config;
mod runner;

pub use config::{CoolingSchedule, NeighborMove, SaConfig, LINEAR_HORIZON};
pub use runner::{acceptance_probability, SaResult, SaRunner};
