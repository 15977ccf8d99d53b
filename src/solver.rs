//! Algorithm-independent entry point.
//!
//! [`AlgorithmConfig`] closes over the three optimizer configurations so a
//! caller can pick the algorithm at runtime, run it, and get back a common
//! [`Solution`] alongside the algorithm-specific result.

use std::fmt;
use std::time::{Duration, Instant};

use crate::de::{DeConfig, DeResult, DeRunner};
use crate::ga::{GaConfig, GaResult, GaRunner};
use crate::matrix::DistanceMatrix;
use crate::progress::ProgressObserver;
use crate::sa::{SaConfig, SaResult, SaRunner};
use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimizer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    Ga,
    Sa,
    De,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Ga => "GA",
            Algorithm::Sa => "SA",
            Algorithm::De => "DE",
        };
        f.write_str(name)
    }
}

/// Parameters for one run of any optimizer.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::{AlgorithmConfig, DistanceMatrix, NoProgress};
/// use tsp_metaheur::sa::SaConfig;
///
/// let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let config = AlgorithmConfig::Sa(SaConfig::default().with_max_iterations(2_000)).with_seed(5);
/// let solution = config.run(&m, &mut NoProgress).unwrap();
/// assert_eq!(solution.algorithm.to_string(), "SA");
/// assert!((solution.best_cost - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", rename_all = "lowercase"))]
pub enum AlgorithmConfig {
    Ga(GaConfig),
    Sa(SaConfig),
    De(DeConfig),
}

impl AlgorithmConfig {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            AlgorithmConfig::Ga(_) => Algorithm::Ga,
            AlgorithmConfig::Sa(_) => Algorithm::Sa,
            AlgorithmConfig::De(_) => Algorithm::De,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            AlgorithmConfig::Ga(c) => c.seed,
            AlgorithmConfig::Sa(c) => c.seed,
            AlgorithmConfig::De(c) => c.seed,
        }
    }

    /// Replaces the seed of the wrapped configuration.
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            AlgorithmConfig::Ga(c) => AlgorithmConfig::Ga(c.with_seed(seed)),
            AlgorithmConfig::Sa(c) => AlgorithmConfig::Sa(c.with_seed(seed)),
            AlgorithmConfig::De(c) => AlgorithmConfig::De(c.with_seed(seed)),
        }
    }

    /// Clears the seed so the run draws a fresh one.
    pub fn unseeded(self) -> Self {
        match self {
            AlgorithmConfig::Ga(mut c) => {
                c.seed = None;
                AlgorithmConfig::Ga(c)
            }
            AlgorithmConfig::Sa(mut c) => {
                c.seed = None;
                AlgorithmConfig::Sa(c)
            }
            AlgorithmConfig::De(mut c) => {
                c.seed = None;
                AlgorithmConfig::De(c)
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            AlgorithmConfig::Ga(c) => c.validate(),
            AlgorithmConfig::Sa(c) => c.validate(),
            AlgorithmConfig::De(c) => c.validate(),
        }
    }

    /// Runs the configured optimizer and returns the common summary.
    pub fn run<O: ProgressObserver + ?Sized>(
        &self,
        matrix: &DistanceMatrix,
        observer: &mut O,
    ) -> Result<Solution, String> {
        self.run_detailed(matrix, observer).map(|outcome| outcome.solution)
    }

    /// Runs the configured optimizer, keeping the full algorithm result.
    pub fn run_detailed<O: ProgressObserver + ?Sized>(
        &self,
        matrix: &DistanceMatrix,
        observer: &mut O,
    ) -> Result<RunOutcome, String> {
        let start = Instant::now();
        let detail = match self {
            AlgorithmConfig::Ga(c) => {
                RunDetail::Ga(GaRunner::run_with_observer(matrix, c, observer)?)
            }
            AlgorithmConfig::Sa(c) => {
                RunDetail::Sa(SaRunner::run_with_observer(matrix, c, observer)?)
            }
            AlgorithmConfig::De(c) => {
                RunDetail::De(DeRunner::run_with_observer(matrix, c, observer)?)
            }
        };
        let elapsed = start.elapsed();

        let solution = Solution {
            algorithm: self.algorithm(),
            best_tour: detail.best_tour().to_vec(),
            best_cost: detail.best_cost(),
            steps: detail.steps(),
            elapsed,
        };
        Ok(RunOutcome { solution, detail })
    }
}

impl From<GaConfig> for AlgorithmConfig {
    fn from(config: GaConfig) -> Self {
        AlgorithmConfig::Ga(config)
    }
}

impl From<SaConfig> for AlgorithmConfig {
    fn from(config: SaConfig) -> Self {
        AlgorithmConfig::Sa(config)
    }
}

impl From<DeConfig> for AlgorithmConfig {
    fn from(config: DeConfig) -> Self {
        AlgorithmConfig::De(config)
    }
}

/// Summary shared by every optimizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub algorithm: Algorithm,
    pub best_tour: Tour,
    pub best_cost: f64,
    /// Generations (GA/DE) or iterations (SA) executed.
    pub steps: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Algorithm-specific result of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunDetail {
    Ga(GaResult),
    Sa(SaResult),
    De(DeResult),
}

impl RunDetail {
    pub fn best_tour(&self) -> &[usize] {
        match self {
            RunDetail::Ga(r) => &r.best_tour,
            RunDetail::Sa(r) => &r.best_tour,
            RunDetail::De(r) => &r.best_tour,
        }
    }

    pub fn best_cost(&self) -> f64 {
        match self {
            RunDetail::Ga(r) => r.best_cost,
            RunDetail::Sa(r) => r.best_cost,
            RunDetail::De(r) => r.best_cost,
        }
    }

    pub fn steps(&self) -> usize {
        match self {
            RunDetail::Ga(r) => r.generations,
            RunDetail::Sa(r) => r.iterations,
            RunDetail::De(r) => r.generations,
        }
    }
}

/// A [`Solution`] together with the full result it was derived from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunOutcome {
    pub solution: Solution,
    pub detail: RunDetail,
}
