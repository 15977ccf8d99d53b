//! Repeated trials of one configuration with summary statistics.
//!
//! Each trial is an independent run with its own generator, so with the
//! `parallel` feature the trials execute on the rayon pool and still
//! produce the same costs as the sequential path.

use std::time::Duration;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::matrix::DistanceMatrix;
use crate::progress::NoProgress;
use crate::random::seed_from_str;
use crate::solver::{Algorithm, AlgorithmConfig};
use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label used when the base seed is empty.
const DEFAULT_BASE_SEED: &str = "benchmark";

/// How trial seeds are derived from the base seed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedMode {
    /// Every trial hashes the base label itself.
    Same,
    /// Trial `i` (0-based) hashes `"{base}_{i}"`.
    #[default]
    PerTrial,
    /// Every trial draws a fresh random seed.
    Unseeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BenchmarkOptions {
    pub trials: usize,
    pub seed_mode: SeedMode,
    pub base_seed: String,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            trials: 10,
            seed_mode: SeedMode::default(),
            base_seed: DEFAULT_BASE_SEED.to_string(),
        }
    }
}

impl BenchmarkOptions {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed_mode(mut self, mode: SeedMode) -> Self {
        self.seed_mode = mode;
        self
    }

    pub fn with_base_seed(mut self, label: impl Into<String>) -> Self {
        self.base_seed = label.into();
        self
    }

    /// Seed of the 0-based trial `index`, `None` when unseeded.
    pub fn trial_seed(&self, index: usize) -> Option<u64> {
        let base = if self.base_seed.is_empty() {
            DEFAULT_BASE_SEED
        } else {
            self.base_seed.as_str()
        };
        match self.seed_mode {
            SeedMode::Same => Some(seed_from_str(base)),
            SeedMode::PerTrial => Some(seed_from_str(&format!("{base}_{index}"))),
            SeedMode::Unseeded => None,
        }
    }
}

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialResult {
    /// 1-based trial number.
    pub trial: usize,
    /// Seed the trial ran with, `None` when unseeded.
    pub seed: Option<u64>,
    pub best_cost: f64,
    pub elapsed: Duration,
    pub best_tour: Tour,
}

/// Mean, median, population standard deviation and range of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Summarizes `values`. Returns `None` for an empty slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsp_metaheur::benchmark::SummaryStats;
    ///
    /// let s = SummaryStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(s.mean, 5.0);
    /// assert_eq!(s.median, 4.5);
    /// assert_eq!(s.std_dev, 2.0);
    /// assert_eq!((s.min, s.max), (2.0, 9.0));
    /// ```
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let len = values.len() as f64;
        let mean = values.iter().sum::<f64>() / len;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / len;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// All trials of a benchmark and their statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BenchmarkReport {
    pub algorithm: Algorithm,
    pub trials: Vec<TrialResult>,
    /// Statistics of the best costs.
    pub cost: SummaryStats,
    /// Statistics of the wall-clock times in milliseconds.
    pub time_ms: SummaryStats,
}

impl BenchmarkReport {
    /// The trial with the lowest cost; the earliest wins ties.
    pub fn best_trial(&self) -> Option<&TrialResult> {
        self.trials.iter().reduce(|best, t| {
            if t.best_cost < best.best_cost {
                t
            } else {
                best
            }
        })
    }
}

/// Runs `options.trials` independent trials of `config` on `matrix`.
///
/// The seed in `config` is replaced by each trial's seed.
pub fn run_benchmark(
    matrix: &DistanceMatrix,
    config: &AlgorithmConfig,
    options: &BenchmarkOptions,
) -> Result<BenchmarkReport, String> {
    if options.trials == 0 {
        return Err("benchmark needs at least 1 trial".into());
    }
    config.validate()?;

    log::debug!(
        "benchmark start: {} x {} ({:?} seeds from {:?})",
        options.trials,
        config.algorithm(),
        options.seed_mode,
        options.base_seed
    );

    let run_trial = |index: usize| -> Result<TrialResult, String> {
        let seed = options.trial_seed(index);
        let trial_config = match seed {
            Some(s) => config.clone().with_seed(s),
            None => config.clone().unseeded(),
        };
        let solution = trial_config.run(matrix, &mut NoProgress)?;
        log::trace!(
            "trial {} finished: cost {:.4} in {:?}",
            index + 1,
            solution.best_cost,
            solution.elapsed
        );
        Ok(TrialResult {
            trial: index + 1,
            seed,
            best_cost: solution.best_cost,
            elapsed: solution.elapsed,
            best_tour: solution.best_tour,
        })
    };

    #[cfg(feature = "parallel")]
    let trials: Vec<TrialResult> = (0..options.trials)
        .into_par_iter()
        .map(run_trial)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let trials: Vec<TrialResult> = (0..options.trials)
        .map(run_trial)
        .collect::<Result<_, _>>()?;

    let costs: Vec<f64> = trials.iter().map(|t| t.best_cost).collect();
    let times: Vec<f64> = trials
        .iter()
        .map(|t| t.elapsed.as_secs_f64() * 1000.0)
        .collect();
    let (cost, time_ms) = match (
        SummaryStats::from_values(&costs),
        SummaryStats::from_values(&times),
    ) {
        (Some(c), Some(t)) => (c, t),
        _ => return Err("benchmark produced no trials".into()),
    };

    log::info!(
        "benchmark finished: {} mean cost {:.4} (min {:.4}, max {:.4}), mean time {:.2} ms",
        config.algorithm(),
        cost.mean,
        cost.min,
        cost.max,
        time_ms.mean
    );

    Ok(BenchmarkReport {
        algorithm: config.algorithm(),
        trials,
        cost,
        time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaConfig;
    use crate::sa::SaConfig;
    use crate::tour::is_valid_tour;

    fn octagon() -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..8)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / 8.0;
                (a.cos(), a.sin())
            })
            .collect();
        DistanceMatrix::euclidean(&points)
    }

    fn sa_config() -> AlgorithmConfig {
        AlgorithmConfig::Sa(SaConfig::default().with_max_iterations(1_500))
    }

    #[test]
    fn test_trial_seeds() {
        let same = BenchmarkOptions::default()
            .with_seed_mode(SeedMode::Same)
            .with_base_seed("run");
        assert_eq!(same.trial_seed(0), Some(seed_from_str("run")));
        assert_eq!(same.trial_seed(5), Some(seed_from_str("run")));

        let per_trial = BenchmarkOptions::default().with_base_seed("run");
        assert_eq!(per_trial.trial_seed(0), Some(seed_from_str("run_0")));
        assert_eq!(per_trial.trial_seed(3), Some(seed_from_str("run_3")));

        let empty = BenchmarkOptions::default().with_base_seed("");
        assert_eq!(empty.trial_seed(1), Some(seed_from_str("benchmark_1")));

        let unseeded = BenchmarkOptions::default().with_seed_mode(SeedMode::Unseeded);
        assert_eq!(unseeded.trial_seed(0), None);
    }

    #[test]
    fn test_same_seed_trials_agree() {
        let m = octagon();
        let options = BenchmarkOptions::default()
            .with_trials(4)
            .with_seed_mode(SeedMode::Same);
        let report = run_benchmark(&m, &sa_config(), &options).unwrap();

        assert_eq!(report.algorithm, Algorithm::Sa);
        assert_eq!(report.trials.len(), 4);
        let first = &report.trials[0];
        for t in &report.trials {
            assert_eq!(t.best_cost, first.best_cost);
            assert_eq!(t.best_tour, first.best_tour);
            assert_eq!(t.seed, first.seed);
        }
        assert_eq!(report.cost.std_dev, 0.0);
    }

    #[test]
    fn test_per_trial_report() {
        let m = octagon();
        let config = AlgorithmConfig::Ga(
            GaConfig::default()
                .with_population_size(12)
                .with_generations(10),
        );
        let options = BenchmarkOptions::default().with_trials(5);
        let report = run_benchmark(&m, &config, &options).unwrap();

        let numbers: Vec<usize> = report.trials.iter().map(|t| t.trial).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        for t in &report.trials {
            assert!(is_valid_tour(&t.best_tour, 8));
            assert!(t.best_cost >= report.cost.min && t.best_cost <= report.cost.max);
        }
        assert!(report.cost.min <= report.cost.median && report.cost.median <= report.cost.max);
        assert_eq!(report.best_trial().map(|t| t.best_cost), Some(report.cost.min));
        assert!(report.time_ms.min >= 0.0);

        // Rerunning reproduces every trial.
        let again = run_benchmark(&m, &config, &options).unwrap();
        let costs = |r: &BenchmarkReport| r.trials.iter().map(|t| t.best_cost).collect::<Vec<_>>();
        assert_eq!(costs(&report), costs(&again));
    }

    #[test]
    fn test_unseeded_trials_run() {
        let m = octagon();
        let options = BenchmarkOptions::default()
            .with_trials(2)
            .with_seed_mode(SeedMode::Unseeded);
        let report = run_benchmark(&m, &sa_config(), &options).unwrap();
        assert!(report.trials.iter().all(|t| t.seed.is_none()));
    }

    #[test]
    fn test_rejects_zero_trials_and_bad_config() {
        let m = octagon();
        let zero = BenchmarkOptions::default().with_trials(0);
        assert!(run_benchmark(&m, &sa_config(), &zero).is_err());

        let bad = AlgorithmConfig::Sa(SaConfig::default().with_final_temperature(-1.0));
        assert!(run_benchmark(&m, &bad, &BenchmarkOptions::default()).is_err());
    }

    #[test]
    fn test_summary_stats() {
        assert!(SummaryStats::from_values(&[]).is_none());

        let one = SummaryStats::from_values(&[3.0]).unwrap();
        assert_eq!((one.mean, one.median, one.std_dev), (3.0, 3.0, 0.0));

        let odd = SummaryStats::from_values(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(odd.median, 3.0);
        assert_eq!((odd.min, odd.max), (1.0, 5.0));
        assert!((odd.std_dev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }
}
