//! DE configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mutation strategy building a donor vector.
///
/// `x_r1`, `x_r2`, `x_r3` are distinct population members other than the
/// target; `x_best` is the best tour found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeStrategy {
    /// `v = x_r1 + F·(x_r2 − x_r3)`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "rand/1"))]
    Rand1,
    /// `v = x_best + F·(x_r1 − x_r2)`
    #[cfg_attr(feature = "serde", serde(rename = "best/1"))]
    Best1,
    /// `v = x_i + F·(x_best − x_i) + F·(x_r1 − x_r2)`
    #[cfg_attr(feature = "serde", serde(rename = "current-to-best/1"))]
    CurrentToBest1,
}

impl DeStrategy {
    /// Number of random helpers the strategy draws.
    pub fn helpers(&self) -> usize {
        match self {
            DeStrategy::Rand1 => 3,
            DeStrategy::Best1 | DeStrategy::CurrentToBest1 => 2,
        }
    }
}

/// How the trial vector mixes donor and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeCrossover {
    /// Independent Bernoulli(CR) per position, one forced donor position.
    #[default]
    Binomial,
    /// One contiguous (cyclic) donor run from a random start.
    Exponential,
}

/// Configuration for Differential Evolution.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::de::{DeConfig, DeCrossover, DeStrategy};
///
/// let config = DeConfig::default()
///     .with_population_size(40)
///     .with_strategy(DeStrategy::CurrentToBest1)
///     .with_crossover(DeCrossover::Exponential)
///     .with_self_adaptive(true)
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeConfig {
    /// Number of individuals. Must leave room for the helpers besides the
    /// target.
    pub population_size: usize,

    pub generations: usize,

    /// Differential weight `F`.
    pub f: f64,

    /// Crossover probability `CR` (0.0–1.0).
    pub cr: f64,

    pub strategy: DeStrategy,

    pub crossover: DeCrossover,

    /// jDE-style per-individual resampling of `F` and `CR`.
    pub self_adaptive: bool,

    /// Lower bound for a resampled `F`.
    pub f_lower: f64,

    /// Upper bound for a resampled `F`.
    pub f_upper: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            f: 0.8,
            cr: 0.9,
            strategy: DeStrategy::default(),
            crossover: DeCrossover::default(),
            self_adaptive: false,
            f_lower: 0.1,
            f_upper: 0.9,
            seed: None,
        }
    }
}

impl DeConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_f(mut self, f: f64) -> Self {
        self.f = f;
        self
    }

    /// Sets `CR`, clamped into [0, 1].
    pub fn with_cr(mut self, cr: f64) -> Self {
        self.cr = cr.clamp(0.0, 1.0);
        self
    }

    pub fn with_strategy(mut self, strategy: DeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_crossover(mut self, crossover: DeCrossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_self_adaptive(mut self, enabled: bool) -> Self {
        self.self_adaptive = enabled;
        self
    }

    /// Sets the range `[lower, upper]` for resampled `F`.
    pub fn with_f_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.f_lower = lower;
        self.f_upper = upper;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let needed = self.strategy.helpers() + 1;
        if self.population_size < needed.max(4) {
            return Err(format!(
                "population_size must be at least {}, got {}",
                needed.max(4),
                self.population_size
            ));
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if !self.f.is_finite() || self.f < 0.0 {
            return Err(format!("F must be a non-negative number, got {}", self.f));
        }
        if !(0.0..=1.0).contains(&self.cr) {
            return Err(format!("CR must be in [0, 1], got {}", self.cr));
        }
        if self.self_adaptive && !(self.f_lower <= self.f_upper && self.f_lower >= 0.0) {
            return Err(format!(
                "F bounds must satisfy 0 <= lower <= upper, got [{}, {}]",
                self.f_lower, self.f_upper
            ));
        }
        Ok(())
    }
}
