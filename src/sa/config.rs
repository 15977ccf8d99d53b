//! SA configuration, cooling schedules and neighbor moves.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Iteration horizon over which [`CoolingSchedule::Linear`] reaches the
/// final temperature.
pub const LINEAR_HORIZON: usize = 50_000;

/// Cooling schedule, applied once per temperature step.
///
/// `k` below is the total number of iterations executed so far.
///
/// # References
///
/// - Geometric: Kirkpatrick et al. (1983)
/// - Logarithmic: Geman & Geman (1984), with asymptotic convergence proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoolingSchedule {
    /// `T ← T · cooling_rate`.
    ///
    /// Most widely used. Typical rate: 0.95–0.999.
    #[default]
    Geometric,

    /// `T = T_0 - (T_0 - T_final) · k / 50000`.
    ///
    /// Reaches the final temperature after [`LINEAR_HORIZON`] iterations.
    Linear,

    /// `T = T_0 · cooling_rate^k`.
    ///
    /// Cools per iteration rather than per step, so it drops much faster
    /// than `Geometric` with the same rate.
    Exponential,

    /// `T = T_0 / ln(k + 2)`.
    ///
    /// Very slow; usually ends on the iteration cap.
    Logarithmic,
}

/// Move used to build a neighbor of the current tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NeighborMove {
    /// Reverse the segment between two random positions.
    #[default]
    TwoOpt,
    /// Exchange two random positions.
    Swap,
    /// Remove one random node and reinsert it at a random position.
    Insertion,
}

/// Configuration for the Simulated Annealing algorithm.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_final_temperature(0.01)
///     .with_cooling_schedule(CoolingSchedule::Geometric)
///     .with_cooling_rate(0.98)
///     .with_iterations_per_temp(200)
///     .with_reheating(true)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The run stops once the temperature is no longer above this.
    pub final_temperature: f64,

    /// Rate for the `Geometric` and `Exponential` schedules, in (0, 1).
    pub cooling_rate: f64,

    /// Neighbor evaluations per temperature step.
    pub iterations_per_temp: usize,

    pub cooling_schedule: CoolingSchedule,

    pub neighbor_move: NeighborMove,

    /// Raise the temperature when the search stops improving.
    pub reheating: bool,

    /// Iterations without a new best before a reheat.
    pub reheat_threshold: usize,

    /// Stop when the best cost barely moved over the last window of steps.
    pub early_stop_enabled: bool,

    /// Minimum relative improvement over the window to keep going.
    pub early_stop_threshold: f64,

    /// Number of cost-history entries compared by the early-stop rule.
    pub early_stop_window: usize,

    /// Hard limit on total iterations, independent of temperature.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10_000.0,
            final_temperature: 0.1,
            cooling_rate: 0.995,
            iterations_per_temp: 100,
            cooling_schedule: CoolingSchedule::default(),
            neighbor_move: NeighborMove::default(),
            reheating: false,
            reheat_threshold: 100,
            early_stop_enabled: false,
            early_stop_threshold: 0.001,
            early_stop_window: 50,
            max_iterations: 50_000,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temp(mut self, n: usize) -> Self {
        self.iterations_per_temp = n;
        self
    }

    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    pub fn with_neighbor_move(mut self, mv: NeighborMove) -> Self {
        self.neighbor_move = mv;
        self
    }

    pub fn with_reheating(mut self, enabled: bool) -> Self {
        self.reheating = enabled;
        self
    }

    pub fn with_reheat_threshold(mut self, n: usize) -> Self {
        self.reheat_threshold = n;
        self
    }

    /// Enables early stopping with the given threshold and window.
    pub fn with_early_stop(mut self, threshold: f64, window: usize) -> Self {
        self.early_stop_enabled = true;
        self.early_stop_threshold = threshold;
        self.early_stop_window = window;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.final_temperature <= 0.0 {
            return Err("final_temperature must be positive".into());
        }
        if self.final_temperature >= self.initial_temperature {
            return Err("final_temperature must be less than initial_temperature".into());
        }
        if matches!(
            self.cooling_schedule,
            CoolingSchedule::Geometric | CoolingSchedule::Exponential
        ) && (self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0)
        {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temp == 0 {
            return Err("iterations_per_temp must be at least 1".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.early_stop_enabled && self.early_stop_window < 2 {
            return Err("early_stop_window must be at least 2".into());
        }
        Ok(())
    }
}
