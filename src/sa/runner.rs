//! SA execution loop.

use super::config::{CoolingSchedule, NeighborMove, SaConfig, LINEAR_HORIZON};
use crate::ga::operators::{inversion_mutation, swap_mutation};
use crate::matrix::DistanceMatrix;
use crate::progress::{NoProgress, Progress, ProgressObserver, ITERATION_CADENCE};
use crate::random::rng_for;
use crate::tour::{random_tour, tour_distance, Tour};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaResult {
    /// The best tour found.
    pub best_tour: Tour,

    /// Cost of the best tour.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Accepted moves, improving or not.
    pub accepted: usize,

    pub rejected: usize,

    /// `accepted / (accepted + rejected)`, 0 if nothing was evaluated.
    pub acceptance_rate: f64,

    /// Number of times the temperature was raised.
    pub reheats: usize,

    /// Whether the early-stop rule ended the run.
    pub early_stopped: bool,

    /// Best cost at the start and after every temperature step.
    pub cost_history: Vec<f64>,

    /// Initial temperature, then the temperature each step ran at.
    pub temperature_history: Vec<f64>,

    /// One entry per iteration: whether the neighbor was accepted.
    pub acceptance_history: Vec<bool>,
}

/// Executes the Simulated Annealing algorithm.
///
/// # Usage
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
/// use tsp_metaheur::sa::{SaConfig, SaRunner};
///
/// let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0)]);
/// let config = SaConfig::default()
///     .with_initial_temperature(10.0)
///     .with_final_temperature(0.01)
///     .with_cooling_rate(0.9)
///     .with_seed(42);
/// let result = SaRunner::run(&m, &config).unwrap();
/// assert!((result.best_cost - 14.0).abs() < 1e-9);
/// assert!(result.iterations <= config.max_iterations);
/// ```
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    pub fn run(matrix: &DistanceMatrix, config: &SaConfig) -> Result<SaResult, String> {
        Self::run_with_observer(matrix, config, &mut NoProgress)
    }

    /// Runs SA, reporting a [`Progress`] snapshot every
    /// [`ITERATION_CADENCE`] iterations.
    pub fn run_with_observer<O: ProgressObserver + ?Sized>(
        matrix: &DistanceMatrix,
        config: &SaConfig,
        observer: &mut O,
    ) -> Result<SaResult, String> {
        config.validate()?;
        let n = matrix.len();
        if n < 2 {
            return Err(format!("SA needs at least 2 nodes, got {n}"));
        }

        log::debug!(
            "SA start: {} nodes, T0 {}, Tf {}, {:?} cooling at rate {}, {} iterations/step",
            n,
            config.initial_temperature,
            config.final_temperature,
            config.cooling_schedule,
            config.cooling_rate,
            config.iterations_per_temp
        );

        let mut rng = rng_for(config.seed);

        // Initialize
        let mut current = random_tour(n, &mut rng);
        let mut current_cost = tour_distance(&current, matrix);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;
        let mut reheats = 0usize;
        let mut no_improvement = 0usize;
        let mut early_stopped = false;

        let mut cost_history = vec![best_cost];
        let mut temperature_history = vec![temperature];
        let mut acceptance_history = Vec::new();

        while temperature > config.final_temperature && iterations < config.max_iterations {
            for _ in 0..config.iterations_per_temp {
                if iterations >= config.max_iterations {
                    break;
                }

                let neighbor = neighbor(&current, config.neighbor_move, &mut rng);
                let neighbor_cost = tour_distance(&neighbor, matrix);

                // Metropolis acceptance criterion
                let probability = acceptance_probability(current_cost, neighbor_cost, temperature);
                let accept = rng.random::<f64>() < probability;

                if accept {
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted += 1;

                    if current_cost < best_cost {
                        best.clone_from(&current);
                        best_cost = current_cost;
                        no_improvement = 0;
                    } else {
                        no_improvement += 1;
                    }
                } else {
                    rejected += 1;
                    no_improvement += 1;
                }

                acceptance_history.push(accept);
                iterations += 1;

                if iterations % ITERATION_CADENCE == 0 {
                    log::trace!(
                        "SA iteration {iterations}: best {best_cost:.4}, current {current_cost:.4}, T {temperature:.4}"
                    );
                    observer.on_progress(&Progress {
                        step: iterations,
                        best_cost,
                        avg_cost: None,
                        current_cost: Some(current_cost),
                        temperature: Some(temperature),
                        diversity: None,
                        best_tour: best.clone(),
                    });
                }
            }

            cost_history.push(best_cost);
            temperature_history.push(temperature);

            if config.reheating && no_improvement >= config.reheat_threshold {
                temperature = (temperature * 2.0).min(config.initial_temperature);
                no_improvement = 0;
                reheats += 1;
                log::debug!("SA reheat at iteration {iterations}: T {temperature:.4}");
            }

            if config.early_stop_enabled
                && should_stop_early(
                    &cost_history,
                    config.early_stop_window,
                    config.early_stop_threshold,
                )
            {
                early_stopped = true;
                log::info!("SA early stop at iteration {iterations}");
                break;
            }

            temperature = cool(temperature, config, iterations);
        }

        let evaluated = accepted + rejected;
        let acceptance_rate = if evaluated == 0 {
            0.0
        } else {
            accepted as f64 / evaluated as f64
        };

        log::info!(
            "SA finished: best cost {best_cost:.4} after {iterations} iterations (acceptance {:.1}%)",
            acceptance_rate * 100.0
        );

        Ok(SaResult {
            best_tour: best,
            best_cost,
            iterations,
            final_temperature: temperature,
            accepted,
            rejected,
            acceptance_rate,
            reheats,
            early_stopped,
            cost_history,
            temperature_history,
            acceptance_history,
        })
    }
}

/// Metropolis acceptance probability for moving from `current` to `candidate`.
///
/// Exactly 1.0 for a strictly cheaper candidate, otherwise
/// `exp(-(candidate - current) / temperature)`.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::sa::acceptance_probability;
///
/// assert_eq!(acceptance_probability(10.0, 9.0, 0.5), 1.0);
/// assert!((acceptance_probability(10.0, 12.0, 2.0) - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    if candidate < current {
        return 1.0;
    }
    (-(candidate - current) / temperature).exp()
}

/// Apply the cooling schedule after `iterations` total iterations.
fn cool(temperature: f64, config: &SaConfig, iterations: usize) -> f64 {
    let t0 = config.initial_temperature;
    match config.cooling_schedule {
        CoolingSchedule::Geometric => temperature * config.cooling_rate,
        CoolingSchedule::Linear => {
            t0 - (t0 - config.final_temperature) * iterations as f64 / LINEAR_HORIZON as f64
        }
        CoolingSchedule::Exponential => t0 * config.cooling_rate.powf(iterations as f64),
        CoolingSchedule::Logarithmic => t0 / (iterations as f64 + 2.0).ln(),
    }
}

/// Relative improvement between the first and last entries of the trailing
/// window fell below `threshold`. A window starting at zero cost cannot
/// improve, so it always stops.
fn should_stop_early(history: &[f64], window: usize, threshold: f64) -> bool {
    if history.len() < window {
        return false;
    }
    let recent = &history[history.len() - window..];
    let first = recent[0];
    let last = recent[recent.len() - 1];
    if first <= 0.0 {
        return true;
    }
    (first - last) / first < threshold
}

fn neighbor<R: Rng>(tour: &[usize], mv: NeighborMove, rng: &mut R) -> Tour {
    let mut next = tour.to_vec();
    match mv {
        NeighborMove::TwoOpt => inversion_mutation(&mut next, rng),
        NeighborMove::Swap => swap_mutation(&mut next, rng),
        NeighborMove::Insertion => {
            let from = rng.random_range(0..next.len());
            let to = rng.random_range(0..next.len());
            let city = next.remove(from);
            next.insert(to, city);
        }
    }
    next
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::tour::is_valid_tour;

    fn unit_circle(n: usize) -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (a.cos(), a.sin())
            })
            .collect();
        DistanceMatrix::euclidean(&points)
    }

    fn circle_optimum(n: usize) -> f64 {
        let m = unit_circle(n);
        tour_distance(&(0..n).collect::<Vec<_>>(), &m)
    }

    fn quick_config() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(10.0)
            .with_final_temperature(0.001)
            .with_cooling_rate(0.95)
            .with_iterations_per_temp(100)
            .with_seed(42)
    }

    #[test]
    fn test_sa_finds_circle_optimum() {
        let _ = env_logger::builder().is_test(true).try_init();
        let m = unit_circle(8);
        let result = SaRunner::run(&m, &quick_config()).unwrap();

        assert!(is_valid_tour(&result.best_tour, 8));
        assert!(
            (result.best_cost - circle_optimum(8)).abs() < 1e-9,
            "expected optimum, got {}",
            result.best_cost
        );
        assert!(result.final_temperature <= 0.001);
        assert!(!result.early_stopped);
    }

    #[test]
    fn test_geometric_temperature_strictly_decreases() {
        let m = unit_circle(6);
        let result = SaRunner::run(&m, &quick_config()).unwrap();

        let per_step = &result.temperature_history[1..];
        assert!(per_step.len() > 10);
        for w in per_step.windows(2) {
            assert!(w[1] < w[0], "temperature rose: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_stops_at_final_temperature() {
        let m = unit_circle(5);
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(1.0)
            .with_cooling_rate(0.5)
            .with_iterations_per_temp(10)
            .with_seed(1);

        // 100, 50, 25, 12.5, 6.25, 3.125, 1.5625, then 0.78125 ends the run.
        let result = SaRunner::run(&m, &config).unwrap();
        assert_eq!(result.iterations, 70);
        assert!((result.final_temperature - 0.781_25).abs() < 1e-12);
        assert_eq!(result.cost_history.len(), 8);
        assert_eq!(result.temperature_history.len(), 8);
    }

    #[test]
    fn test_iteration_cap_respected() {
        let m = unit_circle(7);
        let config = SaConfig::default()
            .with_cooling_rate(0.9999)
            .with_iterations_per_temp(100)
            .with_max_iterations(250)
            .with_seed(42);

        let result = SaRunner::run(&m, &config).unwrap();
        assert_eq!(result.iterations, 250);
        assert_eq!(result.acceptance_history.len(), 250);
        assert_eq!(result.accepted + result.rejected, 250);
        // Steps of 100, 100 and a truncated 50.
        assert_eq!(result.cost_history.len(), 4);
    }

    #[test]
    fn test_acceptance_probability() {
        assert_eq!(acceptance_probability(5.0, 4.999, 1e-9), 1.0);
        assert_eq!(acceptance_probability(5.0, 2.0, 1e6), 1.0);
        assert_eq!(acceptance_probability(5.0, 5.0, 1.0), 1.0);
        let p = acceptance_probability(5.0, 6.0, 1.0);
        assert!((p - (-1.0f64).exp()).abs() < 1e-12);
        assert!(acceptance_probability(0.0, 1000.0, 0.01) < 1e-100);
    }

    #[test]
    fn test_early_stop() {
        let m = unit_circle(5);
        let config = SaConfig::default().with_early_stop(0.001, 5).with_seed(3);

        let result = SaRunner::run(&m, &config).unwrap();
        assert!(result.early_stopped);
        // Without early stopping the default cap allows 500 steps.
        assert!(result.cost_history.len() < 501);
        assert!(result.iterations < config.max_iterations);
    }

    #[test]
    fn test_should_stop_early_window() {
        assert!(!should_stop_early(&[10.0, 10.0], 3, 0.01));
        assert!(should_stop_early(&[20.0, 10.0, 10.0, 10.0], 3, 0.01));
        assert!(!should_stop_early(&[20.0, 10.0, 10.0, 10.0], 4, 0.01));
        assert!(should_stop_early(&[0.0, 0.0, 0.0], 3, 0.01));
    }

    #[test]
    fn test_early_stop_on_zero_cost_instance() {
        let m = DistanceMatrix::from_fn(6, |_, _| 0.0);
        let config = SaConfig::default().with_early_stop(0.001, 5).with_seed(1);

        let result = SaRunner::run(&m, &config).unwrap();
        assert!(result.early_stopped);
        assert_eq!(result.best_cost, 0.0);
        assert!(result.iterations < config.max_iterations);
    }

    #[test]
    fn test_reheating() {
        let m = unit_circle(5);
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(1.0)
            .with_cooling_rate(0.9)
            .with_reheating(true)
            .with_reheat_threshold(50)
            .with_max_iterations(5_000)
            .with_seed(9);

        let result = SaRunner::run(&m, &config).unwrap();
        assert!(result.reheats > 0);
        assert!(result.iterations <= 5_000);
        for &t in &result.temperature_history {
            assert!(t <= 100.0);
        }
    }

    #[test]
    fn test_cooling_schedules() {
        let base = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(1.0)
            .with_cooling_rate(0.5);

        let geo = base.clone().with_cooling_schedule(CoolingSchedule::Geometric);
        assert!((cool(40.0, &geo, 1234) - 20.0).abs() < 1e-12);

        let lin = base.clone().with_cooling_schedule(CoolingSchedule::Linear);
        assert!((cool(40.0, &lin, LINEAR_HORIZON / 2) - 50.5).abs() < 1e-9);
        assert!((cool(40.0, &lin, LINEAR_HORIZON) - 1.0).abs() < 1e-9);

        let exp = base.clone().with_cooling_schedule(CoolingSchedule::Exponential);
        assert!((cool(40.0, &exp, 3) - 12.5).abs() < 1e-12);

        let log = base.with_cooling_schedule(CoolingSchedule::Logarithmic);
        assert!((cool(40.0, &log, 0) - 100.0 / 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_all_schedules_and_moves_valid() {
        let m = unit_circle(9);
        for schedule in [
            CoolingSchedule::Geometric,
            CoolingSchedule::Linear,
            CoolingSchedule::Exponential,
            CoolingSchedule::Logarithmic,
        ] {
            for mv in [NeighborMove::TwoOpt, NeighborMove::Swap, NeighborMove::Insertion] {
                let config = SaConfig::default()
                    .with_cooling_schedule(schedule)
                    .with_neighbor_move(mv)
                    .with_max_iterations(2_000)
                    .with_seed(5);
                let result = SaRunner::run(&m, &config).unwrap();
                assert!(is_valid_tour(&result.best_tour, 9), "{schedule:?}/{mv:?}");
                assert!(result.iterations <= 2_000);
                for w in result.cost_history.windows(2) {
                    assert!(w[1] <= w[0]);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let m = unit_circle(10);
        let config = quick_config().with_seed(77);
        let a = SaRunner::run(&m, &config).unwrap();
        let b = SaRunner::run(&m, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_progress_cadence() {
        let m = unit_circle(6);
        let config = SaConfig::default()
            .with_iterations_per_temp(30)
            .with_max_iterations(450)
            .with_seed(2);

        let mut steps = Vec::new();
        let mut observer = |p: &Progress| {
            assert!(p.current_cost.is_some());
            assert!(p.temperature.is_some());
            assert!(p.avg_cost.is_none());
            steps.push(p.step);
        };
        SaRunner::run_with_observer(&m, &config, &mut observer).unwrap();
        assert_eq!(steps, vec![100, 200, 300, 400]);
    }

    #[test]
    fn test_neighbor_moves_stay_permutations() {
        let mut rng = create_rng(4);
        let tour: Vec<usize> = (0..10).collect();
        for mv in [NeighborMove::TwoOpt, NeighborMove::Swap, NeighborMove::Insertion] {
            for _ in 0..100 {
                assert!(is_valid_tour(&neighbor(&tour, mv, &mut rng), 10));
            }
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let m = unit_circle(4);
        assert!(SaRunner::run(&m, &SaConfig::default().with_cooling_rate(1.0)).is_err());
        let single = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        assert!(SaRunner::run(&single, &SaConfig::default()).is_err());
    }
}
