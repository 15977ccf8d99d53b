//! DE generational loop.

use super::config::{DeConfig, DeCrossover, DeStrategy};
use super::encoding::{to_positions, to_tour};
use crate::matrix::DistanceMatrix;
use crate::progress::{NoProgress, Progress, ProgressObserver, GENERATION_CADENCE};
use crate::random::rng_for;
use crate::tour::{random_tour, repair_tour, Individual, Tour};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chance that a self-adaptive individual resamples `F` (and, separately,
/// `CR`) in a generation.
const RESAMPLE_PROBABILITY: f64 = 0.1;

/// Result of a Differential Evolution run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeResult {
    pub best_tour: Tour,

    pub best_cost: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Trials that replaced their target.
    pub replacements: usize,

    /// Best cost for the initial population, then once per generation.
    pub fitness_history: Vec<f64>,

    /// Mean population cost, same sampling as `fitness_history`.
    pub avg_fitness_history: Vec<f64>,
}

/// Executes Differential Evolution over position-encoded tours.
///
/// Each generation builds one trial per target: donor by the configured
/// strategy, crossover with the target, decode, repair, then greedy
/// one-to-one replacement into the next population.
///
/// # Usage
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
/// use tsp_metaheur::de::{DeConfig, DeRunner};
///
/// let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0)]);
/// let config = DeConfig::default()
///     .with_population_size(20)
///     .with_generations(20)
///     .with_seed(42);
/// let result = DeRunner::run(&m, &config).unwrap();
/// assert_eq!(result.fitness_history.len(), 21);
/// ```
pub struct DeRunner;

impl DeRunner {
    /// Runs DE optimization.
    pub fn run(matrix: &DistanceMatrix, config: &DeConfig) -> Result<DeResult, String> {
        Self::run_with_observer(matrix, config, &mut NoProgress)
    }

    /// Runs DE, reporting a [`Progress`] snapshot every
    /// [`GENERATION_CADENCE`] generations.
    pub fn run_with_observer<O: ProgressObserver + ?Sized>(
        matrix: &DistanceMatrix,
        config: &DeConfig,
        observer: &mut O,
    ) -> Result<DeResult, String> {
        config.validate()?;
        let n = matrix.len();
        if n < 2 {
            return Err(format!("DE needs at least 2 nodes, got {n}"));
        }

        log::debug!(
            "DE start: {} nodes, population {}, {} generations, {:?}/{:?}, F {}, CR {}, self-adaptive {}",
            n,
            config.population_size,
            config.generations,
            config.strategy,
            config.crossover,
            config.f,
            config.cr,
            config.self_adaptive
        );

        let mut rng = rng_for(config.seed);

        let mut population: Vec<Individual> = (0..config.population_size)
            .map(|_| Individual::new(random_tour(n, &mut rng), matrix))
            .collect();

        let mut best = population[best_index(&population)].clone();
        let mut best_positions = to_positions(best.tour());

        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        let mut avg_fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(best.fitness());
        avg_fitness_history.push(average_cost(&population));

        let mut replacements = 0usize;

        for gen in 0..config.generations {
            let mut next_gen = Vec::with_capacity(config.population_size);

            for (i, target) in population.iter().enumerate() {
                let (f, cr) = control_parameters(config, &mut rng);

                let helpers: Vec<Vec<f64>> =
                    pick_helpers(config.population_size, i, config.strategy.helpers(), &mut rng)
                        .into_iter()
                        .map(|idx| to_positions(population[idx].tour()))
                        .collect();
                let target_positions = to_positions(target.tour());

                let donor = donor_vector(
                    config.strategy,
                    f,
                    &target_positions,
                    &best_positions,
                    &helpers,
                );
                let trial_positions = match config.crossover {
                    DeCrossover::Binomial => {
                        binomial_crossover(&target_positions, &donor, cr, &mut rng)
                    }
                    DeCrossover::Exponential => {
                        exponential_crossover(&target_positions, &donor, cr, &mut rng)
                    }
                };

                let trial_tour = repair_tour(&to_tour(&trial_positions), n);
                let trial = Individual::new(trial_tour, matrix);

                if accepts_trial(trial.fitness(), target.fitness()) {
                    replacements += 1;
                    if trial.fitness() < best.fitness() {
                        best = trial.clone();
                        best_positions = to_positions(best.tour());
                    }
                    next_gen.push(trial);
                } else {
                    next_gen.push(target.clone());
                }
            }

            population = next_gen;

            let avg = average_cost(&population);
            fitness_history.push(best.fitness());
            avg_fitness_history.push(avg);

            if gen % GENERATION_CADENCE == 0 {
                log::trace!("DE generation {gen}: best {:.4}, avg {avg:.4}", best.fitness());
                observer.on_progress(&Progress {
                    step: gen,
                    best_cost: best.fitness(),
                    avg_cost: Some(avg),
                    current_cost: None,
                    temperature: None,
                    diversity: None,
                    best_tour: best.tour().to_vec(),
                });
            }
        }

        log::info!(
            "DE finished: best cost {:.4} after {} generations ({} replacements)",
            best.fitness(),
            config.generations,
            replacements
        );

        let best_cost = best.fitness();
        Ok(DeResult {
            best_tour: best.into_tour(),
            best_cost,
            generations: config.generations,
            replacements,
            fitness_history,
            avg_fitness_history,
        })
    }
}

/// Greedy one-to-one selection: ties favor the trial.
#[inline]
fn accepts_trial(trial_cost: f64, target_cost: f64) -> bool {
    trial_cost <= target_cost
}

/// `(F, CR)` for one individual in one generation.
fn control_parameters<R: Rng>(config: &DeConfig, rng: &mut R) -> (f64, f64) {
    let mut f = config.f;
    let mut cr = config.cr;
    if config.self_adaptive {
        if rng.random::<f64>() < RESAMPLE_PROBABILITY {
            f = config.f_lower + rng.random::<f64>() * (config.f_upper - config.f_lower);
        }
        if rng.random::<f64>() < RESAMPLE_PROBABILITY {
            cr = rng.random::<f64>();
        }
    }
    (f, cr)
}

/// `count` distinct indices in `0..population_size`, none equal to `target`.
fn pick_helpers<R: Rng>(
    population_size: usize,
    target: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let idx = rng.random_range(0..population_size);
        if idx != target && !picked.contains(&idx) {
            picked.push(idx);
        }
    }
    picked
}

fn donor_vector(
    strategy: DeStrategy,
    f: f64,
    target: &[f64],
    best: &[f64],
    helpers: &[Vec<f64>],
) -> Vec<f64> {
    match strategy {
        DeStrategy::Rand1 => (0..target.len())
            .map(|j| helpers[0][j] + f * (helpers[1][j] - helpers[2][j]))
            .collect(),
        DeStrategy::Best1 => (0..target.len())
            .map(|j| best[j] + f * (helpers[0][j] - helpers[1][j]))
            .collect(),
        DeStrategy::CurrentToBest1 => (0..target.len())
            .map(|j| {
                target[j] + f * (best[j] - target[j]) + f * (helpers[0][j] - helpers[1][j])
            })
            .collect(),
    }
}

/// Every position draws its Bernoulli(CR) trial; `j_rand` always takes the
/// donor.
fn binomial_crossover<R: Rng>(target: &[f64], donor: &[f64], cr: f64, rng: &mut R) -> Vec<f64> {
    let n = target.len();
    let j_rand = rng.random_range(0..n);
    (0..n)
        .map(|j| {
            let from_donor = rng.random::<f64>() < cr;
            if from_donor || j == j_rand {
                donor[j]
            } else {
                target[j]
            }
        })
        .collect()
}

/// Copies a cyclic donor run starting at a random position. The run always
/// has length at least 1 and at most `n`.
fn exponential_crossover<R: Rng>(
    target: &[f64],
    donor: &[f64],
    cr: f64,
    rng: &mut R,
) -> Vec<f64> {
    let n = target.len();
    let mut trial = target.to_vec();
    let mut j = rng.random_range(0..n);
    let mut copied = 0;
    loop {
        trial[j] = donor[j];
        j = (j + 1) % n;
        copied += 1;
        let extend = rng.random::<f64>() < cr;
        if !extend || copied >= n {
            break;
        }
    }
    trial
}

fn average_cost(population: &[Individual]) -> f64 {
    population.iter().map(Individual::fitness).sum::<f64>() / population.len() as f64
}

fn best_index(population: &[Individual]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness() < population[best].fitness() {
            best = i;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
