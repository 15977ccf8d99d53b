//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → selection → crossover → mutation → 2-opt → replacement
//! → restart check → repeat, for a fixed number of generations.

use super::config::GaConfig;
use super::local_search::two_opt;
use crate::matrix::DistanceMatrix;
use crate::progress::{NoProgress, Progress, ProgressObserver, GENERATION_CADENCE};
use crate::random::rng_for;
use crate::tour::{nearest_neighbor_tour, random_tour, Individual, Tour};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Share of the initial population seeded with nearest-neighbor tours.
const GREEDY_FRACTION: f64 = 0.2;

/// Number of leading individuals sampled for the diversity measure.
const DIVERSITY_SAMPLE: usize = 20;

/// Relative improvement over the initial best that marks convergence.
const CONVERGENCE_RATIO: f64 = 0.9;

/// Counters and derived figures collected during a GA run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaStatistics {
    /// Offspring produced by recombination.
    pub crossovers: usize,
    /// Offspring that were mutated.
    pub mutations: usize,
    /// Improving 2-opt moves accepted.
    pub local_searches: usize,
    /// Times the population was re-seeded after stagnating.
    pub diversity_restarts: usize,
    /// `(initial_best - best) / initial_best * 100`.
    pub improvement_percent: f64,
    /// First 1-based generation whose best improved on the initial best by
    /// more than 90%.
    pub convergence_generation: Option<usize>,
    /// Diversity after the last generation.
    pub final_diversity: f64,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaResult {
    /// The best tour found during the entire run.
    pub best_tour: Tour,

    /// Cost of [`best_tour`](Self::best_tour).
    pub best_cost: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Best cost in the initial population.
    pub initial_best_cost: f64,

    /// Best cost so far, once for the initial population and once per
    /// generation. Never increases.
    pub fitness_history: Vec<f64>,

    /// Mean population cost, same sampling as `fitness_history`.
    pub avg_fitness_history: Vec<f64>,

    /// Population diversity, same sampling as `fitness_history`.
    pub diversity_history: Vec<f64>,

    pub statistics: GaStatistics,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
/// use tsp_metaheur::ga::{GaConfig, GaRunner};
///
/// let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0)]);
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generations(30)
///     .with_seed(42);
/// let result = GaRunner::run(&m, &config).unwrap();
/// assert!((result.best_cost - 14.0).abs() < 1e-9);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// Returns `Err` if the configuration is invalid or the matrix has
    /// fewer than 2 nodes.
    pub fn run(matrix: &DistanceMatrix, config: &GaConfig) -> Result<GaResult, String> {
        Self::run_with_observer(matrix, config, &mut NoProgress)
    }

    /// Runs the GA, reporting a [`Progress`] snapshot every
    /// [`GENERATION_CADENCE`] generations.
    pub fn run_with_observer<O: ProgressObserver + ?Sized>(
        matrix: &DistanceMatrix,
        config: &GaConfig,
        observer: &mut O,
    ) -> Result<GaResult, String> {
        config.validate()?;
        let n = matrix.len();
        if n < 2 {
            return Err(format!("GA needs at least 2 nodes, got {n}"));
        }

        log::debug!(
            "GA start: {} nodes, population {}, {} generations, {:?}/{:?}/{:?}",
            n,
            config.population_size,
            config.generations,
            config.selection,
            config.crossover,
            config.mutation
        );

        let mut rng = rng_for(config.seed);

        // 1. Initialize population: greedy seeds first, then random tours
        let greedy = (config.population_size as f64 * GREEDY_FRACTION) as usize;
        let mut population: Vec<Individual> = (0..config.population_size)
            .map(|i| {
                let tour = if i < greedy {
                    nearest_neighbor_tour(matrix, i % n)
                } else {
                    random_tour(n, &mut rng)
                };
                Individual::new(tour, matrix)
            })
            .collect();

        let mut best = population[best_index(&population)].clone();
        let initial_best_cost = best.fitness();

        let capacity = config.generations + 1;
        let mut fitness_history = Vec::with_capacity(capacity);
        let mut avg_fitness_history = Vec::with_capacity(capacity);
        let mut diversity_history = Vec::with_capacity(capacity);
        fitness_history.push(initial_best_cost);
        avg_fitness_history.push(average_cost(&population));
        diversity_history.push(population_diversity(&population));

        let mut statistics = GaStatistics::default();
        let mut stagnation_counter = 0usize;
        let mut last_best = f64::INFINITY;

        // 2. Evolutionary loop
        for gen in 0..config.generations {
            let mutation_rate = generation_mutation_rate(config, &population);
            population = next_generation(
                &mut population,
                config,
                mutation_rate,
                matrix,
                &mut statistics,
                &mut rng,
            );

            let i = best_index(&population);
            if population[i].fitness() < best.fitness() {
                best = population[i].clone();
            }

            if best.fitness() == last_best {
                stagnation_counter += 1;
            } else {
                stagnation_counter = 0;
            }
            last_best = best.fitness();

            // Diversity restart
            let diversity = population_diversity(&population);
            if stagnation_counter >= config.stagnation_limit
                && diversity < config.diversity_threshold
            {
                sort_by_cost(&mut population);
                population.truncate(config.elitism_count);
                while population.len() < config.population_size {
                    population.push(Individual::new(random_tour(n, &mut rng), matrix));
                }
                stagnation_counter = 0;
                statistics.diversity_restarts += 1;
                log::info!(
                    "GA diversity restart at generation {} (diversity {:.4})",
                    gen + 1,
                    diversity
                );
            }

            let avg = average_cost(&population);
            fitness_history.push(best.fitness());
            avg_fitness_history.push(avg);
            diversity_history.push(diversity);

            if statistics.convergence_generation.is_none()
                && has_converged(initial_best_cost, best.fitness())
            {
                statistics.convergence_generation = Some(gen + 1);
            }

            if gen % GENERATION_CADENCE == 0 {
                log::trace!("GA generation {gen}: best {:.4}, avg {avg:.4}", best.fitness());
                observer.on_progress(&Progress {
                    step: gen,
                    best_cost: best.fitness(),
                    avg_cost: Some(avg),
                    current_cost: None,
                    temperature: None,
                    diversity: Some(diversity),
                    best_tour: best.tour().to_vec(),
                });
            }
        }

        statistics.improvement_percent = improvement_percent(initial_best_cost, best.fitness());
        statistics.final_diversity = diversity_history.last().copied().unwrap_or(0.0);

        log::info!(
            "GA finished: best cost {:.4} after {} generations ({} restarts)",
            best.fitness(),
            config.generations,
            statistics.diversity_restarts
        );

        let best_cost = best.fitness();
        Ok(GaResult {
            best_tour: best.into_tour(),
            best_cost,
            generations: config.generations,
            initial_best_cost,
            fitness_history,
            avg_fitness_history,
            diversity_history,
            statistics,
        })
    }
}

/// Mean normalized Hamming distance over all pairs of the first 20
/// individuals.
///
/// 0 means the sampled tours are identical; 1 means no two of them agree on
/// any position. Returns 0 for fewer than two individuals.
pub fn population_diversity(population: &[Individual]) -> f64 {
    let sample = &population[..population.len().min(DIVERSITY_SAMPLE)];
    if sample.len() < 2 {
        return 0.0;
    }
    let n = sample[0].tour().len();
    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in sample.iter().enumerate() {
        for b in &sample[i + 1..] {
            let differing = a
                .tour()
                .iter()
                .zip(b.tour())
                .filter(|(x, y)| x != y)
                .count();
            total += differing as f64 / n as f64;
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// Mutation rate for the generation about to be bred from `population`.
///
/// Diversity is sampled from the population in its current order, the same
/// sample the restart rule and the diversity history use.
fn generation_mutation_rate(config: &GaConfig, population: &[Individual]) -> f64 {
    if config.adaptive_mutation {
        config.effective_mutation_rate(population_diversity(population))
    } else {
        config.mutation_rate
    }
}

/// Breeds the next population.
///
/// Sorts `population` by cost, carries the `elitism_count` cheapest over
/// unchanged, and fills the rest with offspring.
fn next_generation<R: Rng>(
    population: &mut [Individual],
    config: &GaConfig,
    mutation_rate: f64,
    matrix: &DistanceMatrix,
    statistics: &mut GaStatistics,
    rng: &mut R,
) -> Vec<Individual> {
    sort_by_cost(population);

    let mut next_gen: Vec<Individual> = population[..config.elitism_count].to_vec();
    while next_gen.len() < config.population_size {
        let p1 = config.selection.select(population, rng);
        let p2 = config.selection.select(population, rng);

        let mut child = if rng.random::<f64>() < config.crossover_rate {
            statistics.crossovers += 1;
            config
                .crossover
                .apply(population[p1].tour(), population[p2].tour(), rng)
        } else {
            population[p1].tour().to_vec()
        };

        if rng.random::<f64>() < mutation_rate {
            config.mutation.apply(&mut child, rng);
            statistics.mutations += 1;
        }

        if rng.random::<f64>() < config.local_search_prob {
            statistics.local_searches += two_opt(&mut child, matrix);
        }

        next_gen.push(Individual::new(child, matrix));
    }
    next_gen
}

fn has_converged(initial_best: f64, best: f64) -> bool {
    initial_best > 0.0 && (initial_best - best) / initial_best > CONVERGENCE_RATIO
}

fn improvement_percent(initial_best: f64, best: f64) -> f64 {
    if initial_best > 0.0 {
        (initial_best - best) / initial_best * 100.0
    } else {
        0.0
    }
}

fn average_cost(population: &[Individual]) -> f64 {
    population.iter().map(Individual::fitness).sum::<f64>() / population.len() as f64
}

/// Sort population by cost (ascending = best first).
fn sort_by_cost(population: &mut [Individual]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Index of the individual with the lowest cost.
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
