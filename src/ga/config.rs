//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop,
//! including the operator family chosen for each stage.

use super::selection::Selection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Recombination operator used to build an offspring from two parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrossoverMethod {
    /// Order crossover: keeps a block of parent1 and parent2's relative order.
    #[default]
    Ox,
    /// Partially mapped crossover: keeps a block of parent1 and parent2's
    /// absolute positions.
    Pmx,
    /// Edge recombination: keeps the adjacency shared by both parents.
    Erx,
}

/// Perturbation applied to an offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MutationMethod {
    /// Exchange two random positions.
    #[default]
    Swap,
    /// Reverse a random contiguous segment.
    Inversion,
    /// Reshuffle a random contiguous segment.
    Scramble,
}

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use tsp_metaheur::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 500);
/// assert_eq!(config.selection, Selection::Tournament(5));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_metaheur::ga::{CrossoverMethod, GaConfig, MutationMethod, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Rank)
///     .with_crossover(CrossoverMethod::Erx)
///     .with_mutation(MutationMethod::Inversion)
///     .with_adaptive_mutation(true)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to run. The GA never stops earlier.
    pub generations: usize,

    /// Base probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Probability of recombining two parents (0.0–1.0).
    ///
    /// When crossover is not applied, the offspring is a copy of parent1.
    pub crossover_rate: f64,

    /// Number of lowest-cost individuals copied unchanged into the next
    /// generation.
    pub elitism_count: usize,

    /// Parent selection strategy. `Tournament(k)` carries the tournament
    /// size.
    pub selection: Selection,

    pub crossover: CrossoverMethod,

    pub mutation: MutationMethod,

    /// Doubles the mutation rate (capped at 0.5) while diversity is below
    /// [`diversity_threshold`](Self::diversity_threshold).
    pub adaptive_mutation: bool,

    /// Probability of running 2-opt on a fresh offspring (0.0–1.0).
    pub local_search_prob: f64,

    /// Diversity level under which the population counts as converged.
    ///
    /// Drives both adaptive mutation and the restart rule.
    pub diversity_threshold: f64,

    /// Consecutive generations without a new best before a restart is
    /// considered.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.02,
            crossover_rate: 0.8,
            elitism_count: 2,
            selection: Selection::default(),
            crossover: CrossoverMethod::default(),
            mutation: MutationMethod::default(),
            adaptive_mutation: false,
            local_search_prob: 0.1,
            diversity_threshold: 0.1,
            stagnation_limit: 50,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the base mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of elites.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for tournament selection of size `k`.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    pub fn with_crossover(mut self, method: CrossoverMethod) -> Self {
        self.crossover = method;
        self
    }

    pub fn with_mutation(mut self, method: MutationMethod) -> Self {
        self.mutation = method;
        self
    }

    pub fn with_adaptive_mutation(mut self, enabled: bool) -> Self {
        self.adaptive_mutation = enabled;
        self
    }

    /// Sets the 2-opt probability.
    pub fn with_local_search_prob(mut self, p: f64) -> Self {
        self.local_search_prob = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = threshold.max(0.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Mutation probability for a generation with the given diversity.
    pub fn effective_mutation_rate(&self, diversity: f64) -> f64 {
        if self.adaptive_mutation && diversity < self.diversity_threshold {
            (self.mutation_rate * 2.0).min(0.5)
        } else {
            self.mutation_rate
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.elitism_count >= self.population_size {
            return Err(format!(
                "elitism_count ({}) must be less than population_size ({})",
                self.elitism_count, self.population_size
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        for (name, p) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
            ("local_search_prob", self.local_search_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        if self.diversity_threshold < 0.0 {
            return Err("diversity_threshold must be non-negative".into());
        }
        Ok(())
    }
}
