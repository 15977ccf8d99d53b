//! Parent selection strategies.
//!
//! All strategies assume **minimization** (lower cost = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use crate::tour::Individual;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::ga::Selection;
///
/// // Tournament of 5 (the default)
/// let sel = Selection::default();
/// assert_eq!(sel, Selection::Tournament(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Selection {
    /// Sample `k` individuals with replacement and keep the cheapest.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Costs are turned into weights `max_cost - cost + 1`, so the cheapest
    /// tour gets the largest slice and the worst still gets weight 1.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,

    /// Linear rank selection.
    ///
    /// Individuals sorted by cost get weight `n - rank`, rank 0 being the
    /// best. Insensitive to the scale of the costs.
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(5)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Individual], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

fn tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

fn roulette<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let max_cost = population
        .iter()
        .map(Individual::fitness)
        .fold(f64::NEG_INFINITY, f64::max);

    let weights: Vec<f64> = population
        .iter()
        .map(|ind| max_cost - ind.fitness() + 1.0)
        .collect();

    let total: f64 = weights.iter().sum();
    // Infinite costs make the weights meaningless; fall back to uniform.
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

fn rank<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .partial_cmp(&population[b].fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // weight_i = n - rank_i, total = n(n+1)/2
    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;

    for (rank, &original_idx) in order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative >= threshold {
            return original_idx;
        }
    }

    order[n - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;
    use crate::random::create_rng;

    /// Individuals whose costs are exactly `costs`: a 2-node tour where
    /// the round trip costs `c`.
    fn make_population(costs: &[f64]) -> Vec<Individual> {
        costs
            .iter()
            .map(|&c| {
                let m = DistanceMatrix::from_rows(vec![vec![0.0, c / 2.0], vec![c / 2.0, 0.0]])
                    .unwrap();
                Individual::new(vec![0, 1], &m)
            })
            .collect()
    }

    fn counts(sel: Selection, pop: &[Individual], draws: usize) -> Vec<u32> {
        let mut rng = create_rng(42);
        let mut counts = vec![0u32; pop.len()];
        for _ in 0..draws {
            counts[sel.select(pop, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let counts = counts(Selection::Tournament(4), &pop, 10_000);
        // P(best in 4 draws with replacement) = 1 - (3/4)^4 ≈ 0.68
        assert!(counts[2] > 6000, "expected best >60%, got {counts:?}");
    }

    #[test]
    fn test_tournament_size_1_is_uniform() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let counts = counts(Selection::Tournament(1), &pop, 10_000);
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_roulette_weights() {
        // Weights: 1, 51, 100, 21 out of 173.
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let counts = counts(Selection::Roulette, &pop, 20_000);
        assert!(counts[2] > counts[1] && counts[1] > counts[3] && counts[3] > counts[0]);
        let best_share = f64::from(counts[2]) / 20_000.0;
        assert!((best_share - 100.0 / 173.0).abs() < 0.03, "best share {best_share}");
    }

    #[test]
    fn test_roulette_equal_costs_uniform() {
        let pop = make_population(&[5.0, 5.0, 5.0, 5.0]);
        for &c in &counts(Selection::Roulette, &pop, 10_000) {
            assert!(c > 2000);
        }
    }

    #[test]
    fn test_rank_weights() {
        // Ranks: idx2 → 4, idx1 → 3, idx3 → 2, idx0 → 1 (of 10).
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let counts = counts(Selection::Rank, &pop, 20_000);
        let best_share = f64::from(counts[2]) / 20_000.0;
        let worst_share = f64::from(counts[0]) / 20_000.0;
        assert!((best_share - 0.4).abs() < 0.03, "best share {best_share}");
        assert!((worst_share - 0.1).abs() < 0.03, "worst share {worst_share}");
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);

        assert_eq!(Selection::Tournament(3).select(&pop, &mut rng), 0);
        assert_eq!(Selection::Roulette.select(&pop, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&pop, &mut rng), 0);
    }

    #[test]
    fn test_roulette_infinite_cost_falls_back() {
        let pop = make_population(&[f64::INFINITY, 3.0, 4.0]);
        let mut rng = create_rng(1);
        for _ in 0..100 {
            assert!(Selection::Roulette.select(&pop, &mut rng) < 3);
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<Individual> = vec![];
        let mut rng = create_rng(42);
        Selection::Tournament(3).select(&pop, &mut rng);
    }
}
