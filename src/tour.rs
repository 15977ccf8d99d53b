//! Tour representation and the permutation primitives shared by all
//! optimizers.
//!
//! A [`Tour`] is a permutation of `0..n` read as a Hamiltonian cycle: the
//! closing edge from the last node back to the first is implicit.

use crate::matrix::DistanceMatrix;
use crate::random::shuffle;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A permutation of node indices visited in order, then back to the start.
pub type Tour = Vec<usize>;

/// A tour paired with its cost.
///
/// The cost is computed once on construction and the tour is never exposed
/// mutably, so the pair stays consistent. Operators build new individuals
/// instead of editing existing ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Individual {
    tour: Tour,
    fitness: f64,
}

impl Individual {
    /// Evaluates `tour` against `matrix`.
    pub fn new(tour: Tour, matrix: &DistanceMatrix) -> Self {
        let fitness = tour_distance(&tour, matrix);
        Self { tour, fitness }
    }

    #[inline]
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Total cycle cost. Lower is better.
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn into_tour(self) -> Tour {
        self.tour
    }
}

/// Total cost of the closed cycle described by `tour`.
///
/// Sums `matrix[tour[i]][tour[i + 1]]` plus the wrap edge from the last node
/// to the first. A single-node tour costs `matrix[t][t]`; an empty tour
/// costs 0.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::{tour_distance, DistanceMatrix};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![1.0, 0.0, 2.0],
///     vec![4.0, 2.0, 0.0],
/// ]).unwrap();
/// assert_eq!(tour_distance(&[0, 1, 2], &m), 7.0);
/// ```
pub fn tour_distance(tour: &[usize], matrix: &DistanceMatrix) -> f64 {
    let (first, last) = match (tour.first(), tour.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return 0.0,
    };
    let open: f64 = tour.windows(2).map(|w| matrix.get(w[0], w[1])).sum();
    open + matrix.get(last, first)
}

/// Uniformly random permutation of `0..n`.
///
/// Fisher–Yates over the identity, drawing only from `rng`.
pub fn random_tour<R: Rng>(n: usize, rng: &mut R) -> Tour {
    let mut tour: Tour = (0..n).collect();
    shuffle(&mut tour, rng);
    tour
}

/// Turns an arbitrary sequence into a permutation of `0..n`.
///
/// Scans left to right keeping the first occurrence of each value. Every
/// later duplicate (and any value `>= n`) is overwritten, in the order
/// encountered, by the smallest value not yet used. The result has length
/// `n`: extra entries are dropped and a short input is padded with the
/// remaining missing values in ascending order.
///
/// Deterministic and idempotent on valid permutations.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::repair_tour;
///
/// assert_eq!(repair_tour(&[2, 2, 0, 2, 4], 5), vec![2, 1, 0, 3, 4]);
/// ```
pub fn repair_tour(seq: &[usize], n: usize) -> Tour {
    let mut used = vec![false; n];
    let mut duplicate_slots = Vec::new();
    let mut tour: Tour = Vec::with_capacity(n);

    for (slot, &city) in seq.iter().take(n).enumerate() {
        if city < n && !used[city] {
            used[city] = true;
        } else {
            duplicate_slots.push(slot);
        }
        tour.push(city);
    }

    let mut missing = (0..n).filter(|&c| !used[c]);
    for slot in duplicate_slots {
        // Each duplicate slot pairs with exactly one unused value.
        if let Some(city) = missing.next() {
            tour[slot] = city;
        }
    }
    tour.extend(missing);
    tour
}

/// Returns `true` if `tour` is a permutation of `0..n`.
pub fn is_valid_tour(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    tour.iter().all(|&c| c < n && !std::mem::replace(&mut seen[c], true))
}

/// Greedy nearest-neighbor tour starting at `start`.
///
/// Repeatedly moves to the cheapest unvisited node; the lowest index wins
/// ties.
pub fn nearest_neighbor_tour(matrix: &DistanceMatrix, start: usize) -> Tour {
    let n = matrix.len();
    let mut tour = Vec::with_capacity(n);
    if n == 0 {
        return tour;
    }
    let mut visited = vec![false; n];
    let mut current = start % n;
    visited[current] = true;
    tour.push(current);

    while tour.len() < n {
        let mut nearest = usize::MAX;
        let mut nearest_cost = f64::INFINITY;
        for (city, &cost) in matrix.row(current).iter().enumerate() {
            if !visited[city] && (nearest == usize::MAX || cost < nearest_cost) {
                nearest = city;
                nearest_cost = cost;
            }
        }
        visited[nearest] = true;
        tour.push(nearest);
        current = nearest;
    }
    tour
}

/// Rotates a cyclic tour so that it begins at `start`.
///
/// The cycle, and therefore its cost, is unchanged. A tour that does not
/// contain `start` is returned as is.
pub fn rotate_to_start(tour: &[usize], start: usize) -> Tour {
    let mut rotated = tour.to_vec();
    if let Some(pos) = tour.iter().position(|&c| c == start) {
        rotated.rotate_left(pos);
    }
    rotated
}
