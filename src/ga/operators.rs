//! Permutation crossover and mutation operators for tours.
//!
//! All operators work on `&[usize]` node sequences and preserve the
//! permutation property: every child and every mutated tour visits each
//! node exactly once.
//!
//! # Crossover Operators
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985), preserves absolute position
//! - [`edge_recombination_crossover`] (ERX): Whitley et al. (1989), preserves adjacency
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: Exchange two random positions, O(1)
//! - [`inversion_mutation`]: Reverse a random segment, O(n)
//! - [`scramble_mutation`]: Shuffle a random segment, O(n)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Whitley, Starkweather & Fuquay (1989), "Scheduling Problems and
//!   Traveling Salesmen: The Genetic Edge Recombination Operator"

use super::config::{CrossoverMethod, MutationMethod};
use crate::random::shuffle;
use crate::tour::Tour;
use rand::Rng;

impl CrossoverMethod {
    /// Builds one offspring from `parent1` and `parent2`.
    pub fn apply<R: Rng>(&self, parent1: &[usize], parent2: &[usize], rng: &mut R) -> Tour {
        match self {
            CrossoverMethod::Ox => order_crossover(parent1, parent2, rng),
            CrossoverMethod::Pmx => pmx_crossover(parent1, parent2, rng),
            CrossoverMethod::Erx => edge_recombination_crossover(parent1, parent2, rng),
        }
    }
}

impl MutationMethod {
    /// Perturbs `tour` in place.
    pub fn apply<R: Rng>(&self, tour: &mut [usize], rng: &mut R) {
        match self {
            MutationMethod::Swap => swap_mutation(tour, rng),
            MutationMethod::Inversion => inversion_mutation(tour, rng),
            MutationMethod::Scramble => scramble_mutation(tour, rng),
        }
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Order Crossover (OX).
///
/// # Algorithm (Davis, 1985)
///
/// 1. Select a random segment `[start, end]` from parent1
/// 2. Copy segment to child at the same positions
/// 3. Starting right after the segment and wrapping around, fill the free
///    positions with parent2's nodes in parent2's order (also read from
///    just after the segment), skipping nodes already in the child
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Tour {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return parent1.to_vec();
    }

    let (start, end) = random_segment(n, rng);
    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];

    for i in start..=end {
        child[i] = parent1[i];
        placed[parent1[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let city = parent2[(end + 1 + offset) % n];
        if !placed[city] {
            child[pos] = city;
            placed[city] = true;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Partially Mapped Crossover (PMX).
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Select a random segment `[start, end]` and copy it from parent1
/// 2. For every position outside the segment take parent2's node
/// 3. While that node already sits in the copied segment, replace it with
///    parent2's node at the position the conflicting node holds in parent1
///
/// The chain always leaves the segment, so every position gets a unique
/// node.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn pmx_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Tour {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return parent1.to_vec();
    }

    let (start, end) = random_segment(n, rng);
    let mut position_in_p1 = vec![0usize; n];
    for (i, &city) in parent1.iter().enumerate() {
        position_in_p1[city] = i;
    }

    let mut in_segment = vec![false; n];
    let mut child = vec![usize::MAX; n];
    for i in start..=end {
        child[i] = parent1[i];
        in_segment[parent1[i]] = true;
    }

    for i in (0..start).chain(end + 1..n) {
        let mut city = parent2[i];
        while in_segment[city] {
            city = parent2[position_in_p1[city]];
        }
        child[i] = city;
    }

    child
}

/// Edge Recombination Crossover (ERX).
///
/// # Algorithm (Whitley et al., 1989)
///
/// 1. Build an edge table: for every node, the union of its neighbors in
///    both parents (treated as cycles)
/// 2. Start at parent1's first node
/// 3. Remove the current node from all neighbor lists, then move to the
///    unvisited neighbor with the fewest remaining edges (uniformly random
///    among ties)
/// 4. If the current node has no neighbors left, jump to a uniformly
///    random unvisited node
///
/// # Complexity
/// O(n) expected for the edge table, O(n²) worst case for random jumps
///
/// # Panics
/// Panics if parents have different lengths.
pub fn edge_recombination_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> Tour {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 2 {
        return parent1.to_vec();
    }

    let mut position_in_p2 = vec![0usize; n];
    for (i, &city) in parent2.iter().enumerate() {
        position_in_p2[city] = i;
    }

    // At most 4 distinct neighbors per node.
    let mut edges: Vec<Vec<usize>> = vec![Vec::with_capacity(4); n];
    for (i, &city) in parent1.iter().enumerate() {
        let j = position_in_p2[city];
        let neighbors = [
            parent1[(i + n - 1) % n],
            parent1[(i + 1) % n],
            parent2[(j + n - 1) % n],
            parent2[(j + 1) % n],
        ];
        for nb in neighbors {
            if nb != city && !edges[city].contains(&nb) {
                edges[city].push(nb);
            }
        }
    }

    let mut visited = vec![false; n];
    let mut child = Vec::with_capacity(n);
    let mut current = parent1[0];

    loop {
        visited[current] = true;
        child.push(current);
        if child.len() == n {
            break;
        }

        // The edge table is symmetric, so only current's neighbors list it.
        let neighbors = std::mem::take(&mut edges[current]);
        for &nb in &neighbors {
            edges[nb].retain(|&c| c != current);
        }

        current = if neighbors.is_empty() {
            random_unvisited(&visited, rng)
        } else {
            let fewest = neighbors
                .iter()
                .map(|&c| edges[c].len())
                .min()
                .unwrap_or(0);
            let ties: Vec<usize> = neighbors
                .into_iter()
                .filter(|&c| edges[c].len() == fewest)
                .collect();
            if ties.len() == 1 {
                ties[0]
            } else {
                ties[rng.random_range(0..ties.len())]
            }
        };
    }

    child
}

fn random_unvisited<R: Rng>(visited: &[bool], rng: &mut R) -> usize {
    let unvisited: Vec<usize> = (0..visited.len()).filter(|&c| !visited[c]).collect();
    unvisited[rng.random_range(0..unvisited.len())]
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two random positions.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    tour.swap(i, j);
}

/// Inversion mutation: reverse a random segment.
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn inversion_mutation<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    tour[start..=end].reverse();
}

/// Scramble mutation: Fisher–Yates shuffle of a random segment.
///
/// # Complexity
/// O(n) worst case
pub fn scramble_mutation<R: Rng>(tour: &mut [usize], rng: &mut R) {
    let n = tour.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    shuffle(&mut tour[start..=end], rng);
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
