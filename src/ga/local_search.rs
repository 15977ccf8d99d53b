//! Full 2-opt improvement for GA offspring.
//!
//! # Algorithm
//!
//! For every pair `(i, j)` with `j >= i + 2`, reverse the segment
//! `[i+1..=j]` and keep the reversal if the tour got strictly cheaper.
//! After each accepted move the scan restarts from the beginning; the
//! search ends when a complete scan finds nothing (first-improvement).
//!
//! The tour is re-evaluated in full after each candidate reversal, so the
//! result is exact for asymmetric matrices too.
//!
//! # Complexity
//!
//! O(n³) per scan, since each candidate costs O(n) to evaluate.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::matrix::DistanceMatrix;
use crate::tour::tour_distance;

const EPSILON: f64 = 1e-10;

/// Improves `tour` in place and returns the number of accepted moves.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
/// use tsp_metaheur::ga::two_opt;
///
/// // Square corners visited in a crossing order.
/// let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let mut tour = vec![0, 2, 1, 3];
/// assert!(two_opt(&mut tour, &m) > 0);
/// assert!((tsp_metaheur::tour_distance(&tour, &m) - 4.0).abs() < 1e-9);
/// ```
pub fn two_opt(tour: &mut [usize], matrix: &DistanceMatrix) -> usize {
    let n = tour.len();
    if n < 4 {
        return 0;
    }

    let mut best = tour_distance(tour, matrix);
    let mut moves = 0;

    'scan: loop {
        for i in 0..n - 1 {
            for j in i + 2..n {
                tour[i + 1..=j].reverse();
                let candidate = tour_distance(tour, matrix);
                if candidate < best - EPSILON {
                    best = candidate;
                    moves += 1;
                    continue 'scan;
                }
                tour[i + 1..=j].reverse();
            }
        }
        break;
    }

    moves
}
