//! Real-valued position encoding of tours.
//!
//! Entry `i` of a position vector is the index of the `i`-th visited node
//! within the ascending list of nodes not yet visited (a Lehmer code).
//! Vector arithmetic on these codes yields arbitrary reals; decoding takes
//! `floor(value) mod remaining` with a Euclidean remainder, so every real
//! vector decodes to a valid tour.

use crate::tour::Tour;

/// Encodes `tour` as a position vector.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::de::{to_positions, to_tour};
///
/// let tour = vec![2, 0, 3, 1];
/// let positions = to_positions(&tour);
/// assert_eq!(positions, vec![2.0, 0.0, 1.0, 0.0]);
/// assert_eq!(to_tour(&positions), tour);
/// ```
pub fn to_positions(tour: &[usize]) -> Vec<f64> {
    let mut remaining: Vec<usize> = (0..tour.len()).collect();
    tour.iter()
        .map(|&city| {
            let pos = remaining.iter().position(|&c| c == city).unwrap_or(0);
            remaining.remove(pos);
            pos as f64
        })
        .collect()
}

/// Decodes a position vector into a tour over `0..positions.len()`.
///
/// Non-finite entries select the first remaining node.
pub fn to_tour(positions: &[f64]) -> Tour {
    let mut remaining: Vec<usize> = (0..positions.len()).collect();
    positions
        .iter()
        .map(|&value| {
            let len = remaining.len() as i64;
            let idx = if value.is_finite() {
                (value.floor() as i64).rem_euclid(len)
            } else {
                0
            };
            remaining.remove(idx as usize)
        })
        .collect()
}
