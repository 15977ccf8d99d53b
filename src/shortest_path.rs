//! All-pairs shortest paths (Floyd–Warshall).
//!
//! Turns a direct-edge cost matrix (`f64::INFINITY` where no edge exists)
//! into the shortest-distance matrix the optimizers consume, together with
//! a successor matrix for path reconstruction.
//!
//! # Complexity
//! O(n³) time, O(n²) space.
//!
//! # Reference
//! Floyd, R. W. (1962), "Algorithm 97: Shortest Path", *CACM* 5(6), 345.

use crate::matrix::DistanceMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output of [`floyd_warshall`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShortestPaths {
    /// Shortest distance for every ordered pair.
    pub dist: DistanceMatrix,
    /// `next[i][j]`: first hop on the shortest `i → j` path, `None` if `j`
    /// is unreachable from `i`.
    pub next: Vec<Vec<Option<usize>>>,
    /// `improved[i][j]` is `true` when an intermediate node beat the direct
    /// edge.
    pub improved: Vec<Vec<bool>>,
}

impl ShortestPaths {
    /// Full node sequence of the shortest `from → to` path.
    pub fn path(&self, from: usize, to: usize) -> Vec<usize> {
        reconstruct_path(&self.next, from, to)
    }

    /// Consumes the result, keeping only the distance matrix.
    pub fn into_distance_matrix(self) -> DistanceMatrix {
        self.dist
    }
}

/// Runs the standard triple loop over `direct` edge costs.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
/// use tsp_metaheur::shortest_path::{floyd_warshall, reconstruct_path};
///
/// let inf = f64::INFINITY;
/// let direct = DistanceMatrix::from_rows(vec![
///     vec![0.0, 3.0, 10.0],
///     vec![inf, 0.0, 3.0],
///     vec![inf, inf, 0.0],
/// ]).unwrap();
/// let sp = floyd_warshall(&direct);
/// assert_eq!(sp.dist.get(0, 2), 6.0);
/// assert_eq!(reconstruct_path(&sp.next, 0, 2), vec![0, 1, 2]);
/// ```
pub fn floyd_warshall(direct: &DistanceMatrix) -> ShortestPaths {
    let n = direct.len();
    let mut dist = direct.clone();
    let mut improved = vec![vec![false; n]; n];
    let mut next: Vec<Vec<Option<usize>>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (direct.get(i, j) < f64::INFINITY).then_some(j))
                .collect()
        })
        .collect();

    for k in 0..n {
        for i in 0..n {
            let via_k = dist.get(i, k);
            if via_k == f64::INFINITY {
                continue;
            }
            for j in 0..n {
                let candidate = via_k + dist.get(k, j);
                if candidate < dist.get(i, j) {
                    dist.set(i, j, candidate);
                    next[i][j] = next[i][k];
                    improved[i][j] = true;
                }
            }
        }
    }

    ShortestPaths {
        dist,
        next,
        improved,
    }
}

/// Walks successor pointers from `from` to `to`.
///
/// Returns the full node sequence including both endpoints, or an empty
/// vector when `next[from][to]` is unset.
pub fn reconstruct_path(next: &[Vec<Option<usize>>], from: usize, to: usize) -> Vec<usize> {
    if next[from][to].is_none() {
        return Vec::new();
    }
    let mut path = vec![from];
    let mut at = from;
    while at != to {
        match next[at][to] {
            // A cycle longer than n would mean a negative loop; stop there.
            Some(hop) if path.len() <= next.len() => {
                at = hop;
                path.push(at);
            }
            _ => return Vec::new(),
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn three_node() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 3.0, 10.0],
            vec![INF, 0.0, 3.0],
            vec![INF, INF, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_relaxes_through_intermediate() {
        let sp = floyd_warshall(&three_node());
        assert_eq!(sp.dist.get(0, 2), 6.0);
        assert_eq!(sp.next[0][2], Some(1));
        assert!(sp.improved[0][2]);
        assert!(!sp.improved[0][1]);
        assert_eq!(reconstruct_path(&sp.next, 0, 2), vec![0, 1, 2]);
    }

    #[test]
    fn test_unreachable_pair_has_no_path() {
        let sp = floyd_warshall(&three_node());
        assert_eq!(sp.dist.get(2, 0), INF);
        assert_eq!(sp.next[2][0], None);
        assert!(sp.path(2, 0).is_empty());
    }

    #[test]
    fn test_path_to_self() {
        let sp = floyd_warshall(&three_node());
        assert_eq!(sp.path(1, 1), vec![1]);
    }

    #[test]
    fn test_longer_chain() {
        // 0 → 1 → 2 → 3 costs 3, direct 0 → 3 costs 100.
        let direct = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, INF, 100.0],
            vec![INF, 0.0, 1.0, INF],
            vec![INF, INF, 0.0, 1.0],
            vec![1.0, INF, INF, 0.0],
        ])
        .unwrap();
        let sp = floyd_warshall(&direct);
        assert_eq!(sp.dist.get(0, 3), 3.0);
        assert_eq!(sp.path(0, 3), vec![0, 1, 2, 3]);
        assert_eq!(sp.dist.get(3, 2), 3.0);
        assert_eq!(sp.path(3, 2), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_into_distance_matrix_is_complete() {
        let direct = DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, INF],
            vec![2.0, 0.0, 5.0],
            vec![INF, 5.0, 0.0],
        ])
        .unwrap();
        let dist = floyd_warshall(&direct).into_distance_matrix();
        assert_eq!(dist.get(0, 2), 7.0);
        assert_eq!(dist.get(2, 0), 7.0);
        assert!(dist.is_symmetric());
    }
}
