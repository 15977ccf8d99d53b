//! Square cost matrix shared read-only by every optimizer.
//!
//! Costs may be asymmetric (`get(i, j) != get(j, i)`) and `f64::INFINITY`
//! marks a missing direct edge. Entries are not checked for sign or NaN;
//! a malformed matrix yields degenerate costs rather than an error.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `n × n` matrix of travel costs, stored row-major.
///
/// # Examples
///
/// ```
/// use tsp_metaheur::DistanceMatrix;
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 9.0],
///     vec![1.0, 0.0, 6.0],
///     vec![15.0, 7.0, 0.0],
/// ]).unwrap();
/// assert_eq!(m.len(), 3);
/// assert_eq!(m.get(0, 2), 9.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// Returns `Err` if the rows do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, String> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(format!(
                    "row {i} has {} columns, expected {n} for a square matrix",
                    row.len()
                ));
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Builds a matrix by evaluating `cost(i, j)` for every ordered pair.
    pub fn from_fn<F: FnMut(usize, usize) -> f64>(n: usize, mut cost: F) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(cost(i, j));
            }
        }
        Self { n, data }
    }

    /// Symmetric Euclidean matrix over planar points.
    pub fn euclidean(points: &[(f64, f64)]) -> Self {
        Self::from_fn(points.len(), |i, j| {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            (dx * dx + dy * dy).sqrt()
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cost of the directed edge `from → to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    /// Row `from` as a slice of outgoing costs.
    #[inline]
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.n..(from + 1) * self.n]
    }

    pub(crate) fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.n + to] = cost;
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_square() {
        let m = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 0), 2.0);
        assert_eq!(m.row(1), &[2.0, 0.0]);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert!(err.contains("row 1"), "unexpected message: {err}");
    }

    #[test]
    fn test_euclidean_is_symmetric_with_zero_diagonal() {
        let m = DistanceMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
        assert!(m.is_symmetric());
        assert!((m.get(0, 1) - 5.0).abs() < 1e-12);
        assert!((m.get(0, 2) - 10.0).abs() < 1e-12);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_empty_matrix() {
        let m = DistanceMatrix::from_rows(Vec::new()).unwrap();
        assert!(m.is_empty());
    }
}
