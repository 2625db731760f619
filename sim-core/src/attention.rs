//! Attention weight matrices and softmax.

use crate::error::{Error, Result};

/// Tolerance when checking that a row of weights sums to one.
const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Square matrix of attention weights, one row per query token.
#[derive(Clone, Debug, PartialEq)]
pub struct AttentionMatrix {
    n: usize,
    weights: Vec<f64>,
}

/// An edge from the focus token to another token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub target: usize,
    pub weight: f64,
}

impl AttentionMatrix {
    /// Validates that `rows` is square and every row is a distribution.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut weights = Vec::with_capacity(n * n);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(Error::RowSum { row: r, sum });
            }
            weights.extend_from_slice(row);
        }
        Ok(Self { n, weights })
    }

    /// Row-wise softmax of raw scores.
    pub fn from_scores(scores: &[Vec<f64>], temperature: f64) -> Result<Self> {
        let rows: Vec<Vec<f64>> = scores.iter().map(|r| softmax(r, temperature)).collect();
        Self::new(&rows)
    }

    /// Five-token example with a strong diagonal.
    pub fn example() -> Self {
        Self {
            n: 5,
            weights: vec![
                0.8, 0.1, 0.05, 0.03, 0.02, //
                0.1, 0.7, 0.15, 0.03, 0.02, //
                0.05, 0.2, 0.6, 0.1, 0.05, //
                0.03, 0.05, 0.2, 0.65, 0.07, //
                0.02, 0.03, 0.05, 0.15, 0.75,
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.n + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.weights[row * self.n..(row + 1) * self.n]
    }

    /// Tokens other than `source` whose weight exceeds `threshold`.
    pub fn connections(&self, source: usize, threshold: f64) -> Vec<Connection> {
        self.row(source)
            .iter()
            .enumerate()
            .filter(|&(target, &w)| target != source && w > threshold)
            .map(|(target, &weight)| Connection { target, weight })
            .collect()
    }
}

/// Numerically stable softmax of `scores / temperature`.
///
/// A non-positive temperature is treated as the limit towards zero:
/// all mass goes to the first maximum.
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if temperature <= 0.0 {
        let argmax = scores.iter().position(|&s| s == max).unwrap_or(0);
        return (0..scores.len())
            .map(|i| if i == argmax { 1.0 } else { 0.0 })
            .collect();
    }
    let exps: Vec<f64> = scores
        .iter()
        .map(|&s| ((s - max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_rows_are_distributions() {
        let m = AttentionMatrix::example();
        let rows: Vec<Vec<f64>> = (0..m.len()).map(|r| m.row(r).to_vec()).collect();
        assert_eq!(AttentionMatrix::new(&rows).unwrap(), m);
    }

    #[test]
    fn connections_skip_source_and_weak_links() {
        let m = AttentionMatrix::example();
        let c = m.connections(1, 0.05);
        let targets: Vec<usize> = c.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![0, 2]);
        assert_eq!(c[1].weight, 0.15);
    }

    #[test]
    fn rejects_non_square_and_unnormalized_rows() {
        let ragged = vec![vec![1.0, 0.0], vec![1.0]];
        assert!(matches!(
            AttentionMatrix::new(&ragged),
            Err(Error::NotSquare { rows: 2, cols: 1 })
        ));

        let heavy = vec![vec![0.9, 0.9], vec![0.5, 0.5]];
        assert!(matches!(
            AttentionMatrix::new(&heavy),
            Err(Error::RowSum { row: 0, .. })
        ));
    }

    #[test]
    fn softmax_sums_to_one_and_preserves_order() {
        let p = softmax(&[2.0, 1.0, 0.5], 1.0);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn temperature_sharpens_and_flattens() {
        let scores = [2.0, 1.0, 0.5, 0.2, 0.0];
        let cold = softmax(&scores, 0.1);
        let warm = softmax(&scores, 1.5);
        assert!(cold[0] > 0.99);
        assert!(warm[0] < 0.5);
        assert_eq!(softmax(&scores, 0.0), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn from_scores_builds_a_valid_matrix() {
        let scores = [vec![0.0, 0.0], vec![3.0, 0.0]];
        let m = AttentionMatrix::from_scores(&scores, 1.0).unwrap();
        assert!((m.weight(0, 0) - 0.5).abs() < 1e-12);
        assert!(m.weight(1, 0) > m.weight(1, 1));
    }
}
