//! Episode losses for prototypical networks
//!
//! Scores a query set against per-class prototypes: distances are negated and
//! pushed through a log-softmax over the class axis, the loss is the negative
//! log-likelihood of each query's true class and the accuracy is the fraction
//! of queries whose arg-max class matches it.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::distance::{euclidean_dist, gaussian_dist, GaussianMode};
use crate::Result;

/// Classification criterion signature retained for interface compatibility.
///
/// The Gaussian loss accepts one but never consults it; the log-softmax path
/// below is the only scoring rule.
pub type Criterion = fn(neg_dists: &Array2<f64>, targets: &[usize]) -> f64;

/// Scalar loss and accuracy for one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    /// Mean negative log-likelihood of the true class over all queries
    pub loss: f64,
    /// Fraction of queries whose arg-max class matches the true class
    pub accuracy: f64,
}

/// Row-wise log-softmax, stabilized by subtracting the row maximum.
fn log_softmax_rows(scores: &Array2<f64>) -> Array2<f64> {
    let mut out = scores.to_owned();
    for mut row in out.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let log_sum = row.iter().map(|&v| (v - max).exp()).sum::<f64>().ln() + max;
        row.mapv_inplace(|v| v - log_sum);
    }
    out
}

/// Derive loss and accuracy from per-query class log-probabilities.
///
/// Query row i belongs to class i / n_query: queries arrive grouped
/// contiguously by class, so the target index is recomputed from position.
/// Ties in the arg-max resolve to the lowest class index.
fn score_episode(n_classes: usize, n_query: usize, log_p: &Array2<f64>) -> EpisodeMetrics {
    let n_total = n_classes * n_query;
    let mut nll_sum = 0.0;
    let mut n_correct = 0usize;

    for i in 0..n_total {
        let target = i / n_query;
        let row = log_p.row(i);
        nll_sum -= row[target];

        let mut predicted = 0;
        for (class, &log_prob) in row.iter().enumerate() {
            if log_prob > row[predicted] {
                predicted = class;
            }
        }
        if predicted == target {
            n_correct += 1;
        }
    }

    EpisodeMetrics {
        loss: nll_sum / n_total as f64,
        accuracy: n_correct as f64 / n_total as f64,
    }
}

/// Prototypical loss over squared Euclidean distances.
///
/// `prototypes` is n_classes x d, `queries` is (n_classes * n_query) x d with
/// queries grouped contiguously by class (all of class 0 first, then class 1,
/// and so on). Returns the episode loss and accuracy.
///
/// # Errors
///
/// Propagates the dimension-mismatch error from [`euclidean_dist`] when
/// prototypes and queries disagree on the feature dimension.
///
/// # Panics
///
/// Panics if `queries` has fewer than `n_classes * n_query` rows.
pub fn prototypical_loss(
    n_classes: usize,
    n_query: usize,
    prototypes: &Array2<f64>,
    queries: &Array2<f64>,
) -> Result<EpisodeMetrics> {
    let dists = euclidean_dist(queries, prototypes)?;
    let log_p = log_softmax_rows(&-&dists);
    Ok(score_episode(n_classes, n_query, &log_p))
}

/// Prototypical loss over Gaussian-weighted distances.
///
/// Identical scoring to [`prototypical_loss`], fed by [`gaussian_dist`] with
/// the given per-class inverse variances and truncation `mode`. `_criterion`
/// is vestigial: accepted for interface compatibility, never used.
///
/// # Errors
///
/// Propagates the dimension-mismatch error from [`gaussian_dist`].
///
/// # Panics
///
/// Panics if `queries` has fewer than `n_classes * n_query` rows.
pub fn gaussian_prototypical_loss(
    n_classes: usize,
    n_query: usize,
    prototypes: &Array2<f64>,
    queries: &Array2<f64>,
    inv_sigmas: &Array2<f64>,
    mode: GaussianMode,
    _criterion: Option<Criterion>,
) -> Result<EpisodeMetrics> {
    let dists = gaussian_dist(queries, prototypes, inv_sigmas, mode)?;
    let log_p = log_softmax_rows(&-&dists);
    Ok(score_episode(n_classes, n_query, &log_p))
}
