//! Distance functions for prototype-based classification

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::{PrototypicalError, Result};

/// Feature truncation applied to query vectors before the Gaussian metric
///
/// The upstream encoder packs extra information into the query embedding;
/// which columns carry the metric features depends on its output convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaussianMode {
    /// Drop the last column (it carries an uncertainty scalar, not a feature)
    Radial,
    /// Use the first half of the columns, drop the second half
    Diagonal,
}

impl GaussianMode {
    /// Width of the metric slice for a query matrix with `n_cols` columns
    pub fn encoded_width(&self, n_cols: usize) -> usize {
        match self {
            GaussianMode::Radial => n_cols.saturating_sub(1),
            GaussianMode::Diagonal => n_cols / 2,
        }
    }
}

/// Compute pairwise squared Euclidean distances between two sets of vectors.
///
/// `x` is n x d, `y` is m x d; the result is n x m with entry (i, j) equal to
/// the squared L2 norm of `x[i] - y[j]`. The square root is deliberately not
/// taken: downstream log-softmax consumes the squared distance as an
/// unnormalized negative log-score.
///
/// Returns a dimension-mismatch error when `x` and `y` disagree on d.
pub fn euclidean_dist(x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
    if x.ncols() != y.ncols() {
        return Err(PrototypicalError::DimensionMismatch {
            left: x.ncols(),
            right: y.ncols(),
        });
    }

    let mut dists = Array2::zeros((x.nrows(), y.nrows()));
    for (i, xi) in x.rows().into_iter().enumerate() {
        for (j, yj) in y.rows().into_iter().enumerate() {
            let diff = &xi - &yj;
            dists[[i, j]] = diff.dot(&diff);
        }
    }

    Ok(dists)
}

/// Compute class-weighted distances between queries and prototypes.
///
/// `x` is (n_classes * n_query) x d_x, `y` is n_classes x d and `inv_sigmas`
/// holds one inverse-variance vector per class, shaped like `y`. Queries are
/// first truncated according to `mode`, then for each class the elementwise
/// difference to that prototype is scaled by the square root of the class
/// inverse variances, and the Euclidean norm of the scaled difference forms
/// the class column of the result.
///
/// Returns a dimension-mismatch error when the truncated query width differs
/// from the prototype dimension, or when `inv_sigmas` is not shaped like `y`.
/// That the query count divides evenly by the class count is an implicit
/// precondition of the episode layout, not checked here.
pub fn gaussian_dist(
    x: &Array2<f64>,
    y: &Array2<f64>,
    inv_sigmas: &Array2<f64>,
    mode: GaussianMode,
) -> Result<Array2<f64>> {
    let width = mode.encoded_width(x.ncols());
    if width != y.ncols() {
        return Err(PrototypicalError::DimensionMismatch {
            left: width,
            right: y.ncols(),
        });
    }
    if inv_sigmas.dim() != y.dim() {
        return Err(PrototypicalError::DimensionMismatch {
            left: inv_sigmas.ncols(),
            right: y.ncols(),
        });
    }

    let x_encoded = x.slice(s![.., ..width]);
    let mut dists = Array2::zeros((x.nrows(), y.nrows()));
    for (j, (proto, sigma)) in y.rows().into_iter().zip(inv_sigmas.rows()).enumerate() {
        let scale = sigma.mapv(f64::sqrt);
        for (i, query) in x_encoded.rows().into_iter().enumerate() {
            let scaled = (&query - &proto) * &scale;
            dists[[i, j]] = scaled.dot(&scaled).sqrt();
        }
    }

    Ok(dists)
}
