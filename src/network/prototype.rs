//! Prototype computation from support-set embeddings

use ndarray::{s, Array1, Array2};

/// Compute one prototype per class as the centroid of its support embeddings.
///
/// `support` is (n_classes * n_support) x d with rows grouped contiguously by
/// class, the same layout the episode losses expect for queries. The result
/// is n_classes x d, row c holding the mean of class c's support rows.
///
/// # Panics
///
/// Panics if `support` has fewer than `n_classes * n_support` rows.
pub fn compute_prototypes(
    support: &Array2<f64>,
    n_classes: usize,
    n_support: usize,
) -> Array2<f64> {
    let dim = support.ncols();
    let mut prototypes = Array2::zeros((n_classes, dim));

    for class in 0..n_classes {
        let block = support.slice(s![class * n_support..(class + 1) * n_support, ..]);
        let mut centroid = Array1::zeros(dim);
        for row in block.rows() {
            centroid += &row;
        }
        prototypes
            .row_mut(class)
            .assign(&(centroid / n_support as f64));
    }

    prototypes
}
