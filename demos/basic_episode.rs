//! Basic episode scoring example
//!
//! Demonstrates the core flow of the library:
//! 1. Computing prototypes from a support set
//! 2. Scoring queries with the Euclidean prototypical loss
//! 3. Scoring the same episode with the Gaussian-weighted variant
//!
//! Run with: cargo run --example basic_episode

use ndarray::{s, Array2};
use prototypical_networks_vision::prelude::*;
use rand::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    // Episode configuration
    let n_classes = 5; // N-way
    let n_support = 5; // K-shot
    let n_query = 15; // queries per class
    let n_features = 16; // embedding dimension

    println!("=== Prototypical episode scoring ===\n");
    println!(
        "1. Generating a synthetic {}-way {}-shot episode with {} queries per class...",
        n_classes, n_support, n_query
    );
    let (support, queries) = synthetic_episode(n_classes, n_support, n_query, n_features);
    println!(
        "   - Support set: {} samples x {} features",
        support.nrows(),
        support.ncols()
    );
    println!(
        "   - Query set: {} samples x {} features\n",
        queries.nrows(),
        queries.ncols()
    );

    println!("2. Computing class prototypes...");
    let prototypes = compute_prototypes(&support, n_classes, n_support);
    println!("   - Prototypes shape: {:?}\n", prototypes.dim());

    println!("3. Euclidean prototypical loss...");
    let metrics = prototypical_loss(n_classes, n_query, &prototypes, &queries)?;
    println!("   - loss: {:.6}", metrics.loss);
    println!("   - accuracy: {:.2}%\n", metrics.accuracy * 100.0);

    println!("4. Gaussian-weighted variant (radial truncation, unit sigmas)...");
    // Append one uncertainty column that radial mode strips off again
    let mut raw_queries = Array2::zeros((queries.nrows(), n_features + 1));
    raw_queries
        .slice_mut(s![.., ..n_features])
        .assign(&queries);
    let inv_sigmas = Array2::ones((n_classes, n_features));
    let gaussian = gaussian_prototypical_loss(
        n_classes,
        n_query,
        &prototypes,
        &raw_queries,
        &inv_sigmas,
        GaussianMode::Radial,
        None,
    )?;
    println!("   - loss: {:.6}", gaussian.loss);
    println!("   - accuracy: {:.2}%", gaussian.accuracy * 100.0);

    Ok(())
}

/// Generate class-separated support and query features.
fn synthetic_episode(
    n_classes: usize,
    n_support: usize,
    n_query: usize,
    n_features: usize,
) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(1234);

    let mut support = Array2::zeros((n_classes * n_support, n_features));
    let mut queries = Array2::zeros((n_classes * n_query, n_features));

    for class in 0..n_classes {
        let center = class as f64 * 3.0;
        for i in 0..n_support {
            for j in 0..n_features {
                support[[class * n_support + i, j]] = center + rng.gen::<f64>() * 0.5;
            }
        }
        for i in 0..n_query {
            for j in 0..n_features {
                queries[[class * n_query + i, j]] = center + rng.gen::<f64>() * 0.5;
            }
        }
    }

    (support, queries)
}
