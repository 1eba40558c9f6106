//! Integration tests for the episode losses and the dataset adapter
//!
//! These tests verify the end-to-end behavior of the library: a full
//! synthetic episode through prototype computation and both loss variants,
//! and a dataset round trip against a manifest tree on disk.

use std::io::Write;

use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use ndarray::{s, Array2};
use prototypical_networks_vision::prelude::*;
use rand::prelude::*;

/// Build a well-separated episode: class centers far apart, small noise.
fn synthetic_episode(
    n_classes: usize,
    n_support: usize,
    n_query: usize,
    n_features: usize,
    seed: u64,
) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut support = Array2::zeros((n_classes * n_support, n_features));
    let mut queries = Array2::zeros((n_classes * n_query, n_features));

    for class in 0..n_classes {
        let center = class as f64 * 10.0;
        for i in 0..n_support {
            for j in 0..n_features {
                support[[class * n_support + i, j]] = center + rng.gen::<f64>() * 0.1;
            }
        }
        for i in 0..n_query {
            for j in 0..n_features {
                queries[[class * n_query + i, j]] = center + rng.gen::<f64>() * 0.1;
            }
        }
    }

    (support, queries)
}

#[test]
fn test_full_episode_euclidean() {
    let (n_classes, n_support, n_query, n_features) = (5, 5, 15, 8);
    let (support, queries) = synthetic_episode(n_classes, n_support, n_query, n_features, 42);

    let prototypes = compute_prototypes(&support, n_classes, n_support);
    assert_eq!(prototypes.dim(), (n_classes, n_features));

    let metrics = prototypical_loss(n_classes, n_query, &prototypes, &queries).unwrap();

    assert_relative_eq!(metrics.accuracy, 1.0, epsilon = 1e-12);
    assert!(metrics.loss >= 0.0);
    assert!(metrics.loss < 1e-6, "loss {} too high for separated classes", metrics.loss);
}

#[test]
fn test_full_episode_gaussian_matches_euclidean_ranking() {
    let (n_classes, n_support, n_query, n_features) = (4, 5, 10, 6);
    // One extra query column that radial mode strips off
    let (support, raw_queries) =
        synthetic_episode(n_classes, n_support, n_query, n_features + 1, 7);

    let prototypes = compute_prototypes(
        &support.slice(s![.., ..n_features]).to_owned(),
        n_classes,
        n_support,
    );
    let inv_sigmas = Array2::ones((n_classes, n_features));

    let metrics = gaussian_prototypical_loss(
        n_classes,
        n_query,
        &prototypes,
        &raw_queries,
        &inv_sigmas,
        GaussianMode::Radial,
        None,
    )
    .unwrap();

    assert_relative_eq!(metrics.accuracy, 1.0, epsilon = 1e-12);
    assert!(metrics.loss.is_finite());
}

#[test]
fn test_gaussian_unit_sigma_reduces_to_euclidean_norm() {
    let x = Array2::from_shape_vec(
        (2, 4),
        vec![1.0, 2.0, 3.0, 0.5, -1.0, 0.0, 2.0, 0.5],
    )
    .unwrap();
    let y = Array2::from_shape_vec((2, 3), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
    let sigmas = Array2::ones((2, 3));

    let gaussian = gaussian_dist(&x, &y, &sigmas, GaussianMode::Radial).unwrap();
    let euclidean = euclidean_dist(&x.slice(s![.., ..3]).to_owned(), &y).unwrap();

    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(gaussian[[i, j]], euclidean[[i, j]].sqrt(), epsilon = 1e-9);
        }
    }
}

/// Write a manifest tree with three solid-color images of uneven sizes and
/// one dangling manifest row whose image file does not exist.
fn write_dataset_tree(root: &std::path::Path) {
    let materials = root.join("materials");
    let data = root.join("data");
    std::fs::create_dir_all(&materials).unwrap();
    std::fs::create_dir_all(&data).unwrap();

    let mut manifest = std::fs::File::create(materials.join("train.csv")).unwrap();
    writeln!(manifest, "filename,label").unwrap();
    writeln!(manifest, "img0.png,n0153282").unwrap();
    writeln!(manifest, "img1.png,n0208915").unwrap();
    writeln!(manifest, "img2.png,n0153282").unwrap();
    writeln!(manifest, "missing.png,n0208915").unwrap();

    let sizes = [(100u32, 90u32), (84, 84), (130, 200)];
    let colors = [[200u8, 10, 10], [10, 200, 10], [10, 10, 200]];
    for (i, (&(w, h), &color)) in sizes.iter().zip(colors.iter()).enumerate() {
        let image = RgbImage::from_pixel(w, h, Rgb(color));
        image.save(data.join(format!("img{i}.png"))).unwrap();
    }
}

#[test]
fn test_dataset_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset_tree(dir.path());

    let dataset = MiniImageNet::new(Split::Train, dir.path()).unwrap();

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.num_classes(), 2);
    assert_eq!(dataset.label(0), 0);
    assert_eq!(dataset.label(1), 1);
    assert_eq!(dataset.label(2), 0);

    for index in 0..3 {
        let (tensor, label) = dataset.get(index).unwrap();
        assert_eq!(tensor.dim(), (3, IMAGE_SIZE as usize, IMAGE_SIZE as usize));
        assert_eq!(label, dataset.label(index));
        assert!(tensor.iter().all(|v| v.is_finite()));
    }

    // The red channel of img0 is 200/255 before normalization
    let (tensor, _) = dataset.get(0).unwrap();
    let expected = (200.0 / 255.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
    assert_relative_eq!(tensor[[0, 40, 40]], expected, epsilon = 1e-4);
}

#[test]
fn test_dataset_missing_image_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset_tree(dir.path());

    let dataset = MiniImageNet::new(Split::Train, dir.path()).unwrap();

    // The dangling entry fails on access
    assert!(dataset.get(3).is_err());

    // Every other entry is unaffected before and after the failure
    assert!(dataset.get(0).is_ok());
    assert!(dataset.get(3).is_err());
    assert!(dataset.get(2).is_ok());
}

#[test]
fn test_custom_transform_size() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset_tree(dir.path());

    let transform = ImageTransform {
        resize: 32,
        crop: 32,
        ..ImageTransform::default()
    };
    let dataset = MiniImageNet::with_transform(Split::Train, dir.path(), transform).unwrap();

    let (tensor, _) = dataset.get(1).unwrap();
    assert_eq!(tensor.dim(), (3, 32, 32));
}
