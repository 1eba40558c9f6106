//! # Prototypical Networks for Vision
//!
//! This library implements the loss functions and dataset plumbing used for
//! few-shot image classification with prototypical networks.
//!
//! ## Overview
//!
//! Prototypical networks classify a query example by comparing its embedding
//! against one prototype (centroid) per class. An episode consists of a
//! support set, from which the prototypes are built, and a query set that is
//! scored against them. This crate provides:
//!
//! - Pairwise squared-Euclidean and Gaussian-weighted prototype distances
//! - Episode loss (negative log-likelihood over a log-softmax of negated
//!   distances) and arg-max accuracy
//! - A mini-ImageNet dataset adapter that reads a CSV manifest and decodes
//!   images through a fixed resize / center-crop / normalize pipeline
//!
//! Embedding networks, episodic samplers and the training loop itself live in
//! the harness that consumes this crate.
//!
//! ## Modules
//!
//! - `network` - Distance functions, prototype computation and episode losses
//! - `data` - Mini-ImageNet manifest loading and image preprocessing

use thiserror::Error;

pub mod data;
pub mod network;

/// Errors produced by the distance, loss and dataset routines
#[derive(Error, Debug)]
pub enum PrototypicalError {
    /// Two sets of feature vectors disagree on their feature dimension
    #[error("feature dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Manifest file could not be read or a row failed to parse
    #[error(transparent)]
    Manifest(#[from] csv::Error),

    /// Image file could not be opened or decoded
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Underlying I/O failure outside manifest or image decoding
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, PrototypicalError>;

/// Prelude module for convenient imports
pub mod prelude {
    // Network components
    pub use crate::network::{
        compute_prototypes, euclidean_dist, gaussian_dist, gaussian_prototypical_loss,
        prototypical_loss, Criterion, EpisodeMetrics, GaussianMode,
    };

    // Data components
    pub use crate::data::{
        ImageTransform, MiniImageNet, Split, IMAGENET_MEAN, IMAGENET_STD, IMAGE_SIZE,
    };

    pub use crate::{PrototypicalError, Result};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
