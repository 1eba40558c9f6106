//! Dataset loading and image preprocessing
//!
//! This module provides:
//! - The mini-ImageNet manifest dataset with lazy per-access decoding
//! - The fixed resize / center-crop / normalize transform pipeline

mod dataset;
mod transform;

pub use dataset::{MiniImageNet, Split};
pub use transform::{ImageTransform, IMAGENET_MEAN, IMAGENET_STD, IMAGE_SIZE};
