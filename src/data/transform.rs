//! Deterministic image preprocessing for mini-ImageNet
//!
//! Mirrors the standard evaluation pipeline: resize the shortest side,
//! center-crop, scale to [0, 1] and normalize per channel with the ImageNet
//! statistics.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Side length of the network input in pixels
pub const IMAGE_SIZE: u32 = 84;

/// Per-channel normalization mean (ImageNet statistics)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel normalization standard deviation (ImageNet statistics)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Fixed resize / center-crop / normalize pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTransform {
    /// Target length of the shortest image side after resizing
    pub resize: u32,
    /// Side length of the square center crop
    pub crop: u32,
    /// Per-channel mean subtracted after scaling to [0, 1]
    pub mean: [f32; 3],
    /// Per-channel standard deviation divided out after mean subtraction
    pub std: [f32; 3],
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            resize: IMAGE_SIZE,
            crop: IMAGE_SIZE,
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
        }
    }
}

impl ImageTransform {
    /// Run the full pipeline on a decoded image.
    ///
    /// The image is converted to 3-channel RGB first, so grayscale and alpha
    /// inputs are accepted. The result is a channel-height-width tensor of
    /// normalized f32 values.
    pub fn apply(&self, image: &DynamicImage) -> Array3<f32> {
        let rgb = image.to_rgb8();
        let resized = self.resize_shortest_side(&rgb);
        let cropped = self.center_crop(&resized);
        self.normalize(&cropped)
    }

    /// Scale so the shortest side equals `self.resize`, preserving aspect
    /// ratio, with bilinear filtering.
    fn resize_shortest_side(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let short = width.min(height);
        if short == self.resize {
            return image.clone();
        }

        let scale = f64::from(self.resize) / f64::from(short);
        let new_width = (f64::from(width) * scale).round().max(1.0) as u32;
        let new_height = (f64::from(height) * scale).round().max(1.0) as u32;
        imageops::resize(image, new_width, new_height, FilterType::Triangle)
    }

    fn center_crop(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        let x = width.saturating_sub(self.crop) / 2;
        let y = height.saturating_sub(self.crop) / 2;
        imageops::crop_imm(image, x, y, self.crop, self.crop).to_image()
    }

    fn normalize(&self, image: &RgbImage) -> Array3<f32> {
        let (width, height) = image.dimensions();
        let mut tensor = Array3::zeros((3, height as usize, width as usize));

        for (x, y, pixel) in image.enumerate_pixels() {
            for channel in 0..3 {
                let value = f32::from(pixel.0[channel]) / 255.0;
                tensor[[channel, y as usize, x as usize]] =
                    (value - self.mean[channel]) / self.std[channel];
            }
        }

        tensor
    }
}
