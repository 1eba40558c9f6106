//! Mini-ImageNet dataset adapter
//!
//! Reads a CSV manifest mapping image filenames to class identifiers and
//! exposes indexed access to (preprocessed tensor, dense label) pairs.
//! Images are decoded lazily on each access; the path and label arrays are
//! read-only after construction, so a clone per external worker is safe.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use super::transform::ImageTransform;
use crate::Result;

/// Dataset split, selecting which manifest file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Classes used for episodic training
    Train,
    /// Held-out classes for validation
    Val,
    /// Held-out classes for final evaluation
    Test,
}

impl Split {
    /// Manifest file stem under the materials directory
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexed collection of mini-ImageNet images with dense integer labels.
///
/// Construction reads `root/materials/{split}.csv`, whose header row is
/// discarded and whose remaining rows are `filename,class_identifier` pairs.
/// Embedded commas are not supported by the manifest format. Class
/// identifiers are interned in first-seen order: the first distinct
/// identifier becomes label 0, the next label 1, and an identifier seen
/// again reuses its earlier label.
#[derive(Debug, Clone)]
pub struct MiniImageNet {
    paths: Vec<PathBuf>,
    labels: Vec<usize>,
    classes: Vec<String>,
    transform: ImageTransform,
}

impl MiniImageNet {
    /// Load the manifest for `split` under `root` with the default transform.
    ///
    /// # Errors
    ///
    /// Returns a manifest error when the CSV file is missing or a row fails
    /// to parse as a two-field record.
    pub fn new(split: Split, root: impl AsRef<Path>) -> Result<Self> {
        Self::with_transform(split, root, ImageTransform::default())
    }

    /// Load the manifest with a caller-provided preprocessing pipeline.
    pub fn with_transform(
        split: Split,
        root: impl AsRef<Path>,
        transform: ImageTransform,
    ) -> Result<Self> {
        let root = root.as_ref();
        let manifest = root.join("materials").join(format!("{split}.csv"));
        let mut reader = csv::Reader::from_path(&manifest)?;

        let mut paths = Vec::new();
        let mut labels = Vec::new();
        let mut classes: Vec<String> = Vec::new();
        let mut class_index: HashMap<String, usize> = HashMap::new();

        for record in reader.deserialize() {
            let (name, class_id): (String, String) = record?;
            let label = match class_index.get(&class_id) {
                Some(&label) => label,
                None => {
                    let label = classes.len();
                    class_index.insert(class_id.clone(), label);
                    classes.push(class_id);
                    label
                }
            };
            paths.push(root.join("data").join(&name));
            labels.push(label);
        }

        debug!(
            "loaded {} manifest: {} entries, {} classes",
            manifest.display(),
            paths.len(),
            classes.len()
        );

        Ok(Self {
            paths,
            labels,
            classes,
            transform,
        })
    }

    /// Number of manifest entries
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the manifest held no entries
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of distinct classes in the manifest
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Raw class identifiers in first-seen (label) order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Dense label of entry `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn label(&self, index: usize) -> usize {
        self.labels[index]
    }

    /// Image path of entry `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn path(&self, index: usize) -> &Path {
        &self.paths[index]
    }

    /// Decode and preprocess entry `index`, returning the normalized tensor
    /// and its dense label.
    ///
    /// # Errors
    ///
    /// Returns an image error when the file is missing or fails to decode.
    /// A failing entry has no effect on any other index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Result<(Array3<f32>, usize)> {
        let image = image::open(&self.paths[index])?;
        Ok((self.transform.apply(&image), self.labels[index]))
    }
}
