//! Domain types shared by the descriptor, index and engine crates.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical decode size; every corpus and query image is brought to this
/// before any descriptor sees it.
pub const CANONICAL_WIDTH: u32 = 224;
pub const CANONICAL_HEIGHT: u32 = 224;

/// Position of an image in the corpus at load time. Stable until the next
/// corpus reload, which restarts ids from zero.
pub type ImageId = usize;

/// One corpus member: decoded pixels at canonical size, RGB channel order.
#[derive(Debug, Clone)]
pub struct CorpusImage {
    pub id: ImageId,
    pub filename: String,
    pub pixels: RgbImage,
}

/// The loaded, ordered collection of candidate images.
///
/// `images()[i].id == i` always holds. A reload produces a fresh `Corpus`;
/// corpora are replaced wholesale, never merged.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    images: Vec<CorpusImage>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded image; its id is its position.
    pub fn push(&mut self, filename: String, pixels: RgbImage) {
        let id = self.images.len();
        self.images.push(CorpusImage { id, filename, pixels });
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&CorpusImage> {
        self.images.get(id)
    }

    pub fn images(&self) -> &[CorpusImage] {
        &self.images
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|record| record.filename.as_str())
    }
}

/// One ranked answer. `similarity` is `1 - cosine_distance`, higher is
/// better; the scale is descriptor-specific and only comparable within one
/// descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ImageId,
    pub filename: String,
    pub similarity: f32,
}

/// Row-major stacked feature vectors; row `i` belongs to corpus image `i`,
/// an invariant that must survive any batching or parallel computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Stack rows, verifying each row against the declared dimensionality.
    pub fn from_rows(descriptor: &str, dim: usize, rows: Vec<Vec<f32>>) -> Result<Self> {
        let mut data = Vec::with_capacity(dim * rows.len());
        for row in rows {
            if row.len() != dim {
                return Err(Error::ShapeMismatch {
                    descriptor: descriptor.to_string(),
                    expected: dim,
                    got: row.len(),
                });
            }
            data.extend_from_slice(&row);
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn rows(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim.max(1))
    }
}
