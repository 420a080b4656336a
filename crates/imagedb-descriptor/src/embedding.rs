//! Embedding descriptor: preprocessing and batching in front of an injected
//! extractor.

use anyhow::anyhow;
use image::RgbImage;
use rayon::prelude::*;

use imagedb_core::error::{Error, Result};
use imagedb_core::traits::{Descriptor, EmbeddingExtractor};
use imagedb_core::types::FeatureMatrix;

pub const EMBEDDING: &str = "embedding";

/// Channel means subtracted during preprocessing, BGR order. Part of the
/// extractor input contract; see `EmbeddingExtractor`.
const CHANNEL_MEANS_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Wraps an external pretrained extractor behind its documented input
/// contract: canonical RGB images become f32 channel-last BGR buffers with
/// the channel means above subtracted before the batch is handed over.
///
/// This strategy owns preprocessing and batching only; inference belongs to
/// the injected `EmbeddingExtractor`. Note the contrast with the histogram
/// descriptor, which reads raw 0-255 pixels: preprocessing is a
/// per-descriptor contract, since similarities are only ever compared within
/// one descriptor.
pub struct EmbeddingDescriptor {
    extractor: Box<dyn EmbeddingExtractor>,
}

impl std::fmt::Debug for EmbeddingDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingDescriptor")
            .field("dim", &self.extractor.dim())
            .finish()
    }
}

impl EmbeddingDescriptor {
    pub fn new(extractor: Box<dyn EmbeddingExtractor>) -> Self {
        Self { extractor }
    }

    /// f32 BGR pixel buffer with channel means removed, channel-last layout.
    fn preprocess(image: &RgbImage) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(image.len());
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            buffer.push(b as f32 - CHANNEL_MEANS_BGR[0]);
            buffer.push(g as f32 - CHANNEL_MEANS_BGR[1]);
            buffer.push(r as f32 - CHANNEL_MEANS_BGR[2]);
        }
        buffer
    }

    fn check_dim(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.extractor.dim() {
            return Err(Error::ShapeMismatch {
                descriptor: EMBEDDING.to_string(),
                expected: self.extractor.dim(),
                got: vector.len(),
            });
        }
        Ok(())
    }
}

impl Descriptor for EmbeddingDescriptor {
    fn name(&self) -> &str {
        EMBEDDING
    }

    fn dim(&self) -> usize {
        self.extractor.dim()
    }

    fn compute(&self, image: &RgbImage) -> Result<Vec<f32>> {
        let matrix = self.compute_batch(&[image])?;
        Ok(matrix.row(0).to_vec())
    }

    fn compute_batch(&self, images: &[&RgbImage]) -> Result<FeatureMatrix> {
        let batch: Vec<Vec<f32>> = images
            .par_iter()
            .map(|&image| Self::preprocess(image))
            .collect();
        let vectors = self.extractor.extract(&batch)?;
        if vectors.len() != images.len() {
            return Err(Error::Extractor(anyhow!(
                "extractor returned {} vectors for {} images",
                vectors.len(),
                images.len()
            )));
        }
        for vector in &vectors {
            self.check_dim(vector)?;
        }
        FeatureMatrix::from_rows(EMBEDDING, self.extractor.dim(), vectors)
    }
}
