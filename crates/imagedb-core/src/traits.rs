use std::fmt::Debug;

use image::RgbImage;

use crate::error::Result;
use crate::types::FeatureMatrix;

/// A strategy turning one canonical image into a fixed-length feature
/// vector.
///
/// `compute_batch` must keep output row `i` matched to `images[i]` whatever
/// batching or parallelism it uses internally; the index builder relies on
/// that correspondence.
pub trait Descriptor: Send + Sync + Debug {
    /// Registry key for this strategy.
    fn name(&self) -> &str;

    /// Output dimensionality, fixed for the life of the strategy.
    fn dim(&self) -> usize;

    fn compute(&self, image: &RgbImage) -> Result<Vec<f32>>;

    fn compute_batch(&self, images: &[&RgbImage]) -> Result<FeatureMatrix> {
        let mut rows = Vec::with_capacity(images.len());
        for &image in images {
            rows.push(self.compute(image)?);
        }
        FeatureMatrix::from_rows(self.name(), self.dim(), rows)
    }
}

/// External pretrained embedding capability. The engine never owns model
/// weights or inference code; implementations are injected behind this
/// trait, so tests can run against a lightweight stand-in.
///
/// Input batches are preprocessed pixel buffers as produced by the embedding
/// descriptor: one f32 buffer per image, channel-last BGR with the channel
/// means already subtracted. `extract` must return one vector of length
/// `dim()` per input, in input order, and `dim()` must be stable across
/// calls.
pub trait EmbeddingExtractor: Send + Sync {
    fn dim(&self) -> usize;

    fn extract(&self, batch: &[Vec<f32>]) -> anyhow::Result<Vec<Vec<f32>>>;
}
