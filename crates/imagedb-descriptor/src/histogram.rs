//! Joint RGB color-histogram descriptor.

use image::RgbImage;
use rayon::prelude::*;

use imagedb_core::error::Result;
use imagedb_core::traits::Descriptor;
use imagedb_core::types::FeatureMatrix;

pub const COLOR_HISTOGRAM: &str = "color_histogram";

/// Bins per channel; the joint histogram has 8^3 = 512 cells.
const BINS_PER_CHANNEL: usize = 8;
/// Right shift mapping a 0-255 channel value onto its bin.
const BIN_SHIFT: u32 = 5;

/// Joint 8x8x8 histogram over raw 0-255 canonical pixels, L2-normalized.
///
/// Operates directly on pixel values with no model-style preprocessing, so
/// it is a pure, deterministic function of the image data. Two normalized
/// histograms compared under cosine similarity land in [0, 1].
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorHistogram;

impl ColorHistogram {
    pub fn new() -> Self {
        Self
    }
}

impl Descriptor for ColorHistogram {
    fn name(&self) -> &str {
        COLOR_HISTOGRAM
    }

    fn dim(&self) -> usize {
        BINS_PER_CHANNEL * BINS_PER_CHANNEL * BINS_PER_CHANNEL
    }

    fn compute(&self, image: &RgbImage) -> Result<Vec<f32>> {
        let mut hist = vec![0f32; self.dim()];
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let cell = ((r >> BIN_SHIFT) as usize * BINS_PER_CHANNEL
                + (g >> BIN_SHIFT) as usize)
                * BINS_PER_CHANNEL
                + (b >> BIN_SHIFT) as usize;
            hist[cell] += 1.0;
        }
        let norm = hist.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut hist {
                *x /= norm;
            }
        }
        Ok(hist)
    }

    fn compute_batch(&self, images: &[&RgbImage]) -> Result<FeatureMatrix> {
        // Ordered collect keeps row i matched to images[i] across workers.
        let rows = images
            .par_iter()
            .map(|&image| self.compute(image))
            .collect::<Result<Vec<_>>>()?;
        FeatureMatrix::from_rows(self.name(), self.dim(), rows)
    }
}
