//! Embedding-extractor implementations.
//!
//! The `EmbeddingExtractor` trait lives in `imagedb-core`; this crate ships
//! the deterministic hashing stand-in and the factory that picks the
//! extractor when the caller injects nothing. Pretrained models stay outside
//! the workspace: bring one by implementing the trait and handing it to
//! `EmbeddingDescriptor`.

use std::hash::{Hash, Hasher};

use anyhow::Result;
use tracing::info;
use twox_hash::XxHash64;

use imagedb_core::traits::EmbeddingExtractor;

pub const DEFAULT_EMBED_DIM: usize = 512;

/// Deterministic stand-in for a pretrained extractor.
///
/// Hashes fixed-size blocks of the preprocessed pixel buffer with xxHash and
/// scatters the results into a fixed-dim vector, then L2-normalizes.
/// Identical inputs always produce identical unit vectors, which is all the
/// indexing and ranking tests need from an embedding.
pub struct HashingExtractor {
    dim: usize,
}

impl HashingExtractor {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbeddingExtractor for HashingExtractor {
    fn dim(&self) -> usize {
        self.dim
    }

    fn extract(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(batch.len());
        for buffer in batch {
            let mut v = vec![0f32; self.dim];
            for (block, chunk) in buffer.chunks(64).enumerate() {
                let mut hasher = XxHash64::with_seed(0);
                block.hash(&mut hasher);
                for &x in chunk {
                    x.to_bits().hash(&mut hasher);
                }
                let h = hasher.finish();
                let idx = (h as usize) % self.dim;
                let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
                v[idx] += val;
            }
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
            for x in &mut v {
                *x /= norm;
            }
            out.push(v);
        }
        Ok(out)
    }
}

/// Extractor used when the caller injects nothing: the hashing stand-in at
/// `IMAGEDB_EMBED_DIM` dimensions (default 512). Constructed on demand, so
/// engines that never touch the embedding descriptor pay nothing.
pub fn default_extractor() -> Result<Box<dyn EmbeddingExtractor>> {
    let dim = std::env::var("IMAGEDB_EMBED_DIM")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EMBED_DIM);
    info!(dim, "using hashing extractor");
    Ok(Box::new(HashingExtractor::new(dim)))
}
