//! Exact, row-major flat index under cosine distance.

use serde::{Deserialize, Serialize};

use imagedb_core::error::{Error, Result};
use imagedb_core::types::{FeatureMatrix, ImageId};

/// One neighbor candidate: corpus id plus cosine distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: ImageId,
    pub distance: f32,
}

/// Brute-force k-NN over the stacked corpus vectors.
///
/// O(N*D) per query, which is the right trade at the corpus sizes this
/// engine serves. Becomes stale the moment the corpus is reloaded; the
/// engine drops it then.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    descriptor: String,
    matrix: FeatureMatrix,
}

impl FlatIndex {
    pub fn new(descriptor: &str, matrix: FeatureMatrix) -> Self {
        Self { descriptor: descriptor.to_string(), matrix }
    }

    /// Name of the strategy the matrix was computed with. Queries must use
    /// the same strategy; cosine distance is meaningless across
    /// differently-preprocessed vectors.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn len(&self) -> usize {
        self.matrix.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.rows() == 0
    }

    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// The nearest rows to `query`: cosine distance ascending, ties broken
    /// by ascending id, truncated to `min(k, N)` entries.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.matrix.dim() {
            return Err(Error::ShapeMismatch {
                descriptor: self.descriptor.clone(),
                expected: self.matrix.dim(),
                got: query.len(),
            });
        }
        let mut neighbors: Vec<Neighbor> = self
            .matrix
            .iter_rows()
            .enumerate()
            .map(|(id, row)| Neighbor { id, distance: cosine_distance(query, row) })
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

/// `1 - cos(a, b)`. A zero-norm vector is maximally distant (1.0) rather
/// than NaN.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}
