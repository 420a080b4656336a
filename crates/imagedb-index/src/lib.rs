//! Exact nearest-neighbor indexing over corpus feature matrices.

pub mod flat;

pub use flat::{cosine_distance, FlatIndex, Neighbor};

use imagedb_core::error::{Error, Result};
use imagedb_core::traits::Descriptor;
use imagedb_core::types::Corpus;

/// Compute the corpus feature matrix through the strategy's batch path and
/// wrap it in an exact index.
///
/// Row `i` of the matrix corresponds to corpus image `i`. Rebuilding over an
/// unchanged corpus yields an identical matrix and identical neighbors for
/// any fixed query.
pub fn build(corpus: &Corpus, descriptor: &dyn Descriptor) -> Result<FlatIndex> {
    if corpus.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    let images: Vec<_> = corpus.images().iter().map(|record| &record.pixels).collect();
    let matrix = descriptor.compute_batch(&images)?;
    Ok(FlatIndex::new(descriptor.name(), matrix))
}
