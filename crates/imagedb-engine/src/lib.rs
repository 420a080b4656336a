//! The session-owned retrieval engine: corpus, descriptor registry and
//! per-descriptor indexes behind a command/query surface.
//!
//! There is no hidden module-level state; every engine is an explicit value,
//! so independent engines coexist freely (tests lean on this). `load_corpus`
//! and `build_index` take `&mut self` while `search` takes `&self`, so a
//! rebuild can never race a query on the same engine; callers that need both
//! concurrently share the engine behind an `RwLock`.

use std::collections::HashMap;
use std::path::Path;

use image::RgbImage;
use tracing::{debug, info};

use imagedb_core::corpus::{ensure_canonical, load_corpus, load_query_image};
use imagedb_core::error::{Error, Result};
use imagedb_core::types::{Corpus, SearchHit};
use imagedb_descriptor::DescriptorRegistry;
use imagedb_embed::default_extractor;
use imagedb_index::FlatIndex;

/// Result depth used when the caller does not ask for one.
pub const DEFAULT_K: usize = 5;

pub struct ImageSearchEngine {
    corpus: Corpus,
    registry: DescriptorRegistry,
    indexes: HashMap<String, FlatIndex>,
}

impl ImageSearchEngine {
    /// Engine over a caller-assembled registry.
    pub fn new(registry: DescriptorRegistry) -> Self {
        Self {
            corpus: Corpus::new(),
            registry,
            indexes: HashMap::new(),
        }
    }

    /// Engine with both built-in strategies and the default extractor
    /// behind the embedding descriptor.
    pub fn with_default_descriptors() -> Result<Self> {
        Ok(Self::new(DescriptorRegistry::with_defaults(
            default_extractor()?,
        )))
    }

    /// Replace the corpus from a directory.
    ///
    /// Every previously built index is invalidated and ids restart from
    /// zero in the new load order. Returns the number of images loaded.
    pub fn load_corpus(&mut self, dir: &Path) -> Result<usize> {
        let corpus = load_corpus(dir)?;
        self.indexes.clear();
        self.corpus = corpus;
        info!(count = self.corpus.len(), dir = %dir.display(), "corpus replaced");
        Ok(self.corpus.len())
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Whether `name` currently has a built index.
    pub fn is_indexed(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    pub fn index(&self, name: &str) -> Option<&FlatIndex> {
        self.indexes.get(name)
    }

    /// Build (or rebuild) the index for one registered descriptor.
    pub fn build_index(&mut self, name: &str) -> Result<()> {
        let descriptor = self.registry.get(name)?;
        let index = imagedb_index::build(&self.corpus, descriptor.as_ref())?;
        debug!(descriptor = name, rows = index.len(), dim = index.dim(), "index built");
        self.indexes.insert(name.to_string(), index);
        Ok(())
    }

    /// Build every registered descriptor's index.
    pub fn build_all_indexes(&mut self) -> Result<()> {
        for name in self.registry.names() {
            self.build_index(&name)?;
        }
        Ok(())
    }

    /// Top-`k` corpus images most similar to `query` under `name`'s built
    /// index.
    ///
    /// The query vector is computed with exactly the strategy used at build
    /// time. Hits come back sorted by similarity (`1 - cosine distance`)
    /// descending, ties broken by ascending corpus id, `min(k, N)` entries.
    pub fn search(&self, query: &RgbImage, name: &str, k: usize) -> Result<Vec<SearchHit>> {
        let descriptor = self.registry.get(name)?;
        if self.corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let index = self
            .indexes
            .get(name)
            .ok_or_else(|| Error::IndexNotBuilt(name.to_string()))?;

        let query = ensure_canonical(query);
        let query_vec = descriptor.compute(&query)?;
        let neighbors = index.search(&query_vec, k)?;

        let hits = neighbors
            .into_iter()
            .map(|neighbor| {
                let filename = self
                    .corpus
                    .get(neighbor.id)
                    .map(|record| record.filename.clone())
                    .unwrap_or_default();
                SearchHit {
                    id: neighbor.id,
                    filename,
                    similarity: 1.0 - neighbor.distance,
                }
            })
            .collect();
        Ok(hits)
    }

    /// Decode and canonicalize a query file, then `search`.
    pub fn search_file(&self, path: &Path, name: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query = load_query_image(path)?;
        self.search(&query, name, k)
    }
}
