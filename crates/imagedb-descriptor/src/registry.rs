//! Typed descriptor registry.

use std::collections::HashMap;
use std::sync::Arc;

use imagedb_core::error::{Error, Result};
use imagedb_core::traits::{Descriptor, EmbeddingExtractor};

use crate::embedding::EmbeddingDescriptor;
use crate::histogram::ColorHistogram;

/// Open mapping from descriptor name to strategy.
///
/// New strategies plug in through `register`; the index builder and engine
/// never change. A lookup miss is a structured `UnknownDescriptor`, not a
/// bare key error.
#[derive(Default, Clone)]
pub struct DescriptorRegistry {
    strategies: HashMap<String, Arc<dyn Descriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both built-in strategies, with `extractor` behind the embedding
    /// descriptor.
    pub fn with_defaults(extractor: Box<dyn EmbeddingExtractor>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ColorHistogram::new()));
        registry.register(Arc::new(EmbeddingDescriptor::new(extractor)));
        registry
    }

    pub fn register(&mut self, strategy: Arc<dyn Descriptor>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Descriptor>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDescriptor(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted for stable iteration.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }
}
