pub mod embedding;
pub mod histogram;
pub mod registry;

pub use embedding::{EmbeddingDescriptor, EMBEDDING};
pub use histogram::{ColorHistogram, COLOR_HISTOGRAM};
pub use registry::DescriptorRegistry;
