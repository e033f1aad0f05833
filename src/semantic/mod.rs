//! Embeddings: backends, cache and the cached generator.

pub mod cache;
pub mod embeddings;
pub mod generator;

pub use cache::{CacheStats, EmbeddingCache, cache_key};
pub use embeddings::{Embedder, HashEmbedder, batch_similarity, build_embedder, similarity};
pub use generator::EmbeddingGenerator;
