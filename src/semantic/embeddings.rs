//! Embedding backends
//!
//! The default backend is a deterministic hash embedder: signed feature
//! hashing of unigrams and bigrams (FNV-1a keyed, splitmix64 probes). No ML
//! model dependencies. The `local-model` feature adds a sentence-transformer
//! backend through fastembed.

use std::sync::Arc;

use crate::config::EmbeddingConfig;
use crate::error::{AtsError, Result};

/// Pluggable embedding backend interface.
///
/// One call embeds one batch; implementations return vectors in input order,
/// L2-normalized so the inner product equals cosine similarity.
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
    fn dims(&self) -> usize;
    fn name(&self) -> &str;
}

/// Build an embedder from embedding config.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let backend = config.backend.trim().to_lowercase();
    let dims = config.dims as usize;
    if dims == 0 {
        return Err(AtsError::Config(
            "embedding.dims must be greater than 0".to_string(),
        ));
    }

    match backend.as_str() {
        "" | "hash" => Ok(Arc::new(HashEmbedder::new(dims))),
        "local" => build_local(&config.model),
        "api" => Err(AtsError::ModelUnavailable(
            "embedding.backend=api has no client configured".to_string(),
        )),
        other => Err(AtsError::Config(format!(
            "unknown embedding backend: {other}"
        ))),
    }
}

#[cfg(feature = "local-model")]
fn build_local(model: &str) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(local::FastEmbedder::new(model)?))
}

#[cfg(not(feature = "local-model"))]
fn build_local(model: &str) -> Result<Arc<dyn Embedder>> {
    Err(AtsError::ModelUnavailable(format!(
        "local model '{model}' requires building with the `local-model` feature"
    )))
}

/// Words carrying no skill signal.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "i", "in",
    "is", "it", "of", "on", "or", "that", "the", "to", "was", "were", "with",
];

/// Independent bucket probes per feature.
const HASH_PROBES: u64 = 4;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Hash embedder using FNV-1a feature hashing
pub struct HashEmbedder {
    /// Embedding dimension (default: 384)
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embedding dimension
    pub fn dims(&self) -> usize {
        self.dim
    }

    /// Embed text into a unit vector (all zeros when no token survives).
    pub fn embed(&self, text: &str) -> Vec<f32> {
        if self.dim == 0 {
            return Vec::new();
        }

        let tokens = tokenize(text);
        let mut embedding = vec![0.0; self.dim];

        if tokens.is_empty() {
            return embedding;
        }

        for token in &tokens {
            accumulate_embedding(&mut embedding, token, 1.0);
        }

        for window in tokens.windows(2) {
            let bigram = format!("{} {}", window[0], window[1]);
            accumulate_embedding(&mut embedding, &bigram, 0.5);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dims(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(feature = "local-model")]
mod local {
    use parking_lot::Mutex;

    use super::{Embedder, l2_normalize};
    use crate::error::{AtsError, Result};

    /// Sentence-transformer embedder backed by fastembed (ONNX runtime).
    pub struct FastEmbedder {
        model: Mutex<fastembed::TextEmbedding>,
        name: String,
    }

    impl FastEmbedder {
        pub fn new(model_name: &str) -> Result<Self> {
            let model = match model_name {
                "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
                    fastembed::EmbeddingModel::AllMiniLML6V2
                }
                other => {
                    return Err(AtsError::ModelUnavailable(format!(
                        "unsupported local model: {other}"
                    )));
                }
            };
            let options =
                fastembed::InitOptions::new(model).with_show_download_progress(false);
            let embedding = fastembed::TextEmbedding::try_new(options).map_err(|err| {
                AtsError::ModelUnavailable(format!("load {model_name}: {err}"))
            })?;

            Ok(Self {
                model: Mutex::new(embedding),
                name: model_name.to_string(),
            })
        }
    }

    impl Embedder for FastEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            let mut model = self.model.lock();
            let mut vectors = model.embed(texts.to_vec(), None).map_err(|err| {
                AtsError::ModelUnavailable(format!("inference with {}: {err}", self.name))
            })?;
            for vector in &mut vectors {
                l2_normalize(vector);
            }
            Ok(vectors)
        }

        fn dims(&self) -> usize {
            384
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

/// Cosine similarity of two unit vectors (their dot product).
///
/// Vectors of different dimension have no defined similarity and score 0.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    dot_product(a, b)
}

/// Similarity of one query against every corpus vector, in corpus order.
pub fn batch_similarity(query: &[f32], corpus: &[Vec<f32>]) -> Vec<f32> {
    corpus.iter().map(|vector| similarity(query, vector)).collect()
}

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| token.len() >= 2 && !STOPWORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

fn accumulate_embedding(embedding: &mut [f32], feature: &str, weight: f32) {
    let feature_hash = fnv1a_hash(feature.as_bytes());
    let dims = embedding.len() as u64;

    for probe in 0..HASH_PROBES {
        let mixed = splitmix64(feature_hash ^ probe.wrapping_mul(GOLDEN_GAMMA));
        let sign = if mixed & 1 == 0 { weight } else { -weight };
        let dim = ((mixed >> 1) % dims) as usize;
        embedding[dim] += sign;
    }
}

fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

pub(crate) fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
