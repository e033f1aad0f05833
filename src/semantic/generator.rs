//! Cached, lazily loaded embedding generator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::cache::{CacheStats, DEFAULT_CACHE_CAPACITY, EmbeddingCache};
use super::embeddings::{Embedder, build_embedder};
use crate::config::Config;
use crate::error::{AtsError, Result};

type Loader = Box<dyn Fn() -> Result<Arc<dyn Embedder>> + Send + Sync>;

/// Produces unit-normalized embeddings, consulting the cache first and
/// batching every miss into one model call.
///
/// The model is loaded on first use and kept until [`shutdown`](Self::shutdown).
pub struct EmbeddingGenerator {
    loader: Loader,
    model: Mutex<Option<Arc<dyn Embedder>>>,
    cache: Option<EmbeddingCache>,
    timeout: Option<Duration>,
}

impl EmbeddingGenerator {
    /// Generator for the configured backend, cache and deadline.
    pub fn from_config(config: &Config) -> Self {
        let embedding = config.embedding.clone();
        let loader: Loader = Box::new(move || build_embedder(&embedding));

        Self {
            loader,
            model: Mutex::new(None),
            cache: config
                .cache
                .enabled
                .then(|| EmbeddingCache::new(config.cache.max_entries)),
            timeout: (config.embedding.timeout_ms > 0)
                .then(|| Duration::from_millis(config.embedding.timeout_ms)),
        }
    }

    /// Generator around an already constructed backend.
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        let loader: Loader = Box::new(move || Ok(Arc::clone(&embedder)));
        Self {
            loader,
            model: Mutex::new(None),
            cache: Some(EmbeddingCache::new(DEFAULT_CACHE_CAPACITY)),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = Some(EmbeddingCache::new(capacity));
        self
    }

    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Bound every model call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Embed one text.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_many(&[text])?
            .pop()
            .ok_or_else(|| AtsError::Internal("embedding batch returned no vector".to_string()))
    }

    /// Embed an ordered sequence of texts; output order matches input order.
    ///
    /// Cached texts are served from the cache. The remaining distinct texts go
    /// to the model in a single call and are cached afterwards.
    pub fn embed_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut pending: Vec<&str> = Vec::new();
        let mut slots: HashMap<&str, Vec<usize>> = HashMap::new();

        for (index, text) in texts.iter().enumerate() {
            let text = text.as_ref();
            if let Some(waiting) = slots.get_mut(text) {
                waiting.push(index);
                continue;
            }
            if let Some(embedding) = self.cache.as_ref().and_then(|cache| cache.get(text)) {
                results[index] = Some(embedding);
                continue;
            }
            slots.insert(text, vec![index]);
            pending.push(text);
        }

        if !pending.is_empty() {
            let model = self.model()?;
            debug!(
                backend = model.name(),
                misses = pending.len(),
                total = texts.len(),
                "embedding batch"
            );
            let vectors = self.invoke(model, &pending)?;
            if vectors.len() != pending.len() {
                return Err(AtsError::Internal(format!(
                    "embedding backend returned {} vectors for {} texts",
                    vectors.len(),
                    pending.len()
                )));
            }

            for (text, vector) in pending.iter().zip(vectors) {
                if let Some(cache) = &self.cache {
                    cache.set(text, vector.clone());
                }
                for &slot in slots.get(text).into_iter().flatten() {
                    results[slot] = Some(vector.clone());
                }
            }
        }

        results
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| AtsError::Internal("embedding slot left unfilled".to_string()))
            })
            .collect()
    }

    /// See [`super::similarity`].
    pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
        super::similarity(a, b)
    }

    /// See [`super::batch_similarity`].
    pub fn batch_similarity(query: &[f32], corpus: &[Vec<f32>]) -> Vec<f32> {
        super::batch_similarity(query, corpus)
    }

    /// Load the model now instead of on the first embedding call.
    pub fn warm_up(&self) -> Result<()> {
        self.model().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.lock().is_some()
    }

    /// Name of the loaded backend, if any.
    pub fn backend_name(&self) -> Option<String> {
        self.model.lock().as_ref().map(|model| model.name().to_string())
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(EmbeddingCache::stats)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Release the model and empty the cache. The next call reloads lazily.
    pub fn shutdown(&self) {
        let released = self.model.lock().take().is_some();
        self.clear_cache();
        if released {
            info!("embedding model released");
        }
    }

    fn model(&self) -> Result<Arc<dyn Embedder>> {
        let mut slot = self.model.lock();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = (self.loader)()?;
        info!(backend = model.name(), dims = model.dims(), "embedding model loaded");
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    fn invoke(&self, model: Arc<dyn Embedder>, batch: &[&str]) -> Result<Vec<Vec<f32>>> {
        let Some(timeout) = self.timeout else {
            return model.embed_batch(batch);
        };

        let owned: Vec<String> = batch.iter().map(|text| (*text).to_string()).collect();
        let (tx, rx) = crossbeam_channel::bounded(1);
        std::thread::Builder::new()
            .name("ats-embed".to_string())
            .spawn(move || {
                let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
                // The receiver is gone once the deadline passed
                let _ = tx.send(model.embed_batch(&refs));
            })
            .map_err(|err| AtsError::Internal(format!("spawn embedding worker: {err}")))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(AtsError::Timeout(format!(
                "embedding call exceeded {}ms",
                timeout.as_millis()
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(AtsError::Internal(
                "embedding worker exited without a result".to_string(),
            )),
        }
    }
}
