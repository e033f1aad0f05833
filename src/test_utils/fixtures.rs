use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::{AtsError, Result};
use crate::semantic::{Embedder, HashEmbedder};
use crate::taxonomy::{RoleSkills, Taxonomy};

/// A resume that covers most of the "Data Analyst" role.
pub const DATA_ANALYST_RESUME: &str = "Data analyst with five years of experience in SQL, \
Excel and Python. Built Tableau dashboards for weekly reporting, ran statistics on \
marketing experiments and automated data cleaning pipelines.";

/// A resume with nothing in common with the sample roles.
pub const UNRELATED_RESUME: &str = "Pastry chef specialising in laminated dough, \
sourdough fermentation and wedding cakes.";

fn weighted(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(skill, weight)| ((*skill).to_string(), *weight))
        .collect()
}

/// Small taxonomy with easy-to-reason-about weights.
///
/// - "Python Dev": core python 50, sql 50
/// - "DevOps": core docker 5, kubernetes 5; optional terraform 2
/// - "Data Analyst": core sql 3, excel 2, python 2; optional tableau 1, statistics 1
pub fn sample_taxonomy() -> Taxonomy {
    let mut roles = BTreeMap::new();
    roles.insert(
        "Python Dev".to_string(),
        RoleSkills::new(weighted(&[("python", 50.0), ("sql", 50.0)]), BTreeMap::new()),
    );
    roles.insert(
        "DevOps".to_string(),
        RoleSkills::new(
            weighted(&[("docker", 5.0), ("kubernetes", 5.0)]),
            weighted(&[("terraform", 2.0)]),
        ),
    );
    roles.insert(
        "Data Analyst".to_string(),
        RoleSkills::new(
            weighted(&[("sql", 3.0), ("excel", 2.0), ("python", 2.0)]),
            weighted(&[("tableau", 1.0), ("statistics", 1.0)]),
        ),
    );
    match Taxonomy::new(roles) {
        Ok(taxonomy) => taxonomy,
        Err(err) => panic!("sample taxonomy is invalid: {err}"),
    }
}

/// Hash embedder that counts model invocations and embedded texts.
pub struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dims),
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_batch` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total texts passed across all calls
    pub fn texts_seen(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl Embedder for CountingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Embedder whose model never loads.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(AtsError::ModelUnavailable(
            "test embedder always fails".to_string(),
        ))
    }

    fn dims(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Hash embedder that sleeps before every batch.
pub struct SlowEmbedder {
    inner: HashEmbedder,
    delay: Duration,
}

impl SlowEmbedder {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: HashEmbedder::default(),
            delay,
        }
    }
}

impl Embedder for SlowEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        thread::sleep(self.delay);
        self.inner.embed_batch(texts)
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }

    fn name(&self) -> &str {
        "slow"
    }
}
