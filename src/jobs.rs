//! Semantic job recommendation: rank job descriptions by similarity to a
//! resume.

use std::collections::BTreeSet;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AtsError, Result};
use crate::scoring::round_to;
use crate::scoring::semantic::check_threshold;
use crate::semantic::{EmbeddingGenerator, batch_similarity};
use crate::semantic::embeddings::tokenize;

/// Words listed in a match explanation
const EXPLANATION_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub description: String,
}

impl JobDescription {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Load a JSON array of `{ "title", "description" }` objects.
    pub fn load_all(path: &Path) -> Result<Vec<Self>> {
        let raw = std::fs::read_to_string(path).map_err(|source| AtsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    pub description: String,
    /// Similarity percentage, one decimal place
    pub semantic_match: f64,
    pub explanation: String,
}

/// Jobs whose description is at least `threshold` similar to the resume,
/// best first, at most `top_n`.
pub fn recommend_jobs(
    generator: &EmbeddingGenerator,
    resume_text: &str,
    jobs: &[JobDescription],
    top_n: usize,
    threshold: f64,
) -> Result<Vec<JobMatch>> {
    check_threshold(threshold)?;

    if resume_text.trim().is_empty() || jobs.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    let resume_embedding = generator.embed(resume_text)?;
    let descriptions: Vec<&str> = jobs.iter().map(|job| job.description.as_str()).collect();
    let job_embeddings = generator.embed_many(&descriptions)?;
    let scores = batch_similarity(&resume_embedding, &job_embeddings);

    let mut matches: Vec<JobMatch> = jobs
        .iter()
        .zip(scores)
        .filter(|(_, score)| f64::from(*score) >= threshold)
        .map(|(job, score)| JobMatch {
            title: job.title.clone(),
            description: job.description.clone(),
            semantic_match: round_to(f64::from(score) * 100.0, 1),
            explanation: explain_match(resume_text, &job.description),
        })
        .collect();

    matches.sort_by(|a, b| b.semantic_match.total_cmp(&a.semantic_match));
    matches.truncate(top_n);

    debug!(
        candidates = jobs.len(),
        recommended = matches.len(),
        "job recommendation"
    );
    Ok(matches)
}

/// Human-readable reason for a match: shared words, or a generic note when
/// the similarity comes from context alone.
pub fn explain_match(resume_text: &str, job_description: &str) -> String {
    let resume_words: BTreeSet<String> = tokenize(resume_text).into_iter().collect();
    let job_words: BTreeSet<String> = tokenize(job_description).into_iter().collect();

    let shared = resume_words
        .intersection(&job_words)
        .take(EXPLANATION_WORDS)
        .join(", ");

    if shared.is_empty() {
        "Strong semantic similarity based on overall context".to_string()
    } else {
        format!("Matched keywords: {shared}")
    }
}
