//! Hybrid ATS scoring: keyword and semantic scores fused by weight.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::keyword::{KeywordMatch, KeywordScore, score_keywords};
use super::semantic::{SemanticMatch, score_semantic};
use super::ScoreWeights;
use crate::error::{Result, StructuredError};
use crate::semantic::EmbeddingGenerator;
use crate::taxonomy::Taxonomy;

/// Score band of a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Excellent,
    Good,
    Fair,
    Low,
}

impl RecommendationTier {
    /// >= 80 excellent, >= 60 good, >= 40 fair, otherwise low.
    pub const fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Low,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent match",
            Self::Good => "Good match",
            Self::Fair => "Fair match",
            Self::Low => "Low match",
        }
    }

    pub const fn advice(&self) -> &'static str {
        match self {
            Self::Excellent => "Strong fit for this role; apply with confidence",
            Self::Good => "Solid fit; close the remaining skill gaps to stand out",
            Self::Fair => "Partial fit; add the missing core skills before applying",
            Self::Low => "Weak fit; tailor the resume substantially for this role",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the semantic half took part in a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Hybrid,
    /// Embedding model unavailable; keyword score only
    KeywordOnly,
}

/// Explainable result of one hybrid scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub job_role: String,
    pub final_score: u32,
    pub keyword_score: u32,
    pub semantic_score: u32,
    pub weights: ScoreWeights,
    pub mode: ScoringMode,
    pub similarity_threshold: f64,
    pub matched_core: Vec<KeywordMatch>,
    pub matched_optional: Vec<KeywordMatch>,
    pub missing_core: Vec<String>,
    pub missing_optional: Vec<String>,
    pub semantic_matches: Vec<SemanticMatch>,
    pub recommendation: RecommendationTier,
}

impl ScoreBreakdown {
    fn assemble(
        job_role: &str,
        keyword: KeywordScore,
        semantic_score: u32,
        semantic_matches: Vec<SemanticMatch>,
        weights: ScoreWeights,
        mode: ScoringMode,
        similarity_threshold: f64,
    ) -> Self {
        let final_score = weights.fuse(keyword.score, semantic_score);
        Self {
            job_role: job_role.to_string(),
            final_score,
            keyword_score: keyword.score,
            semantic_score,
            weights,
            mode,
            similarity_threshold,
            matched_core: keyword.matched_core,
            matched_optional: keyword.matched_optional,
            missing_core: keyword.missing_core,
            missing_optional: keyword.missing_optional,
            semantic_matches,
            recommendation: RecommendationTier::from_score(final_score),
        }
    }
}

/// Outcome for one role of a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleComparison {
    pub job_role: String,
    pub final_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    /// Why the role could not be scored; `final_score` is then 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StructuredError>,
}

impl RoleComparison {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Hybrid scorer over a taxonomy and an embedding generator
pub struct HybridScorer<'a> {
    taxonomy: &'a Taxonomy,
    generator: &'a EmbeddingGenerator,
    threshold: f64,
}

impl<'a> HybridScorer<'a> {
    pub fn new(taxonomy: &'a Taxonomy, generator: &'a EmbeddingGenerator, threshold: f64) -> Self {
        Self {
            taxonomy,
            generator,
            threshold,
        }
    }

    /// Keyword score on all tiers plus semantic score on the core tier,
    /// fused as `floor(keyword * kw + semantic * sw)`.
    pub fn score<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
        weights: ScoreWeights,
    ) -> Result<(u32, ScoreBreakdown)> {
        let weights = ScoreWeights::new(weights.keyword, weights.semantic)?;
        let (role_name, role) = self.taxonomy.resolve(job_role)?;

        let keyword = score_keywords(role, resume_skills, resume_text);
        let semantic = score_semantic(self.generator, resume_text, &role.core, self.threshold)?;

        let breakdown = ScoreBreakdown::assemble(
            role_name,
            keyword,
            semantic.score,
            semantic.matches,
            weights,
            ScoringMode::Hybrid,
            self.threshold,
        );
        debug!(
            role = role_name,
            keyword = breakdown.keyword_score,
            semantic = breakdown.semantic_score,
            final_score = breakdown.final_score,
            "hybrid score"
        );
        Ok((breakdown.final_score, breakdown))
    }

    /// Keyword-only breakdown; never touches the embedding model.
    pub fn score_keyword_only<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
    ) -> Result<(u32, ScoreBreakdown)> {
        let (role_name, role) = self.taxonomy.resolve(job_role)?;
        let keyword = score_keywords(role, resume_skills, resume_text);

        let breakdown = ScoreBreakdown::assemble(
            role_name,
            keyword,
            0,
            Vec::new(),
            ScoreWeights::keyword_only(),
            ScoringMode::KeywordOnly,
            self.threshold,
        );
        Ok((breakdown.final_score, breakdown))
    }

    /// Score every role in parallel, best first.
    ///
    /// Invalid weights fail the whole call. A role that fails is reported
    /// with score 0 and its error instead of aborting the comparison. Equal
    /// scores keep the input role order.
    pub fn compare<S, R>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_roles: &[R],
        weights: ScoreWeights,
    ) -> Result<Vec<RoleComparison>>
    where
        S: AsRef<str> + Sync,
        R: AsRef<str> + Sync,
    {
        let weights = ScoreWeights::new(weights.keyword, weights.semantic)?;
        let mut results: Vec<RoleComparison> = job_roles
            .par_iter()
            .map(|role| {
                let role = role.as_ref();
                match self.score(resume_text, resume_skills, role, weights) {
                    Ok((final_score, breakdown)) => RoleComparison {
                        job_role: breakdown.job_role.clone(),
                        final_score,
                        breakdown: Some(breakdown),
                        error: None,
                    },
                    Err(err) => {
                        warn!(role, error = %err, "could not compute ATS score for role");
                        RoleComparison {
                            job_role: role.to_string(),
                            final_score: 0,
                            breakdown: None,
                            error: Some(err.to_structured()),
                        }
                    }
                }
            })
            .collect();

        results.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        Ok(results)
    }
}
