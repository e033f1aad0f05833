//! Process-wide scoring service.
//!
//! [`AtsEngine`] owns the validated config, the role taxonomy and the
//! embedding generator. Construct one per process (or per test) and pass it
//! by reference; the model loads on first semantic call and is released by
//! [`AtsEngine::shutdown`].

use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::error::{ErrorClass, Result};
use crate::gap::{
    MatchStrength, SkillCoverage, SkillGap, analyze_skill_coverage, semantic_match_skills,
    semantic_skill_gap,
};
use crate::jobs::{JobDescription, JobMatch, recommend_jobs};
use crate::report::{AtsReport, build_report};
use crate::scoring::{
    HybridScorer, KeywordScore, RoleComparison, ScoreBreakdown, ScoreWeights, SemanticMatch,
    SemanticScore, improvement_suggestions, score_keywords, score_semantic,
};
use crate::semantic::{CacheStats, Embedder, EmbeddingGenerator};
use crate::taxonomy::Taxonomy;

pub struct AtsEngine {
    config: Config,
    taxonomy: Taxonomy,
    generator: EmbeddingGenerator,
}

impl AtsEngine {
    /// Engine for `config`: taxonomy from `taxonomy.path` (or built-in),
    /// embedding backend per `[embedding]`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let taxonomy = Taxonomy::load(&config.taxonomy)?;
        let generator = EmbeddingGenerator::from_config(&config);
        Ok(Self {
            config,
            taxonomy,
            generator,
        })
    }

    /// Engine from already built parts.
    pub fn from_parts(
        config: Config,
        taxonomy: Taxonomy,
        generator: EmbeddingGenerator,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            taxonomy,
            generator,
        })
    }

    /// Engine with a caller-supplied embedding backend; cache settings still
    /// come from `config`.
    pub fn with_embedder(
        config: Config,
        taxonomy: Taxonomy,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let generator = EmbeddingGenerator::with_embedder(embedder);
        let generator = if config.cache.enabled {
            generator.with_cache_capacity(config.cache.max_entries)
        } else {
            generator.without_cache()
        };
        Self::from_parts(config, taxonomy, generator)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn generator(&self) -> &EmbeddingGenerator {
        &self.generator
    }

    fn scorer(&self) -> HybridScorer<'_> {
        HybridScorer::new(
            &self.taxonomy,
            &self.generator,
            self.config.scoring.similarity_threshold,
        )
    }

    fn weights_or_default(&self, weights: Option<ScoreWeights>) -> Result<ScoreWeights> {
        match weights {
            Some(weights) => ScoreWeights::new(weights.keyword, weights.semantic),
            None => self.config.weights(),
        }
    }

    pub fn available_job_roles(&self) -> Vec<String> {
        self.taxonomy.available_roles()
    }

    pub fn keyword_score<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
    ) -> Result<KeywordScore> {
        let role = self.taxonomy.role(job_role)?;
        Ok(score_keywords(role, resume_skills, resume_text))
    }

    /// Semantic score against the role's core skills.
    pub fn semantic_score(&self, resume_text: &str, job_role: &str) -> Result<SemanticScore> {
        let role = self.taxonomy.role(job_role)?;
        score_semantic(
            &self.generator,
            resume_text,
            &role.core,
            self.config.scoring.similarity_threshold,
        )
    }

    /// Hybrid score; `weights` defaults to the configured pair.
    ///
    /// With `scoring.fallback_to_keyword` set, an unavailable model yields a
    /// keyword-only breakdown instead of an error.
    pub fn hybrid_ats_score<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
        weights: Option<ScoreWeights>,
    ) -> Result<(u32, ScoreBreakdown)> {
        let weights = self.weights_or_default(weights)?;
        let scorer = self.scorer();

        match scorer.score(resume_text, resume_skills, job_role, weights) {
            Err(err)
                if err.class() == ErrorClass::ModelUnavailable
                    && self.config.scoring.fallback_to_keyword =>
            {
                warn!(role = job_role, error = %err, "embedding model unavailable; scoring keywords only");
                scorer.score_keyword_only(resume_text, resume_skills, job_role)
            }
            result => result,
        }
    }

    /// Keyword-only breakdown; never touches the model.
    pub fn keyword_only_score<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
    ) -> Result<(u32, ScoreBreakdown)> {
        self.scorer()
            .score_keyword_only(resume_text, resume_skills, job_role)
    }

    /// Score several roles, best first. Failed roles carry their error.
    pub fn compare_ats_scores<S, R>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_roles: &[R],
        weights: Option<ScoreWeights>,
    ) -> Result<Vec<RoleComparison>>
    where
        S: AsRef<str> + Sync,
        R: AsRef<str> + Sync,
    {
        let weights = self.weights_or_default(weights)?;
        self.scorer()
            .compare(resume_text, resume_skills, job_roles, weights)
    }

    pub fn improvement_suggestions(&self, breakdown: &ScoreBreakdown) -> Vec<String> {
        improvement_suggestions(breakdown)
    }

    /// Skill gap; `threshold` defaults to `scoring.similarity_threshold`.
    pub fn semantic_skill_gap<S: AsRef<str>>(
        &self,
        resume_text: &str,
        required_skills: &[S],
        threshold: Option<f64>,
    ) -> Result<SkillGap> {
        semantic_skill_gap(
            &self.generator,
            resume_text,
            required_skills,
            self.threshold_or_default(threshold),
        )
    }

    pub fn semantic_match_skills<S: AsRef<str>>(
        &self,
        resume_text: &str,
        required_skills: &[S],
        threshold: Option<f64>,
    ) -> Result<Vec<SemanticMatch>> {
        semantic_match_skills(
            &self.generator,
            resume_text,
            required_skills,
            self.threshold_or_default(threshold),
        )
    }

    pub fn analyze_skill_coverage<S: AsRef<str>>(
        &self,
        resume_text: &str,
        required_skills: &[S],
        threshold: Option<f64>,
    ) -> Result<SkillCoverage> {
        analyze_skill_coverage(
            &self.generator,
            resume_text,
            required_skills,
            self.threshold_or_default(threshold),
        )
    }

    /// Strength band of a similarity percentage per the configured high/low
    /// thresholds.
    pub fn match_strength(&self, similarity_pct: f64) -> MatchStrength {
        MatchStrength::classify(
            similarity_pct,
            self.config.scoring.high_similarity_threshold,
            self.config.scoring.low_similarity_threshold,
        )
    }

    /// Full compatibility report for one role. Scoring failures propagate.
    pub fn generate_report<S: AsRef<str>>(
        &self,
        resume_text: &str,
        resume_skills: &[S],
        job_role: &str,
    ) -> Result<AtsReport> {
        let (_, breakdown) = self.hybrid_ats_score(resume_text, resume_skills, job_role, None)?;
        let role = self.taxonomy.role(job_role)?;
        let keywords: Vec<&str> = role.skill_names().collect();
        Ok(build_report(breakdown, resume_text, &keywords))
    }

    pub fn recommend_jobs(
        &self,
        resume_text: &str,
        jobs: &[JobDescription],
        top_n: usize,
        threshold: Option<f64>,
    ) -> Result<Vec<JobMatch>> {
        recommend_jobs(
            &self.generator,
            resume_text,
            jobs,
            top_n,
            self.threshold_or_default(threshold),
        )
    }

    fn threshold_or_default(&self, threshold: Option<f64>) -> f64 {
        threshold.unwrap_or(self.config.scoring.similarity_threshold)
    }

    /// Load the model now instead of on first use.
    pub fn warm_up(&self) -> Result<()> {
        self.generator.warm_up()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.generator.cache_stats()
    }

    /// Release the model and empty the cache. The next semantic call
    /// reloads.
    pub fn shutdown(&self) {
        self.generator.shutdown();
    }
}
