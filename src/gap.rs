//! Semantic skill gap and coverage against an arbitrary skill list.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scoring::round_to;
use crate::scoring::semantic::{SemanticMatch, check_threshold};
use crate::semantic::{EmbeddingGenerator, similarity};

/// Partition of required skills into matched and missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// In input order, with similarity percentages
    pub matched: Vec<SemanticMatch>,
    /// In input order
    pub missing: Vec<String>,
}

impl SkillGap {
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// Coverage band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl CoverageTier {
    /// >= 80 excellent, >= 60 good, otherwise needs improvement.
    pub fn from_percentage(coverage: f64) -> Self {
        if coverage >= 80.0 {
            Self::Excellent
        } else if coverage >= 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent coverage!",
            Self::Good => "Good coverage",
            Self::NeedsImprovement => "Needs improvement",
        }
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCoverage {
    /// Percentage of required skills matched, two decimal places
    pub coverage_percentage: f64,
    pub total_required: usize,
    pub matched_count: usize,
    pub missing_count: usize,
    pub matched: Vec<SemanticMatch>,
    pub missing: Vec<String>,
    pub recommendation: CoverageTier,
}

/// Strength of a single similarity relative to the high/low bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Moderate,
    Weak,
}

impl MatchStrength {
    /// Classify a similarity percentage against fractional `high`/`low` bands.
    pub fn classify(similarity_pct: f64, high: f64, low: f64) -> Self {
        let similarity = similarity_pct / 100.0;
        if similarity >= high {
            Self::Strong
        } else if similarity >= low {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

/// Split `required_skills` by similarity to the resume.
///
/// Duplicate skills collapse to their first occurrence. Blank resume text
/// leaves every skill missing without a model call.
pub fn semantic_skill_gap<S: AsRef<str>>(
    generator: &EmbeddingGenerator,
    resume_text: &str,
    required_skills: &[S],
    threshold: f64,
) -> Result<SkillGap> {
    check_threshold(threshold)?;

    let mut seen = HashSet::new();
    let skills: Vec<&str> = required_skills
        .iter()
        .map(AsRef::as_ref)
        .filter(|skill| seen.insert(*skill))
        .collect();

    if skills.is_empty() {
        return Ok(SkillGap::default());
    }
    if resume_text.trim().is_empty() {
        return Ok(SkillGap {
            matched: Vec::new(),
            missing: skills.iter().map(|skill| (*skill).to_string()).collect(),
        });
    }

    let resume_embedding = generator.embed(resume_text)?;
    let skill_embeddings = generator.embed_many(&skills)?;

    let mut gap = SkillGap::default();
    for (skill, embedding) in skills.into_iter().zip(skill_embeddings) {
        let score = f64::from(similarity(&resume_embedding, &embedding));
        if score >= threshold {
            gap.matched.push(SemanticMatch {
                skill: skill.to_string(),
                similarity: round_to(score * 100.0, 1),
            });
        } else {
            gap.missing.push(skill.to_string());
        }
    }

    Ok(gap)
}

/// Matched skills only, most similar first.
pub fn semantic_match_skills<S: AsRef<str>>(
    generator: &EmbeddingGenerator,
    resume_text: &str,
    required_skills: &[S],
    threshold: f64,
) -> Result<Vec<SemanticMatch>> {
    let mut matched = semantic_skill_gap(generator, resume_text, required_skills, threshold)?.matched;
    matched.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(matched)
}

/// Coverage percentage and band for a required skill list.
pub fn analyze_skill_coverage<S: AsRef<str>>(
    generator: &EmbeddingGenerator,
    resume_text: &str,
    required_skills: &[S],
    threshold: f64,
) -> Result<SkillCoverage> {
    let gap = semantic_skill_gap(generator, resume_text, required_skills, threshold)?;
    let total_required = gap.total();
    let coverage = if total_required == 0 {
        0.0
    } else {
        gap.matched.len() as f64 / total_required as f64 * 100.0
    };
    let coverage_percentage = round_to(coverage, 2);

    Ok(SkillCoverage {
        coverage_percentage,
        total_required,
        matched_count: gap.matched.len(),
        missing_count: gap.missing.len(),
        recommendation: CoverageTier::from_percentage(coverage_percentage),
        matched: gap.matched,
        missing: gap.missing,
    })
}
