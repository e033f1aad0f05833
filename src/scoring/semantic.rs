//! Semantic ATS scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{percent_floor, round_to};
use crate::error::{AtsError, Result};
use crate::semantic::{EmbeddingGenerator, similarity};

/// A skill whose similarity to the resume reached the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticMatch {
    pub skill: String,
    /// Similarity as a percentage, one decimal place
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticScore {
    pub score: u32,
    pub gained_weight: f64,
    pub total_weight: f64,
    pub matches: Vec<SemanticMatch>,
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(AtsError::InvalidThreshold(threshold))
    }
}

/// Score `resume_text` against weighted skills by embedding similarity.
///
/// The resume is embedded once and all skills in one batch. Skills at or
/// above `threshold` contribute their weight. Empty skills or blank text
/// score 0 without touching the model.
pub fn score_semantic(
    generator: &EmbeddingGenerator,
    resume_text: &str,
    weighted_skills: &BTreeMap<String, f64>,
    threshold: f64,
) -> Result<SemanticScore> {
    check_threshold(threshold)?;

    let total_weight: f64 = weighted_skills.values().sum();
    if weighted_skills.is_empty() || resume_text.trim().is_empty() {
        return Ok(SemanticScore {
            total_weight,
            ..SemanticScore::default()
        });
    }

    let resume_embedding = generator.embed(resume_text)?;
    let skills: Vec<(&str, f64)> = weighted_skills
        .iter()
        .map(|(skill, weight)| (skill.as_str(), *weight))
        .collect();
    let names: Vec<&str> = skills.iter().map(|(skill, _)| *skill).collect();
    let skill_embeddings = generator.embed_many(&names)?;

    let mut gained_weight = 0.0;
    let mut matches = Vec::new();
    for ((skill, weight), embedding) in skills.into_iter().zip(skill_embeddings) {
        let score = f64::from(similarity(&resume_embedding, &embedding));
        if score >= threshold {
            gained_weight += weight;
            matches.push(SemanticMatch {
                skill: skill.to_string(),
                similarity: round_to(score * 100.0, 1),
            });
        }
    }

    Ok(SemanticScore {
        score: percent_floor(gained_weight, total_weight),
        gained_weight,
        total_weight,
        matches,
    })
}
