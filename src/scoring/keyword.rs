//! Keyword ATS scoring.
//!
//! A taxonomy skill counts as matched when it is in the extracted skill list
//! or occurs as a substring of the lowercased resume text. Either way its
//! weight is added once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::percent_floor;
use crate::taxonomy::{RoleSkills, normalize_skill};

/// How a skill was found in the resume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    SkillList,
    ResumeText,
    Both,
}

impl MatchSource {
    fn from_flags(in_list: bool, in_text: bool) -> Option<Self> {
        match (in_list, in_text) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::SkillList),
            (false, true) => Some(Self::ResumeText),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub skill: String,
    pub weight: f64,
    pub source: MatchSource,
}

/// Keyword score with per-tier matched and missing skills
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub score: u32,
    pub matched_weight: f64,
    pub total_weight: f64,
    pub matched_core: Vec<KeywordMatch>,
    pub matched_optional: Vec<KeywordMatch>,
    pub missing_core: Vec<String>,
    pub missing_optional: Vec<String>,
}

impl KeywordScore {
    pub fn matched_skill_count(&self) -> usize {
        self.matched_core.len() + self.matched_optional.len()
    }
}

/// Score `resume_skills` and `resume_text` against one role's tiers.
///
/// A role with zero total weight scores 0 with an empty breakdown.
pub fn score_keywords<S: AsRef<str>>(
    role: &RoleSkills,
    resume_skills: &[S],
    resume_text: &str,
) -> KeywordScore {
    let total_weight = role.total_weight();
    if total_weight <= 0.0 {
        return KeywordScore::default();
    }

    let skill_set: HashSet<String> = resume_skills
        .iter()
        .map(|skill| normalize_skill(skill.as_ref()))
        .filter(|skill| !skill.is_empty())
        .collect();
    let text = normalize_skill(resume_text);

    let mut result = KeywordScore {
        total_weight,
        ..KeywordScore::default()
    };

    for (skill, weight) in &role.core {
        match find(skill, &skill_set, &text) {
            Some(source) => {
                result.matched_weight += weight;
                result.matched_core.push(KeywordMatch {
                    skill: skill.clone(),
                    weight: *weight,
                    source,
                });
            }
            None => result.missing_core.push(skill.clone()),
        }
    }

    for (skill, weight) in &role.optional {
        match find(skill, &skill_set, &text) {
            Some(source) => {
                result.matched_weight += weight;
                result.matched_optional.push(KeywordMatch {
                    skill: skill.clone(),
                    weight: *weight,
                    source,
                });
            }
            None => result.missing_optional.push(skill.clone()),
        }
    }

    result.score = percent_floor(result.matched_weight, total_weight);
    result
}

fn find(skill: &str, skill_set: &HashSet<String>, text: &str) -> Option<MatchSource> {
    MatchSource::from_flags(skill_set.contains(skill), text.contains(skill))
}
