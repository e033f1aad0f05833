//! Improvement suggestions derived from a score breakdown.

use super::hybrid::{ScoreBreakdown, ScoringMode};

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Skills named per suggestion before summarizing the rest
const SKILLS_PER_SUGGESTION: usize = 3;

/// Sub-scores below this get dedicated advice
const LOW_SUBSCORE: u32 = 50;

/// Final scores below this (the "good" band) get the tailoring advice
const GOOD_BAND: u32 = 60;

/// Ordered, actionable advice for a breakdown. Pure: nothing is rescored.
///
/// Order: missing core skills, missing optional skills, low semantic score,
/// low keyword score, then a tailoring tip below the good band.
pub fn improvement_suggestions(breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !breakdown.missing_core.is_empty() {
        suggestions.push(format!(
            "Add missing core skills: {}",
            summarize(&breakdown.missing_core)
        ));
    }

    if !breakdown.missing_optional.is_empty() {
        suggestions.push(format!(
            "Consider adding optional skills: {}",
            summarize(&breakdown.missing_optional)
        ));
    }

    if breakdown.mode == ScoringMode::Hybrid && breakdown.semantic_score < LOW_SUBSCORE {
        suggestions.push(format!(
            "Describe hands-on work with the core {} skills in context (semantic match {}%)",
            breakdown.job_role, breakdown.semantic_score
        ));
    }

    if breakdown.keyword_score < LOW_SUBSCORE {
        suggestions.push(format!(
            "Use the exact skill names from the job posting (keyword match {}%)",
            breakdown.keyword_score
        ));
    }

    if breakdown.final_score < GOOD_BAND {
        suggestions.push(format!(
            "Tailor your resume to the {} job description",
            breakdown.job_role
        ));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn summarize(skills: &[String]) -> String {
    let shown = skills
        .iter()
        .take(SKILLS_PER_SUGGESTION)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let rest = skills.len().saturating_sub(SKILLS_PER_SUGGESTION);
    if rest == 0 {
        shown
    } else {
        format!("{shown} and {rest} more")
    }
}
