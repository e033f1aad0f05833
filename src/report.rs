//! ATS compatibility report: hybrid score, format compliance and priority
//! actions rolled into one result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::{ScoreBreakdown, floor_score, improvement_suggestions, round_to};

/// Bullet glyphs that many ATS parsers mangle
const DECORATIVE_GLYPHS: [char; 5] = ['•', '◆', '■', '●', '▪'];

const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 2000;
const MAX_PRIORITY_ACTIONS: usize = 5;
const CRITICAL_SKILLS_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CompatibilityLevel {
    pub const fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const fn compatibility_level(score: u32) -> CompatibilityLevel {
    CompatibilityLevel::from_score(score)
}

/// Estimated chance (percent) of passing an ATS screen at `score`.
pub const fn pass_probability(score: u32) -> f64 {
    match score {
        80.. => 95.0,
        70..=79 => 85.0,
        60..=69 => 70.0,
        50..=59 => 50.0,
        40..=49 => 30.0,
        _ => 15.0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    /// Occurrences per keyword, only keywords that occur
    pub keyword_counts: BTreeMap<String, usize>,
    pub total_occurrences: usize,
    pub word_count: usize,
    pub density_percentage: f64,
    /// Share of keywords found at least once, percent
    pub coverage: f64,
}

/// Case-insensitive keyword occurrence counts and density.
pub fn keyword_density<S: AsRef<str>>(resume_text: &str, keywords: &[S]) -> KeywordDensity {
    let text = resume_text.to_lowercase();
    let word_count = resume_text.split_whitespace().count();

    let mut result = KeywordDensity {
        word_count,
        ..KeywordDensity::default()
    };

    for keyword in keywords {
        let keyword = keyword.as_ref();
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let count = text.matches(needle.as_str()).count();
        if count > 0 {
            result.keyword_counts.insert(keyword.to_string(), count);
            result.total_occurrences += count;
        }
    }

    if word_count > 0 {
        result.density_percentage =
            round_to(result.total_occurrences as f64 / word_count as f64 * 100.0, 2);
    }
    if !keywords.is_empty() {
        result.coverage = round_to(
            result.keyword_counts.len() as f64 / keywords.len() as f64 * 100.0,
            2,
        );
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatCompliance {
    pub compliance_score: u32,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub is_compliant: bool,
    pub recommendation: String,
}

/// Check plain-text layout for ATS-hostile formatting.
///
/// Each issue costs 15 points and each warning 5.
pub fn format_compliance(resume_text: &str) -> FormatCompliance {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    for glyph in DECORATIVE_GLYPHS {
        if resume_text.contains(glyph) {
            warnings.push(format!(
                "Found special character '{glyph}' - may not parse correctly"
            ));
        }
    }

    if resume_text.contains('\t') {
        warnings.push("Detected tab characters - may indicate table formatting".to_string());
    }

    let word_count = resume_text.split_whitespace().count();
    if word_count < MIN_WORDS {
        issues.push(format!("Resume is too short (< {MIN_WORDS} words)"));
    } else if word_count > MAX_WORDS {
        warnings.push(format!("Resume is very long (> {MAX_WORDS} words)"));
    }

    let penalty = 15 * issues.len() + 5 * warnings.len();
    let compliance_score = u32::try_from(100usize.saturating_sub(penalty)).unwrap_or(0);
    let is_compliant = issues.is_empty();

    FormatCompliance {
        compliance_score,
        is_compliant,
        recommendation: if is_compliant {
            "Format is ATS-friendly".to_string()
        } else {
            "Fix format issues before applying".to_string()
        },
        issues,
        warnings,
    }
}

/// Hybrid score interpreted for an applicant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsAnalysis {
    pub job_role: String,
    pub ats_score: u32,
    pub compatibility_level: CompatibilityLevel,
    pub pass_probability: f64,
    pub suggestions: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl AtsAnalysis {
    pub fn from_breakdown(breakdown: ScoreBreakdown) -> Self {
        let ats_score = breakdown.final_score;
        Self {
            job_role: breakdown.job_role.clone(),
            ats_score,
            compatibility_level: compatibility_level(ats_score),
            pass_probability: pass_probability(ats_score),
            suggestions: improvement_suggestions(&breakdown),
            breakdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// floor(0.7 * ats_score + 0.3 * compliance_score)
    pub overall_score: u32,
    pub ats_analysis: AtsAnalysis,
    pub format_analysis: FormatCompliance,
    pub keyword_density: KeywordDensity,
    pub final_recommendation: String,
    pub priority_actions: Vec<String>,
}

/// Assemble a report from a finished breakdown and the resume text.
pub fn build_report<S: AsRef<str>>(
    breakdown: ScoreBreakdown,
    resume_text: &str,
    role_keywords: &[S],
) -> AtsReport {
    let ats_analysis = AtsAnalysis::from_breakdown(breakdown);
    let format_analysis = format_compliance(resume_text);

    let overall_score = floor_score(
        f64::from(ats_analysis.ats_score) * 0.7 + f64::from(format_analysis.compliance_score) * 0.3,
    );

    AtsReport {
        overall_score,
        priority_actions: priority_actions(&ats_analysis, &format_analysis),
        keyword_density: keyword_density(resume_text, role_keywords),
        final_recommendation: final_recommendation(overall_score).to_string(),
        ats_analysis,
        format_analysis,
    }
}

pub const fn final_recommendation(overall_score: u32) -> &'static str {
    match overall_score {
        80.. => "Your resume is highly optimized for ATS. Ready to apply!",
        60..=79 => "Your resume is ATS-compatible with minor improvements needed.",
        40..=59 => "Your resume needs significant improvements for ATS.",
        _ => "Your resume requires major revisions for ATS compatibility.",
    }
}

fn priority_actions(analysis: &AtsAnalysis, format: &FormatCompliance) -> Vec<String> {
    let mut actions: Vec<String> = format.issues.clone();

    let missing_core = &analysis.breakdown.missing_core;
    if !missing_core.is_empty() {
        let shown: Vec<&str> = missing_core
            .iter()
            .take(CRITICAL_SKILLS_SHOWN)
            .map(String::as_str)
            .collect();
        actions.push(format!("Add critical skills: {}", shown.join(", ")));
    }

    if analysis.ats_score < 50 {
        actions.push("Tailor resume more closely to job description".to_string());
    }

    actions.truncate(MAX_PRIORITY_ACTIONS);
    actions
}
