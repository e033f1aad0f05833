//! ats score - Hybrid ATS score for one role

use clap::Args;
use itertools::Itertools;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::ResumeInput;
use crate::cli::output::{HumanLayout, emit_formatted, score_colored};
use crate::engine::AtsEngine;
use crate::error::Result;
use crate::scoring::{ScoreBreakdown, ScoreWeights, ScoringMode};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Job role (default: taxonomy.default_role)
    pub role: Option<String>,

    #[command(flatten)]
    pub input: ResumeInput,

    #[command(flatten)]
    pub weights: WeightArgs,

    /// Skip the embedding model and score keywords only
    #[arg(long)]
    pub keyword_only: bool,
}

/// Per-call weight override; giving one weight implies the other.
#[derive(Args, Debug, Clone, Default)]
pub struct WeightArgs {
    /// Keyword weight (0-1)
    #[arg(long)]
    pub keyword_weight: Option<f64>,

    /// Semantic weight (0-1)
    #[arg(long)]
    pub semantic_weight: Option<f64>,
}

impl WeightArgs {
    pub fn resolve(&self) -> Result<Option<ScoreWeights>> {
        let (keyword, semantic) = match (self.keyword_weight, self.semantic_weight) {
            (None, None) => return Ok(None),
            (Some(keyword), None) => (keyword, 1.0 - keyword),
            (None, Some(semantic)) => (1.0 - semantic, semantic),
            (Some(keyword), Some(semantic)) => (keyword, semantic),
        };
        ScoreWeights::new(keyword, semantic).map(Some)
    }
}

#[derive(Serialize)]
struct ScoreOutput {
    final_score: u32,
    recommendation: &'static str,
    advice: &'static str,
    suggestions: Vec<String>,
    breakdown: ScoreBreakdown,
}

pub fn run(ctx: &AppContext, args: &ScoreArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let skills = args.input.skills();
    let role = args
        .role
        .clone()
        .unwrap_or_else(|| ctx.config().taxonomy.default_role.clone());

    let (final_score, breakdown) = if args.keyword_only {
        ctx.engine.keyword_only_score(&text, &skills, &role)?
    } else {
        let weights = args.weights.resolve()?;
        ctx.engine.hybrid_ats_score(&text, &skills, &role, weights)?
    };

    let output = ScoreOutput {
        final_score,
        recommendation: breakdown.recommendation.label(),
        advice: breakdown.recommendation.advice(),
        suggestions: ctx.engine.improvement_suggestions(&breakdown),
        breakdown,
    };

    emit_formatted(&output, ctx.output_format, |output| {
        let mut layout = HumanLayout::new();
        layout.title(&format!("ATS score: {}", output.breakdown.job_role));
        render_breakdown(&mut layout, &output.breakdown, &ctx.engine);
        if !output.suggestions.is_empty() {
            layout.section("Suggestions");
            for suggestion in &output.suggestions {
                layout.bullet(suggestion);
            }
        }
        layout
    })
}

/// Score lines, skill lists and semantic matches of one breakdown.
pub(crate) fn render_breakdown(layout: &mut HumanLayout, breakdown: &ScoreBreakdown, engine: &AtsEngine) {
    layout.kv(
        "Final score",
        &format!("{} ({})", score_colored(breakdown.final_score), breakdown.recommendation),
    );
    layout.kv("Keyword score", &format!("{}/100", breakdown.keyword_score));
    if breakdown.mode == ScoringMode::Hybrid {
        layout.kv("Semantic score", &format!("{}/100", breakdown.semantic_score));
    } else {
        layout.kv("Semantic score", "skipped (keyword only)");
    }
    layout.kv(
        "Weights",
        &format!(
            "keyword {:.2}, semantic {:.2}",
            breakdown.weights.keyword, breakdown.weights.semantic
        ),
    );

    layout.section("Skills");
    layout.kv(
        "Matched core",
        &list_or_dash(breakdown.matched_core.iter().map(|m| m.skill.as_str())),
    );
    layout.kv(
        "Matched optional",
        &list_or_dash(breakdown.matched_optional.iter().map(|m| m.skill.as_str())),
    );
    layout.kv(
        "Missing core",
        &list_or_dash(breakdown.missing_core.iter().map(String::as_str)),
    );
    layout.kv(
        "Missing optional",
        &list_or_dash(breakdown.missing_optional.iter().map(String::as_str)),
    );

    if !breakdown.semantic_matches.is_empty() {
        layout.section("Semantic matches");
        for found in &breakdown.semantic_matches {
            layout.bullet(&format!(
                "{} {:.1}% ({})",
                found.skill,
                found.similarity,
                engine.match_strength(found.similarity).label()
            ));
        }
    }
}

pub(crate) fn list_or_dash<'a>(mut items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}
