//! ats coverage - Share of required skills the resume covers

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::ResumeInput;
use crate::cli::commands::gap::required_skills;
use crate::cli::commands::score::list_or_dash;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Required skills, comma separated
    #[arg(long, value_delimiter = ',')]
    pub required: Vec<String>,

    /// Take required skills from this role instead
    #[arg(long, conflicts_with = "required")]
    pub role: Option<String>,

    #[command(flatten)]
    pub input: ResumeInput,

    /// Similarity threshold (0-1, default: scoring.similarity_threshold)
    #[arg(long)]
    pub threshold: Option<f64>,
}

pub fn run(ctx: &AppContext, args: &CoverageArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let required = required_skills(ctx, &args.required, args.role.as_deref())?;
    let coverage = ctx
        .engine
        .analyze_skill_coverage(&text, &required, args.threshold)?;

    emit_formatted(&coverage, ctx.output_format, |coverage| {
        let mut layout = HumanLayout::new();
        layout.title("Skill coverage");
        layout.kv(
            "Coverage",
            &format!(
                "{:.2}% ({} of {})",
                coverage.coverage_percentage, coverage.matched_count, coverage.total_required
            ),
        );
        layout.kv("Assessment", coverage.recommendation.label());
        layout.kv(
            "Matched",
            &list_or_dash(coverage.matched.iter().map(|m| m.skill.as_str())),
        );
        layout.kv(
            "Missing",
            &list_or_dash(coverage.missing.iter().map(String::as_str)),
        );
        layout
    })
}
