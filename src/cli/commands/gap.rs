//! ats gap - Matched and missing skills by semantic similarity

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::score::list_or_dash;
use crate::cli::commands::{ResumeInput, split_list};
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::{AtsError, Result};
use crate::scoring::SemanticMatch;

#[derive(Args, Debug)]
pub struct GapArgs {
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

    /// Only list matched skills, most similar first
    #[arg(long)]
    pub sorted: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GapOutput {
    Gap {
        matched: Vec<SemanticMatch>,
        missing: Vec<String>,
    },
    Sorted {
        matched: Vec<SemanticMatch>,
    },
}

/// Explicit list, else the named role's core and optional skills.
pub(crate) fn required_skills(
    ctx: &AppContext,
    required: &[String],
    role: Option<&str>,
) -> Result<Vec<String>> {
    let explicit = split_list(required);
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    let Some(role) = role else {
        return Err(AtsError::MissingConfig("--required or --role".to_string()));
    };
    let skills = ctx.engine.taxonomy().role(role)?;
    Ok(skills.skill_names().map(str::to_string).collect())
}

pub fn run(ctx: &AppContext, args: &GapArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let required = required_skills(ctx, &args.required, args.role.as_deref())?;

    let output = if args.sorted {
        GapOutput::Sorted {
            matched: ctx
                .engine
                .semantic_match_skills(&text, &required, args.threshold)?,
        }
    } else {
        let gap = ctx
            .engine
            .semantic_skill_gap(&text, &required, args.threshold)?;
        GapOutput::Gap {
            matched: gap.matched,
            missing: gap.missing,
        }
    };

    emit_formatted(&output, ctx.output_format, |output| {
        let mut layout = HumanLayout::new();
        layout.title(&format!("Skill gap ({} required)", required.len()));
        let (matched, missing) = match output {
            GapOutput::Gap { matched, missing } => (matched, Some(missing)),
            GapOutput::Sorted { matched } => (matched, None),
        };

        layout.section("Matched");
        if matched.is_empty() {
            layout.push_line("-");
        }
        for found in matched {
            layout.bullet(&format!(
                "{} {:.1}% ({})",
                found.skill,
                found.similarity,
                ctx.engine.match_strength(found.similarity).label()
            ));
        }
        if let Some(missing) = missing {
            layout.section("Missing");
            layout.push_line(list_or_dash(missing.iter().map(String::as_str)));
        }
        layout
    })
}
