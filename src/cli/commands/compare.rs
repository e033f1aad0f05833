//! ats compare - Rank several roles for one resume

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::score::WeightArgs;
use crate::cli::commands::{ResumeInput, split_list};
use crate::cli::output::{HumanLayout, emit_formatted, score_colored};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Roles to compare, comma separated (default: every role)
    #[arg(long, value_delimiter = ',')]
    pub roles: Vec<String>,

    #[command(flatten)]
    pub input: ResumeInput,

    #[command(flatten)]
    pub weights: WeightArgs,
}

pub fn run(ctx: &AppContext, args: &CompareArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let skills = args.input.skills();
    let mut roles = split_list(&args.roles);
    if roles.is_empty() {
        roles = ctx.engine.available_job_roles();
    }

    let weights = args.weights.resolve()?;
    let results = ctx
        .engine
        .compare_ats_scores(&text, &skills, &roles, weights)?;

    emit_formatted(&results, ctx.output_format, |results| {
        let mut layout = HumanLayout::new();
        layout.title(&format!("Role comparison ({} roles)", results.len()));
        for (rank, result) in results.iter().enumerate() {
            match (&result.breakdown, &result.error) {
                (Some(breakdown), _) => layout.push_line(format!(
                    "{:>2}. {:<24} {}  {}",
                    rank + 1,
                    result.job_role,
                    score_colored(result.final_score),
                    breakdown.recommendation
                )),
                (None, Some(error)) => layout.push_line(format!(
                    "{:>2}. {:<24} {}  {}",
                    rank + 1,
                    result.job_role,
                    "could not compute ATS score".red(),
                    error.message
                )),
                (None, None) => layout.push_line(format!(
                    "{:>2}. {}",
                    rank + 1,
                    result.job_role
                )),
            };
        }
        layout
    })
}
