//! ats jobs - Recommend job descriptions for a resume

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::ResumeInput;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;
use crate::jobs::JobDescription;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// JSON array of {"title", "description"} objects
    #[arg(long, short = 'j')]
    pub jobs: PathBuf,

    #[command(flatten)]
    pub input: ResumeInput,

    /// Maximum recommendations
    #[arg(long, short = 'n', default_value = "5")]
    pub top_n: usize,

    /// Similarity threshold (0-1, default: scoring.similarity_threshold)
    #[arg(long)]
    pub threshold: Option<f64>,
}

pub fn run(ctx: &AppContext, args: &JobsArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let jobs = JobDescription::load_all(&args.jobs)?;
    let matches = ctx
        .engine
        .recommend_jobs(&text, &jobs, args.top_n, args.threshold)?;

    emit_formatted(&matches, ctx.output_format, |matches| {
        let mut layout = HumanLayout::new();
        layout.title(&format!(
            "{} of {} jobs recommended",
            matches.len(),
            jobs.len()
        ));
        for found in matches {
            layout.push_line(format!(
                "{} {}",
                found.title.bold(),
                format!("{:.1}%", found.semantic_match).green()
            ));
            layout.push_line(format!("    {}", found.explanation.dimmed()));
        }
        layout
    })
}
