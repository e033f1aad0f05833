//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::{AtsError, Result};

pub mod compare;
pub mod config;
pub mod coverage;
pub mod gap;
pub mod jobs;
pub mod report;
pub mod roles;
pub mod score;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Roles(args) => roles::run(ctx, args),
        Commands::Score(args) => score::run(ctx, args),
        Commands::Compare(args) => compare::run(ctx, args),
        Commands::Gap(args) => gap::run(ctx, args),
        Commands::Coverage(args) => coverage::run(ctx, args),
        Commands::Report(args) => report::run(ctx, args),
        Commands::Jobs(args) => jobs::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Resume text and extracted skills, shared by the scoring commands.
#[derive(Args, Debug, Clone)]
pub struct ResumeInput {
    /// Plain-text resume file
    #[arg(long, short = 'r', conflicts_with = "text", required_unless_present = "text")]
    pub resume: Option<PathBuf>,

    /// Resume text given inline
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// Extracted skills, comma separated
    #[arg(long, short = 's', value_delimiter = ',')]
    pub skills: Vec<String>,
}

impl ResumeInput {
    pub fn resume_text(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let Some(path) = &self.resume else {
            return Err(AtsError::MissingConfig("--resume or --text".to_string()));
        };
        std::fs::read_to_string(path).map_err(|source| AtsError::ReadFile {
            path: path.clone(),
            source,
        })
    }

    /// Trimmed, non-empty skills in input order.
    pub fn skills(&self) -> Vec<String> {
        split_list(&self.skills)
    }
}

/// Trim comma-split values and drop empties.
pub(crate) fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
