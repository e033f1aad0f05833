//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// Resume ATS - score resumes against job roles with keyword and semantic matching
#[derive(Parser, Debug)]
#[command(name = "ats")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, plain)
    #[arg(long, short = 'O', global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: layered global and project config)
    #[arg(long, global = true, env = "RESUME_ATS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the job roles in the taxonomy
    Roles(commands::roles::RolesArgs),

    /// Hybrid ATS score for one role
    Score(commands::score::ScoreArgs),

    /// Score several roles and rank them
    Compare(commands::compare::CompareArgs),

    /// Split required skills into matched and missing
    Gap(commands::gap::GapArgs),

    /// Percentage of required skills the resume covers
    Coverage(commands::coverage::CoverageArgs),

    /// Full ATS compatibility report for one role
    Report(commands::report::ReportArgs),

    /// Rank job descriptions by similarity to the resume
    Jobs(commands::jobs::JobsArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}
