//! ats - Resume ATS scoring CLI
//!
//! Scores plain-text resumes against job roles with hybrid keyword and
//! semantic matching.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use resume_ats::Result;
use resume_ats::app::AppContext;
use resume_ats::cli::output::emit_error;
use resume_ats::cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    if !cli.output_format.use_colors() {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            emit_error(&err, cli.output_format);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    let result = resume_ats::cli::commands::run(&ctx, &cli.command);
    ctx.engine.shutdown();
    result
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,resume_ats=info",
        1 => "info,resume_ats=debug",
        _ => "debug,resume_ats=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.output_format == OutputFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(cli.output_format.use_colors()),
            )
            .init();
    }
}
