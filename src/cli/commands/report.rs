//! ats report - Full ATS compatibility report

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::ResumeInput;
use crate::cli::commands::score::render_breakdown;
use crate::cli::output::{HumanLayout, emit_formatted, score_colored};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Job role (default: taxonomy.default_role)
    pub role: Option<String>,

    #[command(flatten)]
    pub input: ResumeInput,
}

pub fn run(ctx: &AppContext, args: &ReportArgs) -> Result<()> {
    let text = args.input.resume_text()?;
    let skills = args.input.skills();
    let role = args
        .role
        .clone()
        .unwrap_or_else(|| ctx.config().taxonomy.default_role.clone());

    let report = ctx.engine.generate_report(&text, &skills, &role)?;

    emit_formatted(&report, ctx.output_format, |report| {
        let analysis = &report.ats_analysis;
        let format = &report.format_analysis;
        let density = &report.keyword_density;

        let mut layout = HumanLayout::new();
        layout.title(&format!("ATS report: {}", analysis.job_role));
        layout.kv("Overall score", &score_colored(report.overall_score).to_string());
        layout.kv("Compatibility", analysis.compatibility_level.label());
        layout.kv("Pass probability", &format!("{:.0}%", analysis.pass_probability));
        layout.push_line(report.final_recommendation.bold().to_string());

        layout.section("Scoring");
        render_breakdown(&mut layout, &analysis.breakdown, &ctx.engine);

        layout.section("Format");
        layout.kv("Compliance", &format!("{}/100", format.compliance_score));
        layout.kv("Verdict", &format.recommendation);
        for issue in &format.issues {
            layout.bullet(&format!("{} {issue}", "issue:".red()));
        }
        for warning in &format.warnings {
            layout.bullet(&format!("{} {warning}", "warning:".yellow()));
        }

        layout.section("Keywords");
        layout.kv(
            "Density",
            &format!(
                "{:.2}% ({} occurrences in {} words)",
                density.density_percentage, density.total_occurrences, density.word_count
            ),
        );
        layout.kv("Coverage", &format!("{:.2}%", density.coverage));

        if !report.priority_actions.is_empty() {
            layout.section("Priority actions");
            for (index, action) in report.priority_actions.iter().enumerate() {
                layout.push_line(format!("{}. {action}", index + 1));
            }
        }
        if !analysis.suggestions.is_empty() {
            layout.section("Suggestions");
            for suggestion in &analysis.suggestions {
                layout.bullet(suggestion);
            }
        }
        layout
    })
}
