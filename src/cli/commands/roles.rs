//! ats roles - List job roles and their skills

use std::collections::BTreeMap;

use clap::Args;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct RolesArgs {
    /// Show each role's weighted skills
    #[arg(long, short)]
    pub detailed: bool,
}

#[derive(Serialize)]
struct RoleSummary<'a> {
    role: &'a str,
    core_skills: usize,
    optional_skills: usize,
    total_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    core: Option<Vec<(&'a str, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional: Option<Vec<(&'a str, f64)>>,
}

pub fn run(ctx: &AppContext, args: &RolesArgs) -> Result<()> {
    let taxonomy = ctx.engine.taxonomy();
    let summaries: Vec<RoleSummary<'_>> = taxonomy
        .iter()
        .map(|(role, skills)| {
            RoleSummary {
                role,
                core_skills: skills.core.len(),
                optional_skills: skills.optional.len(),
                total_weight: skills.total_weight(),
                core: args.detailed.then(|| weighted(&skills.core)),
                optional: args.detailed.then(|| weighted(&skills.optional)),
            }
        })
        .collect();

    emit_formatted(&summaries, ctx.output_format, |summaries| {
        let mut layout = HumanLayout::new();
        layout.title(&format!("{} job roles", summaries.len()));
        for summary in summaries {
            layout.bullet(&format!(
                "{} ({} core, {} optional)",
                summary.role.bold(),
                summary.core_skills,
                summary.optional_skills
            ));
            if let Some(core) = &summary.core {
                layout.push_line(format!("    core: {}", format_weighted(core)));
            }
            if let Some(optional) = &summary.optional {
                layout.push_line(format!("    optional: {}", format_weighted(optional)));
            }
        }
        layout
    })
}

fn weighted(tier: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    tier.iter()
        .map(|(skill, weight)| (skill.as_str(), *weight))
        .collect()
}

fn format_weighted(skills: &[(&str, f64)]) -> String {
    if skills.is_empty() {
        return "-".to_string();
    }
    skills
        .iter()
        .map(|(skill, weight)| format!("{skill} ({weight})"))
        .join(", ")
}
