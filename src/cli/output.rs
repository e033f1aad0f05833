use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::error::{AtsError, Result, StructuredError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Plain text without colors
    Plain,
}

impl OutputFormat {
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| AtsError::Internal(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Report a failed command: a `StructuredError` object on stdout in JSON
/// mode, otherwise message and suggestion on stderr.
pub fn emit_error(err: &AtsError, format: OutputFormat) {
    let structured = StructuredError::from_ats_error(err);
    if format.is_machine_readable() {
        let payload = serde_json::to_string_pretty(&structured).unwrap_or_else(|_| {
            format!(r#"{{"code":"{}","message":"{}"}}"#, structured.code, structured.message)
        });
        println!("{payload}");
        return;
    }

    eprintln!("{} {}", "Error:".red().bold(), structured.message);
    eprintln!("  {} {}", "hint:".dimmed(), structured.suggestion);
}

/// Color a 0-100 score by band.
pub fn score_colored(score: u32) -> ColoredString {
    let text = format!("{score}/100");
    match score {
        80.. => text.green().bold(),
        60..=79 => text.yellow().bold(),
        40..=59 => text.truecolor(255, 165, 0),
        _ => text.red().bold(),
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(text.bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(text.bold().to_string());
        self.lines.push("-".repeat(text.chars().count().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        // pad before styling so escape codes do not eat the width
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", padded.dimmed()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: &HumanLayout) {
    println!("{}", layout.build());
}

/// Emit `value` as JSON, or through `human_fn` for human and plain output.
pub fn emit_formatted<T: Serialize>(
    value: &T,
    format: OutputFormat,
    human_fn: impl FnOnce(&T) -> HumanLayout,
) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(value),
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(&human_fn(value));
            Ok(())
        }
    }
}
