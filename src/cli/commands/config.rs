//! ats config - Show the effective configuration

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{OutputFormat, emit_json};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Print the config file locations that were considered
    #[arg(long)]
    pub paths: bool,
}

#[derive(Serialize)]
struct ConfigPaths {
    explicit: Option<String>,
    global: Option<String>,
    project: String,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.paths {
        let paths = ConfigPaths {
            explicit: ctx
                .config_path
                .as_ref()
                .map(|path| path.display().to_string()),
            global: Config::global_path().map(|path| path.display().to_string()),
            project: PROJECT_CONFIG_FILE.to_string(),
        };
        if ctx.output_format == OutputFormat::Json {
            return emit_json(&paths);
        }
        if let Some(explicit) = &paths.explicit {
            println!("explicit: {explicit}");
        }
        println!("global:   {}", paths.global.as_deref().unwrap_or("-"));
        println!("project:  ./{}", paths.project);
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Json => emit_json(ctx.config()),
        OutputFormat::Human | OutputFormat::Plain => {
            print!("{}", ctx.config().to_toml_string()?);
            Ok(())
        }
    }
}
