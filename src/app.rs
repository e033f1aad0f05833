//! Per-invocation application context for the `ats` binary.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::engine::AtsEngine;
use crate::error::Result;

pub struct AppContext {
    pub engine: AtsEngine,
    /// Explicit config file, when one was given
    pub config_path: Option<PathBuf>,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;
        debug!(
            backend = %config.embedding.backend,
            roles_from = ?config.taxonomy.path,
            "configuration loaded"
        );

        Ok(Self {
            engine: AtsEngine::new(config)?,
            config_path: cli.config.clone(),
            output_format: cli.output_format,
        })
    }

    pub fn config(&self) -> &Config {
        self.engine.config()
    }
}
