pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod gap;
pub mod jobs;
pub mod report;
pub mod scoring;
pub mod semantic;
pub mod taxonomy;
pub mod test_utils;

pub use engine::AtsEngine;
pub use error::{AtsError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
