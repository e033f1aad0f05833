//! Error handling for resume-ats.
//!
//! This module provides:
//! - [`AtsError`]: The main error enum for all scoring operations
//! - [`ErrorClass`]: Coarse failure classes callers branch on (retry, degrade, fix config)
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error with suggestion and context

mod codes;
mod suggestions;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::{suggest_for_error, suggest_similar_roles};

/// Main error type for resume-ats operations.
#[derive(Error, Debug)]
pub enum AtsError {
    #[error("Job role not found: {role} (available: {})", .available.join(", "))]
    UnknownRole { role: String, available: Vec<String> },

    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    #[error("Taxonomy has no roles: {0}")]
    EmptyTaxonomy(String),

    #[error("Invalid score weights: keyword {keyword} + semantic {semantic} must sum to 1.0")]
    InvalidWeights { keyword: f64, semantic: f64 },

    #[error("Invalid similarity threshold {0}: must be within [0, 1]")]
    InvalidThreshold(f64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure classes from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Bad role, taxonomy, weights or config. Not retried.
    Configuration,
    /// Embedding backend cannot load or infer. Keyword-only scoring still works.
    ModelUnavailable,
    /// Deadline exceeded. Safe to retry.
    Transient,
    /// IO, serialization and everything else.
    Internal,
}

impl AtsError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownRole { .. } => ErrorCode::RoleNotFound,
            Self::InvalidTaxonomy(_) => ErrorCode::TaxonomyInvalid,
            Self::EmptyTaxonomy(_) => ErrorCode::TaxonomyEmpty,
            Self::InvalidWeights { .. } => ErrorCode::WeightsInvalid,
            Self::InvalidThreshold(_) => ErrorCode::ThresholdInvalid,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::ConfigNotFound(_) => ErrorCode::ConfigNotFound,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::ModelUnavailable(_) => ErrorCode::ModelUnavailable,
            Self::Timeout(_) => ErrorCode::ModelTimeout,
            Self::ReadFile { .. } => ErrorCode::StorageReadError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Toml(_) => ErrorCode::ConfigInvalid,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Classify this error for retry and degradation decisions.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownRole { .. }
            | Self::InvalidTaxonomy(_)
            | Self::EmptyTaxonomy(_)
            | Self::InvalidWeights { .. }
            | Self::InvalidThreshold(_)
            | Self::Config(_)
            | Self::ConfigNotFound(_)
            | Self::MissingConfig(_)
            | Self::Toml(_) => ErrorClass::Configuration,
            Self::ModelUnavailable(_) => ErrorClass::ModelUnavailable,
            Self::Timeout(_) => ErrorClass::Transient,
            Self::ReadFile { .. } | Self::Io(_) | Self::Json(_) | Self::Internal(_) => {
                ErrorClass::Internal
            }
        }
    }

    /// Whether a caller may retry the same call unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Transient)
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::UnknownRole { role, available } => {
                Some(serde_json::json!({ "role": role, "available": available }))
            }
            Self::InvalidWeights { keyword, semantic } => Some(serde_json::json!({
                "keyword_weight": keyword,
                "semantic_weight": semantic,
            })),
            Self::InvalidThreshold(value) => Some(serde_json::json!({ "threshold": value })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            Self::ConfigNotFound(path) | Self::ReadFile { path, .. } => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_ats_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "ROLE_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Whether the failed call may simply be retried
    pub retryable: bool,

    /// Error category (e.g., "taxonomy", "config", "model")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            retryable: matches!(code, ErrorCode::ModelTimeout),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from an `AtsError`.
    #[must_use]
    pub fn from_ats_error(err: &AtsError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            retryable: err.is_retryable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error and regenerate the suggestion.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<AtsError> for StructuredError {
    fn from(err: AtsError) -> Self {
        Self::from_ats_error(&err)
    }
}

impl From<&AtsError> for StructuredError {
    fn from(err: &AtsError) -> Self {
        Self::from_ats_error(err)
    }
}

/// Result type alias using `AtsError`.
pub type Result<T> = std::result::Result<T, AtsError>;
