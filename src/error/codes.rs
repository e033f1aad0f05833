//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Taxonomy and role errors
//! - 3xx: Config errors
//! - 4xx: Scoring input errors
//! - 5xx: Embedding model errors
//! - 6xx: Storage and serialization errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for JSON output.
///
/// Each variant maps to a numeric code (e.g., `RoleNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Taxonomy errors (1xx)
    // ========================================
    /// E101: Requested job role is not in the skill taxonomy
    RoleNotFound,
    /// E102: Taxonomy file has invalid structure or weights
    TaxonomyInvalid,
    /// E103: Taxonomy contains no roles
    TaxonomyEmpty,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file not found
    ConfigNotFound,
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E303: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Scoring errors (4xx)
    // ========================================
    /// E401: Keyword and semantic weights do not sum to 1.0
    WeightsInvalid,
    /// E402: Similarity threshold outside [0, 1]
    ThresholdInvalid,

    // ========================================
    // Model errors (5xx)
    // ========================================
    /// E501: Embedding backend could not be loaded or invoked
    ModelUnavailable,
    /// E502: Embedding backend did not answer before the deadline
    ModelTimeout,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Failed to read input or config file
    StorageReadError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `RoleNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::RoleNotFound => 101,
            Self::TaxonomyInvalid => 102,
            Self::TaxonomyEmpty => 103,

            Self::ConfigNotFound => 301,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 303,

            Self::WeightsInvalid => 401,
            Self::ThresholdInvalid => 402,

            Self::ModelUnavailable => 501,
            Self::ModelTimeout => 502,

            Self::StorageReadError => 601,
            Self::SerializationError => 605,

            Self::InternalError => 901,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::RoleNotFound => "Run `ats roles` to list the job roles available in the taxonomy",
            Self::TaxonomyInvalid => "Check the taxonomy JSON: each role needs `core` and `optional` maps of skill -> positive weight",
            Self::TaxonomyEmpty => "Add at least one role to the taxonomy file, or unset taxonomy.path to use the built-in roles",

            Self::ConfigNotFound => "Create the config file or pass --config <path>",
            Self::ConfigInvalid => "Run `ats config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the required value in config.toml or via the matching RESUME_ATS_* variable",

            Self::WeightsInvalid => "keyword_weight + semantic_weight must equal 1.0 (e.g. 0.4 and 0.6)",
            Self::ThresholdInvalid => "Similarity thresholds must lie between 0.0 and 1.0",

            Self::ModelUnavailable => "Check embedding.backend. Use `hash` for the built-in embedder, or score with --keyword-only",
            Self::ModelTimeout => "The embedding model was slow to answer. Retry, or raise embedding.timeout_ms",

            Self::StorageReadError => "Check file permissions and ensure the path is accessible",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::RoleNotFound
            | Self::TaxonomyInvalid
            | Self::TaxonomyEmpty
            | Self::ConfigNotFound
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::WeightsInvalid
            | Self::ThresholdInvalid
            | Self::ModelUnavailable
            | Self::ModelTimeout
            | Self::StorageReadError
            | Self::IoError => true,

            Self::SerializationError | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "taxonomy",
            3 => "config",
            4 => "scoring",
            5 => "model",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::RoleNotFound,
            Self::TaxonomyInvalid,
            Self::TaxonomyEmpty,
            Self::ConfigNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::WeightsInvalid,
            Self::ThresholdInvalid,
            Self::ModelUnavailable,
            Self::ModelTimeout,
            Self::StorageReadError,
            Self::SerializationError,
            Self::InternalError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
