use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AtsError, Result};
use crate::scoring::ScoreWeights;

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".resume-ats.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

impl Config {
    /// Load layered config: defaults, global file, project file, env.
    ///
    /// An explicit path (argument or `RESUME_ATS_CONFIG`) replaces both file
    /// layers and must exist.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("RESUME_ATS_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or(AtsError::ConfigNotFound(path))?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a complete config from TOML text (missing keys take defaults).
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)
            .map_err(|err| AtsError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    /// Render the effective config as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| AtsError::Config(format!("render config: {err}")))
    }

    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("resume-ats/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(path) = Self::global_path() else {
            debug!("no user config directory; skipping global config");
            return Ok(None);
        };
        Self::load_patch(&path)
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = project_root.join(PROJECT_CONFIG_FILE);
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|source| AtsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let patch = toml::from_str(&raw)
            .map_err(|err| AtsError::Config(format!("parse config {}: {err}", path.display())))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.cache {
            self.cache.merge(patch);
        }
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
        if let Some(patch) = patch.taxonomy {
            self.taxonomy.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(&|key: &str| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("RESUME_ATS_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = env_u64(lookup, "RESUME_ATS_EMBEDDING_TIMEOUT_MS")? {
            self.embedding.timeout_ms = value;
        }

        if env_bool(lookup, "RESUME_ATS_CACHE_DISABLED").unwrap_or(false) {
            self.cache.enabled = false;
        }
        if let Some(value) = env_u64(lookup, "RESUME_ATS_CACHE_MAX_ENTRIES")? {
            self.cache.max_entries = usize::try_from(value).map_err(|_| {
                AtsError::Config(format!("RESUME_ATS_CACHE_MAX_ENTRIES too large: {value}"))
            })?;
        }

        if let Some(value) = env_f64(lookup, "RESUME_ATS_KEYWORD_WEIGHT")? {
            self.scoring.keyword_weight = value;
        }
        if let Some(value) = env_f64(lookup, "RESUME_ATS_SEMANTIC_WEIGHT")? {
            self.scoring.semantic_weight = value;
        }
        if let Some(value) = env_f64(lookup, "RESUME_ATS_THRESHOLD")? {
            self.scoring.similarity_threshold = value;
        }

        if let Some(value) = lookup("RESUME_ATS_TAXONOMY") {
            self.taxonomy.path = Some(PathBuf::from(value));
        }

        Ok(())
    }

    /// Reject values no scorer can work with.
    pub fn validate(&self) -> Result<()> {
        ScoreWeights::new(self.scoring.keyword_weight, self.scoring.semantic_weight)?;

        for threshold in [
            self.scoring.similarity_threshold,
            self.scoring.high_similarity_threshold,
            self.scoring.low_similarity_threshold,
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(AtsError::InvalidThreshold(threshold));
            }
        }
        if self.scoring.low_similarity_threshold > self.scoring.high_similarity_threshold {
            return Err(AtsError::Config(format!(
                "scoring.low_similarity_threshold ({}) exceeds scoring.high_similarity_threshold ({})",
                self.scoring.low_similarity_threshold, self.scoring.high_similarity_threshold
            )));
        }

        if self.embedding.dims == 0 {
            return Err(AtsError::Config(
                "embedding.dims must be greater than 0".to_string(),
            ));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(AtsError::Config(
                "cache.max_entries must be greater than 0 (set cache.enabled = false instead)"
                    .to_string(),
            ));
        }
        if self.taxonomy.default_role.trim().is_empty() {
            return Err(AtsError::MissingConfig("taxonomy.default_role".to_string()));
        }

        Ok(())
    }

    /// Configured keyword/semantic weight pair.
    pub fn weights(&self) -> Result<ScoreWeights> {
        ScoreWeights::new(self.scoring.keyword_weight, self.scoring.semantic_weight)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// `hash`, `local` (needs the `local-model` feature) or `api`.
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub dims: u32,
    /// Deadline for one model call; 0 disables it.
    #[serde(default)]
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "hash".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            dims: 384,
            timeout_ms: 0,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.timeout_ms {
            self.timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub max_entries: usize,
    /// Informational; entries only leave the cache by eviction or clear.
    #[serde(default)]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            ttl_seconds: 3600,
        }
    }
}

impl CacheConfig {
    fn merge(&mut self, patch: CachePatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.max_entries {
            self.max_entries = value;
        }
        if let Some(value) = patch.ttl_seconds {
            self.ttl_seconds = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub keyword_weight: f64,
    #[serde(default)]
    pub semantic_weight: f64,
    #[serde(default)]
    pub similarity_threshold: f64,
    #[serde(default)]
    pub high_similarity_threshold: f64,
    #[serde(default)]
    pub low_similarity_threshold: f64,
    /// Score keyword-only instead of failing when the model is unavailable.
    #[serde(default)]
    pub fallback_to_keyword: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 0.4,
            semantic_weight: 0.6,
            similarity_threshold: 0.55,
            high_similarity_threshold: 0.70,
            low_similarity_threshold: 0.40,
            fallback_to_keyword: false,
        }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringPatch) {
        if let Some(value) = patch.keyword_weight {
            self.keyword_weight = value;
        }
        if let Some(value) = patch.semantic_weight {
            self.semantic_weight = value;
        }
        if let Some(value) = patch.similarity_threshold {
            self.similarity_threshold = value;
        }
        if let Some(value) = patch.high_similarity_threshold {
            self.high_similarity_threshold = value;
        }
        if let Some(value) = patch.low_similarity_threshold {
            self.low_similarity_threshold = value;
        }
        if let Some(value) = patch.fallback_to_keyword {
            self.fallback_to_keyword = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// JSON taxonomy file; the built-in roles are used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub default_role: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_role: "Software Engineer".to_string(),
        }
    }
}

impl TaxonomyConfig {
    fn merge(&mut self, patch: TaxonomyPatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
        if let Some(value) = patch.default_role {
            self.default_role = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub embedding: Option<EmbeddingPatch>,
    pub cache: Option<CachePatch>,
    pub scoring: Option<ScoringPatch>,
    pub taxonomy: Option<TaxonomyPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub dims: Option<u32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CachePatch {
    pub enabled: Option<bool>,
    pub max_entries: Option<usize>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoringPatch {
    pub keyword_weight: Option<f64>,
    pub semantic_weight: Option<f64>,
    pub similarity_threshold: Option<f64>,
    pub high_similarity_threshold: Option<f64>,
    pub low_similarity_threshold: Option<f64>,
    pub fallback_to_keyword: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyPatch {
    pub path: Option<PathBuf>,
    pub default_role: Option<String>,
}

fn env_bool(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key) {
        Some(value) => value.trim().parse::<u64>().map(Some).map_err(|err| {
            AtsError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}

fn env_f64(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<Option<f64>> {
    match lookup(key) {
        Some(value) => value.trim().parse::<f64>().map(Some).map_err(|err| {
            AtsError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}
