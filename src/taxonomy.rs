//! Per-role skill taxonomy.
//!
//! A taxonomy maps job role names to weighted `core` and `optional` skill
//! tiers. It is read once and never mutated while scoring.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::config::TaxonomyConfig;
use crate::error::{AtsError, Result};

const BUILTIN_TAXONOMY: &str = include_str!("../data/ats_job_skills.json");

/// Weighted skills of one role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleSkills {
    #[serde(default)]
    pub core: BTreeMap<String, f64>,
    #[serde(default)]
    pub optional: BTreeMap<String, f64>,
}

impl RoleSkills {
    pub fn new(core: BTreeMap<String, f64>, optional: BTreeMap<String, f64>) -> Self {
        Self { core, optional }
    }

    pub fn core_weight(&self) -> f64 {
        self.core.values().sum()
    }

    pub fn optional_weight(&self) -> f64 {
        self.optional.values().sum()
    }

    /// Sum of core and optional weights.
    pub fn total_weight(&self) -> f64 {
        self.core_weight() + self.optional_weight()
    }

    /// Core and optional skill names, core first.
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.core.keys().chain(self.optional.keys()).map(String::as_str)
    }

    fn normalized(self, role: &str) -> Result<Self> {
        let core = normalize_tier(self.core, role, "core")?;
        let optional = normalize_tier(self.optional, role, "optional")?;

        if let Some(skill) = core.keys().find(|skill| optional.contains_key(*skill)) {
            return Err(AtsError::InvalidTaxonomy(format!(
                "role '{role}' lists '{skill}' as both core and optional"
            )));
        }

        Ok(Self { core, optional })
    }
}

fn normalize_tier(
    tier: BTreeMap<String, f64>,
    role: &str,
    tier_name: &str,
) -> Result<BTreeMap<String, f64>> {
    let mut normalized = BTreeMap::new();
    for (skill, weight) in tier {
        let name = normalize_skill(&skill);
        if name.is_empty() {
            return Err(AtsError::InvalidTaxonomy(format!(
                "role '{role}' has an empty {tier_name} skill name"
            )));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AtsError::InvalidTaxonomy(format!(
                "role '{role}' {tier_name} skill '{name}' has weight {weight}; weights must be positive"
            )));
        }
        if normalized.insert(name.clone(), weight).is_some() {
            return Err(AtsError::InvalidTaxonomy(format!(
                "role '{role}' lists {tier_name} skill '{name}' more than once"
            )));
        }
    }
    Ok(normalized)
}

/// Canonical skill spelling: NFKC, trimmed, lowercased.
pub fn normalize_skill(skill: &str) -> String {
    skill.nfkc().collect::<String>().trim().to_lowercase()
}

/// Read-only role taxonomy
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    roles: BTreeMap<String, RoleSkills>,
}

impl Taxonomy {
    /// Validate and normalize a set of roles.
    pub fn new(roles: BTreeMap<String, RoleSkills>) -> Result<Self> {
        if roles.is_empty() {
            return Err(AtsError::EmptyTaxonomy("no roles defined".to_string()));
        }

        let mut normalized = BTreeMap::new();
        for (name, skills) in roles {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AtsError::InvalidTaxonomy(
                    "role names must not be empty".to_string(),
                ));
            }
            let skills = skills.normalized(&name)?;
            if normalized.insert(name.clone(), skills).is_some() {
                return Err(AtsError::InvalidTaxonomy(format!(
                    "role '{name}' is defined more than once"
                )));
            }
        }

        Ok(Self { roles: normalized })
    }

    /// The roles shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TAXONOMY, "built-in taxonomy")
    }

    /// Parse `{ role: { "core": {skill: weight}, "optional": {...} } }`.
    pub fn from_json_str(raw: &str, source: &str) -> Result<Self> {
        let roles: BTreeMap<String, RoleSkills> = serde_json::from_str(raw)
            .map_err(|err| AtsError::InvalidTaxonomy(format!("{source}: {err}")))?;
        Self::new(roles).map_err(|err| match err {
            AtsError::EmptyTaxonomy(_) => AtsError::EmptyTaxonomy(source.to_string()),
            other => other,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| AtsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let taxonomy = Self::from_json_str(&raw, &path.display().to_string())?;
        debug!(path = %path.display(), roles = taxonomy.len(), "loaded taxonomy");
        Ok(taxonomy)
    }

    /// Taxonomy file from config, or the built-in roles.
    pub fn load(config: &TaxonomyConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// Canonical name and skills of `role`. Exact names win; otherwise a
    /// unique case-insensitive match is accepted.
    pub fn resolve(&self, role: &str) -> Result<(&str, &RoleSkills)> {
        let role = role.trim();
        if let Some((name, skills)) = self.roles.get_key_value(role) {
            return Ok((name.as_str(), skills));
        }

        let mut folded = self
            .roles
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(role));
        match (folded.next(), folded.next()) {
            (Some((name, skills)), None) => Ok((name.as_str(), skills)),
            _ => Err(AtsError::UnknownRole {
                role: role.to_string(),
                available: self.available_roles(),
            }),
        }
    }

    pub fn role(&self, role: &str) -> Result<&RoleSkills> {
        self.resolve(role).map(|(_, skills)| skills)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.role(role).is_ok()
    }

    /// Role names in sorted order.
    pub fn available_roles(&self) -> Vec<String> {
        self.roles.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleSkills)> {
        self.roles.iter().map(|(name, skills)| (name.as_str(), skills))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
