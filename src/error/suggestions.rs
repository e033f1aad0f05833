//! Context-aware error suggestions.
//!
//! Dynamic suggestion generation based on error context, complementing the
//! static suggestions in the `codes` module.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
///
/// Falls back to the static suggestion of `code` when the context carries
/// nothing more specific.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::RoleNotFound => suggest_role_not_found(context),
        ErrorCode::WeightsInvalid => suggest_weights_invalid(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        ErrorCode::StorageReadError => suggest_storage_read(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_role_not_found(context: Option<&Value>) -> String {
    let role = context
        .and_then(|c| c.get("role"))
        .and_then(Value::as_str);
    let available: Vec<&str> = context
        .and_then(|c| c.get("available"))
        .and_then(Value::as_array)
        .map(|roles| roles.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(role) = role else {
        return ErrorCode::RoleNotFound.suggestion().to_string();
    };

    let similar = suggest_similar_roles(role, &available, 3);
    if similar.is_empty() {
        format!(
            "Job role '{role}' is not in the taxonomy. Run `ats roles` to list available roles"
        )
    } else {
        format!(
            "Job role '{role}' is not in the taxonomy. Did you mean: {}?",
            similar.join(", ")
        )
    }
}

fn suggest_weights_invalid(context: Option<&Value>) -> String {
    let keyword = context
        .and_then(|c| c.get("keyword_weight"))
        .and_then(Value::as_f64);
    let semantic = context
        .and_then(|c| c.get("semantic_weight"))
        .and_then(Value::as_f64);

    match (keyword, semantic) {
        (Some(k), Some(s)) => format!(
            "Weights sum to {:.2}. Use --semantic-weight {:.2} to pair with --keyword-weight {k}",
            k + s,
            (1.0 - k).max(0.0)
        ),
        _ => ErrorCode::WeightsInvalid.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    let config_key = context
        .and_then(|c| c.get("config_key"))
        .and_then(Value::as_str);

    match config_key {
        Some(key) => format!("Required config '{key}' is missing. Add it to config.toml"),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}

fn suggest_storage_read(context: Option<&Value>) -> String {
    let path = context
        .and_then(|c| c.get("path"))
        .and_then(Value::as_str);

    match path {
        Some(path) => format!("Could not read '{path}'. Check the path exists and is readable"),
        None => ErrorCode::StorageReadError.suggestion().to_string(),
    }
}

/// Suggest role names close to a misspelled one.
pub fn suggest_similar_roles(query: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<_> = available
        .iter()
        .map(|s| (s, similarity_score(&query_lower, &s.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(s, _)| (*s).to_string())
        .collect()
}

/// Jaccard similarity on character trigrams.
fn similarity_score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_trigrams: std::collections::HashSet<_> = trigrams(a).collect();
    let b_trigrams: std::collections::HashSet<_> = trigrams(b).collect();

    if a_trigrams.is_empty() || b_trigrams.is_empty() {
        if a.starts_with(b) || b.starts_with(a) {
            return 0.8;
        }
        if a.contains(b) || b.contains(a) {
            return 0.5;
        }
        return 0.0;
    }

    let intersection = a_trigrams.intersection(&b_trigrams).count();
    let union = a_trigrams.union(&b_trigrams).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn trigrams(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len().saturating_sub(2)).filter_map(move |i| s.get(i..i + 3))
}
