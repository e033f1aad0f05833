//! ATS scoring
//!
//! - [`keyword`]: exact skill presence against a role's weighted tiers
//! - [`semantic`]: embedding similarity against weighted skills
//! - [`hybrid`]: weighted fusion of both into an explainable breakdown
//! - [`suggestions`]: improvement advice derived from a breakdown

pub mod hybrid;
pub mod keyword;
pub mod semantic;
pub mod suggestions;

use serde::{Deserialize, Serialize};

use crate::error::{AtsError, Result};

pub use hybrid::{
    HybridScorer, RecommendationTier, RoleComparison, ScoreBreakdown, ScoringMode,
};
pub use keyword::{KeywordMatch, KeywordScore, MatchSource, score_keywords};
pub use semantic::{SemanticMatch, SemanticScore, score_semantic};
pub use suggestions::{MAX_SUGGESTIONS, improvement_suggestions};

/// Allowed drift of `keyword + semantic` from 1.0
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Slack added before flooring so exact ratios computed in binary floating
/// point do not lose a point (0.3 / 0.1 * 10 = 29.999...).
const FLOOR_EPSILON: f64 = 1e-9;

/// Keyword/semantic fusion weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub semantic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            semantic: 0.6,
        }
    }
}

impl ScoreWeights {
    /// Validate a weight pair: each non-negative, summing to 1.0 within
    /// [`WEIGHT_TOLERANCE`].
    pub fn new(keyword: f64, semantic: f64) -> Result<Self> {
        let valid = keyword.is_finite()
            && semantic.is_finite()
            && keyword >= 0.0
            && semantic >= 0.0
            && ((keyword + semantic) - 1.0).abs() <= WEIGHT_TOLERANCE + FLOOR_EPSILON;
        if !valid {
            return Err(AtsError::InvalidWeights { keyword, semantic });
        }
        Ok(Self { keyword, semantic })
    }

    /// All weight on the keyword score.
    pub const fn keyword_only() -> Self {
        Self {
            keyword: 1.0,
            semantic: 0.0,
        }
    }

    /// `floor(keyword_score * keyword + semantic_score * semantic)`, capped at 100.
    pub fn fuse(&self, keyword_score: u32, semantic_score: u32) -> u32 {
        let blended =
            f64::from(keyword_score) * self.keyword + f64::from(semantic_score) * self.semantic;
        floor_score(blended)
    }
}

/// `floor(100 * part / whole)` as an integer in 0..=100; 0 when `whole` is 0.
pub fn percent_floor(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0;
    }
    floor_score(100.0 * part / whole)
}

pub(crate) fn floor_score(value: f64) -> u32 {
    let floored = (value + FLOOR_EPSILON).floor().clamp(0.0, 100.0);
    // clamped to 0..=100 above
    floored as u32
}

/// Round to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
