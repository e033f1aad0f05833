use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use resume_ats::config::Config;
use resume_ats::scoring::{HybridScorer, ScoreWeights, score_keywords, score_semantic};
use resume_ats::semantic::{EmbeddingGenerator, HashEmbedder};
use resume_ats::test_utils::fixtures::sample_taxonomy;
use resume_ats::AtsEngine;

const VOCABULARY: &[&str] = &[
    "python", "sql", "docker", "kubernetes", "terraform", "excel", "tableau", "statistics",
    "machine learning", "data analysis", "react", "pastry", "django", "linux",
];

const ROLES: &[&str] = &["Python Dev", "DevOps", "Data Analyst"];

fn arb_skill() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(VOCABULARY).prop_map(str::to_string),
        "[a-z]{2,10}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_skill(), 0..12).prop_map(|words| words.join(" "))
}

fn arb_skills() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_skill(), 0..8)
}

fn generator() -> EmbeddingGenerator {
    EmbeddingGenerator::with_embedder(Arc::new(HashEmbedder::new(128)))
}

fn engine() -> AtsEngine {
    AtsEngine::with_embedder(
        Config::default(),
        sample_taxonomy(),
        Arc::new(HashEmbedder::new(128)),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn keyword_and_semantic_scores_are_bounded(
        text in arb_text(),
        skills in arb_skills(),
        role in prop::sample::select(ROLES),
        threshold in 0.0f64..=1.0,
    ) {
        let taxonomy = sample_taxonomy();
        let generator = generator();
        let role_skills = taxonomy.role(role).unwrap();

        let keyword = score_keywords(role_skills, &skills, &text);
        prop_assert!(keyword.score <= 100);

        let semantic = score_semantic(&generator, &text, &role_skills.core, threshold).unwrap();
        prop_assert!(semantic.score <= 100);
    }

    #[test]
    fn hybrid_score_is_bounded_and_fused(
        text in arb_text(),
        skills in arb_skills(),
        role in prop::sample::select(ROLES),
        keyword_weight in 0.0f64..=1.0,
    ) {
        let taxonomy = sample_taxonomy();
        let generator = generator();
        let scorer = HybridScorer::new(&taxonomy, &generator, 0.55);
        let weights = ScoreWeights::new(keyword_weight, 1.0 - keyword_weight).unwrap();

        let (score, breakdown) = scorer.score(&text, &skills, role, weights).unwrap();
        prop_assert!(score <= 100);
        prop_assert_eq!(score, weights.fuse(breakdown.keyword_score, breakdown.semantic_score));
    }

    #[test]
    fn keyword_weight_one_equals_keyword_score(
        text in arb_text(),
        skills in arb_skills(),
        role in prop::sample::select(ROLES),
    ) {
        let engine = engine();
        let (score, _) = engine
            .hybrid_ats_score(&text, &skills, role, Some(ScoreWeights::keyword_only()))
            .unwrap();
        let keyword = engine.keyword_score(&text, &skills, role).unwrap();
        prop_assert_eq!(score, keyword.score);
    }

    #[test]
    fn gap_partitions_required_skills(
        text in arb_text(),
        required in arb_skills(),
        threshold in 0.0f64..=1.0,
    ) {
        let engine = engine();
        let gap = engine.semantic_skill_gap(&text, &required, Some(threshold)).unwrap();

        let names: Vec<&str> = gap
            .matched
            .iter()
            .map(|m| m.skill.as_str())
            .chain(gap.missing.iter().map(String::as_str))
            .collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        let expected: HashSet<&str> = required.iter().map(String::as_str).collect();

        prop_assert_eq!(names.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn raising_threshold_only_removes_matches(
        text in arb_text(),
        required in arb_skills(),
        low in 0.0f64..=1.0,
        high in 0.0f64..=1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let engine = engine();

        let loose = engine.semantic_skill_gap(&text, &required, Some(low)).unwrap();
        let strict = engine.semantic_skill_gap(&text, &required, Some(high)).unwrap();

        let loose_matched: HashSet<&str> = loose.matched.iter().map(|m| m.skill.as_str()).collect();
        for found in &strict.matched {
            prop_assert!(loose_matched.contains(found.skill.as_str()));
        }
    }

    #[test]
    fn invalid_weight_pairs_are_rejected(
        keyword in 0.0f64..=1.0,
        drift in 0.02f64..=0.5,
    ) {
        let result = ScoreWeights::new(keyword, 1.0 - keyword + drift);
        prop_assert!(result.is_err());
    }
}
