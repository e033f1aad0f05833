use std::sync::Arc;
use std::time::Duration;

use resume_ats::config::Config;
use resume_ats::error::{AtsError, ErrorClass};
use resume_ats::scoring::{RecommendationTier, ScoreWeights, ScoringMode};
use resume_ats::semantic::{EmbeddingGenerator, HashEmbedder};
use resume_ats::taxonomy::Taxonomy;
use resume_ats::test_utils::fixtures::{
    CountingEmbedder, DATA_ANALYST_RESUME, FailingEmbedder, SlowEmbedder, UNRELATED_RESUME,
    sample_taxonomy,
};
use resume_ats::test_utils::logging::TestLogger;
use resume_ats::test_utils::{TestCase, run_table_tests};
use resume_ats::AtsEngine;

fn sample_engine(config: Config) -> AtsEngine {
    AtsEngine::with_embedder(config, sample_taxonomy(), Arc::new(HashEmbedder::default())).unwrap()
}

#[test]
fn full_scoring_workflow_on_builtin_taxonomy() {
    let log = TestLogger::new("full_scoring_workflow_on_builtin_taxonomy");
    let engine = AtsEngine::new(Config::default()).unwrap();

    log.step("hybrid score");
    let skills = ["SQL", "Excel", "Python", "Tableau"];
    let (score, breakdown) = engine
        .hybrid_ats_score(DATA_ANALYST_RESUME, &skills, "Data Analyst", None)
        .unwrap();
    log.log_actual("breakdown", &breakdown);

    assert!(score <= 100);
    assert_eq!(breakdown.mode, ScoringMode::Hybrid);
    assert_eq!(breakdown.weights, ScoreWeights::default());
    assert_eq!(breakdown.recommendation, RecommendationTier::from_score(score));
    assert!(breakdown.keyword_score >= 50);
    assert!(breakdown.missing_core.iter().all(|skill| skill != "sql"));

    log.step("suggestions");
    let suggestions = engine.improvement_suggestions(&breakdown);
    assert!(suggestions.len() <= 5);

    log.step("report");
    let report = engine
        .generate_report(DATA_ANALYST_RESUME, &skills, "Data Analyst")
        .unwrap();
    assert_eq!(report.ats_analysis.ats_score, score);

    engine.shutdown();
    assert!(!engine.generator().is_loaded());
    log.pass();
}

#[test]
fn unrelated_resume_scores_low() {
    let engine = AtsEngine::new(Config::default()).unwrap();
    let empty: [&str; 0] = [];
    let (score, breakdown) = engine
        .hybrid_ats_score(UNRELATED_RESUME, &empty, "Data Analyst", None)
        .unwrap();

    assert_eq!(breakdown.keyword_score, 0);
    assert!(score < 40);
    assert_eq!(breakdown.recommendation, RecommendationTier::Low);
}

#[test]
fn role_lookup_is_case_insensitive() {
    let engine = sample_engine(Config::default());
    let (_, breakdown) = engine
        .hybrid_ats_score("python", &["python"], "python dev", None)
        .unwrap();
    assert_eq!(breakdown.job_role, "Python Dev");
}

#[test]
fn unknown_role_lists_alternatives() {
    let engine = sample_engine(Config::default());
    let err = engine
        .hybrid_ats_score("python", &["python"], "Data Analyzt", None)
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Configuration);
    assert!(!err.is_retryable());
    let structured = err.to_structured();
    assert!(structured.suggestion.contains("Data Analyst"));
}

#[test]
fn timeout_is_transient() {
    let generator = EmbeddingGenerator::with_embedder(Arc::new(SlowEmbedder::new(
        Duration::from_millis(500),
    )))
    .with_timeout(Duration::from_millis(20));
    let engine = AtsEngine::from_parts(Config::default(), sample_taxonomy(), generator).unwrap();

    let err = engine
        .hybrid_ats_score("python developer", &["python"], "Python Dev", None)
        .unwrap_err();

    assert!(matches!(err, AtsError::Timeout(_)));
    assert_eq!(err.class(), ErrorClass::Transient);
    assert!(err.is_retryable());
}

#[test]
fn model_unavailable_keeps_keyword_scoring_usable() {
    let engine = AtsEngine::with_embedder(
        Config::default(),
        sample_taxonomy(),
        Arc::new(FailingEmbedder),
    )
    .unwrap();

    let err = engine
        .hybrid_ats_score("python", &["python"], "Python Dev", None)
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::ModelUnavailable);

    let keyword = engine
        .keyword_score("experienced python developer", &["python"], "Python Dev")
        .unwrap();
    assert_eq!(keyword.score, 50);
}

#[test]
fn compare_isolates_failing_roles() {
    let engine = sample_engine(Config::default());
    let results = engine
        .compare_ats_scores(
            "docker kubernetes terraform",
            &["docker"],
            &["Python Dev", "Nope", "DevOps"],
            None,
        )
        .unwrap();

    assert_eq!(results[0].job_role, "DevOps");
    assert!(results[0].is_ok());
    let failed: Vec<_> = results.iter().filter(|r| !r.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].job_role, "Nope");
}

#[test]
fn repeated_scoring_hits_the_cache() {
    let embedder = Arc::new(CountingEmbedder::new(384));
    let engine =
        AtsEngine::with_embedder(Config::default(), sample_taxonomy(), embedder.clone()).unwrap();

    engine
        .hybrid_ats_score(DATA_ANALYST_RESUME, &["sql"], "Data Analyst", None)
        .unwrap();
    let calls_after_first = embedder.calls();
    let misses_after_first = engine.cache_stats().unwrap().misses;

    engine
        .hybrid_ats_score(DATA_ANALYST_RESUME, &["sql"], "Data Analyst", None)
        .unwrap();

    assert_eq!(embedder.calls(), calls_after_first);
    let stats = engine.cache_stats().unwrap();
    assert_eq!(stats.misses, misses_after_first);
    assert!(stats.hits > 0);
}

#[test]
fn skill_gap_partitions_required_skills() {
    let engine = sample_engine(Config::default());
    let required = ["machine learning", "underwater basket weaving", "python"];
    let gap = engine
        .semantic_skill_gap(
            "I built machine learning models in Python",
            &required,
            Some(0.5),
        )
        .unwrap();

    let mut names: Vec<&str> = gap
        .matched
        .iter()
        .map(|m| m.skill.as_str())
        .chain(gap.missing.iter().map(String::as_str))
        .collect();
    names.sort_unstable();
    let mut expected = required.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);
    assert!(gap.matched.iter().any(|m| m.skill == "machine learning" && m.similarity > 50.0));
    assert!(gap.missing.contains(&"underwater basket weaving".to_string()));
}

#[test]
fn custom_taxonomy_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roles.json");
    std::fs::write(
        &path,
        r#"{"Baker": {"core": {"Sourdough": 3, "lamination": 1}, "optional": {"cake decorating": 1}}}"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.taxonomy.path = Some(path);
    let engine = AtsEngine::new(config).unwrap();

    assert_eq!(engine.available_job_roles(), vec!["Baker".to_string()]);
    let keyword = engine
        .keyword_score("Ten years of sourdough baking", &[] as &[&str], "Baker")
        .unwrap();
    assert_eq!(keyword.score, 60);
}

#[test]
fn invalid_taxonomy_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roles.json");
    std::fs::write(&path, r#"{"Baker": {"core": {"sourdough": -1}}}"#).unwrap();

    let err = Taxonomy::from_path(&path).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn recommendation_tiers_table() {
    run_table_tests(
        vec![
            TestCase { name: "top", input: 100, expected: RecommendationTier::Excellent },
            TestCase { name: "excellent edge", input: 80, expected: RecommendationTier::Excellent },
            TestCase { name: "good", input: 65, expected: RecommendationTier::Good },
            TestCase { name: "fair edge", input: 40, expected: RecommendationTier::Fair },
            TestCase { name: "low", input: 12, expected: RecommendationTier::Low },
        ],
        RecommendationTier::from_score,
    );
}
