use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use super::fixture::TestFixture;

const ANALYST_TEXT: &str = "SQL and Excel";

const BACKEND_RESUME: &str = "Python developer building REST APIs with Django and PostgreSQL";

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("ats").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("score"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("ats").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_score_without_resume_is_usage_error() {
    let mut cmd = Command::cargo_bin("ats").unwrap();
    cmd.args(["score", "Data Analyst"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--resume"));
}

#[test]
fn test_roles_json_lists_builtin_roles() {
    let fixture = TestFixture::new("roles_json");
    let output = fixture.run_ats(&["roles", "-O", "json"]);
    assert_command_success!(output);

    let json = output.json();
    let roles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["role"].as_str().unwrap())
        .collect();
    assert!(roles.contains(&"Data Analyst"));
    assert!(roles.contains(&"Software Engineer"));
    assert!(json[0].get("core").is_none());
}

#[test]
fn test_roles_detailed_plain() {
    let fixture = TestFixture::new("roles_detailed");
    let output = fixture.run_ats(&["roles", "--detailed", "-O", "plain"]);
    assert_command_success!(output);
    assert!(output.stdout.contains("Data Analyst (6 core, 4 optional)"));
    assert!(output.stdout.contains("sql (10)"));
}

#[test]
fn test_score_json_breakdown() {
    let fixture = TestFixture::new("score_json");
    let output = fixture.run_ats(&["score", "Data Analyst", "--text", ANALYST_TEXT, "-O", "json"]);
    assert_command_success!(output);

    let json = output.json();
    let breakdown = &json["breakdown"];
    // sql 10 + excel 8 of 68 total weight
    assert_eq!(breakdown["keyword_score"], 26);
    assert_eq!(breakdown["job_role"], "Data Analyst");
    assert_eq!(breakdown["mode"], "hybrid");
    assert!(json["final_score"].as_u64().unwrap() <= 100);
    assert_eq!(json["final_score"], breakdown["final_score"]);
    assert!(json["suggestions"].as_array().unwrap().len() <= 5);
}

#[test]
fn test_score_resume_file_and_skills() {
    let fixture = TestFixture::new("score_file");
    let resume = fixture.write_file("resume.txt", "Built dashboards.\n");
    let output = fixture.run_ats(&[
        "score",
        "Data Analyst",
        "--resume",
        resume.to_str().unwrap(),
        "--skills",
        "sql, excel",
        "--keyword-only",
        "-O",
        "json",
    ]);
    assert_command_success!(output);

    let json = output.json();
    assert_eq!(json["final_score"], 26);
    assert_eq!(json["breakdown"]["mode"], "keyword_only");
    assert_eq!(json["breakdown"]["matched_core"][0]["source"], "skill_list");
}

#[test]
fn test_score_defaults_to_configured_role() {
    let fixture = TestFixture::new("score_default_role");
    let output = fixture.run_ats(&["score", "--text", "git and algorithms", "-O", "json"]);
    assert_command_success!(output);
    assert_eq!(output.json()["breakdown"]["job_role"], "Software Engineer");
}

#[test]
fn test_score_plain_output() {
    let fixture = TestFixture::new("score_plain");
    let output = fixture.run_ats(&["score", "Data Analyst", "--text", ANALYST_TEXT, "-O", "plain"]);
    assert_command_success!(output);
    assert!(output.stdout.contains("ATS score: Data Analyst"));
    assert!(output.stdout.contains("Missing core"));
    assert!(!output.stdout.contains('\u{1b}'));
}

#[test]
fn test_unknown_role_json_error() {
    let fixture = TestFixture::new("unknown_role");
    let output = fixture.run_ats(&["score", "Astronaut", "--text", "x", "-O", "json"]);

    assert!(!output.success);
    assert_eq!(output.exit_code, 1);
    let json = output.json();
    assert_eq!(json["code"], "ROLE_NOT_FOUND");
    assert_eq!(json["numeric_code"], 101);
    assert_eq!(json["retryable"], false);
}

#[test]
fn test_unknown_role_human_error() {
    let fixture = TestFixture::new("unknown_role_human");
    let output = fixture.run_ats(&["score", "Astronaut", "--text", "x"]);

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("Error:"));
    assert!(output.stderr.contains("Astronaut"));
    assert!(output.stderr.contains("hint:"));
}

#[test]
fn test_invalid_weights_rejected() {
    let fixture = TestFixture::new("invalid_weights");
    let output = fixture.run_ats(&[
        "score",
        "Data Analyst",
        "--text",
        ANALYST_TEXT,
        "--keyword-weight",
        "0.5",
        "--semantic-weight",
        "0.6",
        "-O",
        "json",
    ]);
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["code"], "WEIGHTS_INVALID");
}

#[test]
fn test_compare_reports_failed_roles_last() {
    let fixture = TestFixture::new("compare");
    let output = fixture.run_ats(&[
        "compare",
        "--roles",
        "Astronaut,DevOps Engineer,Data Analyst",
        "--text",
        "SQL Excel Python statistics data analysis",
        "-O",
        "json",
    ]);
    assert_command_success!(output);

    let json = output.json();
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["job_role"], "Data Analyst");
    let last = &results[2];
    assert_eq!(last["job_role"], "Astronaut");
    assert_eq!(last["final_score"], 0);
    assert_eq!(last["error"]["code"], "ROLE_NOT_FOUND");
}

#[test]
fn test_gap_json() {
    let fixture = TestFixture::new("gap");
    let output = fixture.run_ats(&[
        "gap",
        "--required",
        "python,sql,kubernetes",
        "--text",
        "python sql",
        "-O",
        "json",
    ]);
    assert_command_success!(output);

    let json = output.json();
    let matched: Vec<&str> = json["matched"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["skill"].as_str().unwrap())
        .collect();
    assert_eq!(matched, vec!["python", "sql"]);
    assert_eq!(json["missing"], serde_json::json!(["kubernetes"]));
}

#[test]
fn test_gap_sorted_omits_missing() {
    let fixture = TestFixture::new("gap_sorted");
    let output = fixture.run_ats(&[
        "gap",
        "--required",
        "python,kubernetes",
        "--text",
        "python sql",
        "--sorted",
        "-O",
        "json",
    ]);
    assert_command_success!(output);
    let json = output.json();
    assert_eq!(json["matched"].as_array().unwrap().len(), 1);
    assert!(json.get("missing").is_none());
}

#[test]
fn test_gap_needs_required_or_role() {
    let fixture = TestFixture::new("gap_missing_input");
    let output = fixture.run_ats(&["gap", "--text", "python", "-O", "json"]);
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["code"], "CONFIG_MISSING_REQUIRED");
}

#[test]
fn test_coverage_plain() {
    let fixture = TestFixture::new("coverage");
    let output = fixture.run_ats(&[
        "coverage",
        "--required",
        "python,sql,rust",
        "--text",
        "python sql",
        "-O",
        "plain",
    ]);
    assert_command_success!(output);
    assert!(output.stdout.contains("66.67% (2 of 3)"));
    assert!(output.stdout.contains("Good coverage"));
}

#[test]
fn test_report_json() {
    let fixture = TestFixture::new("report");
    let output = fixture.run_ats(&[
        "report",
        "Data Analyst",
        "--text",
        ANALYST_TEXT,
        "--skills",
        "sql",
        "-O",
        "json",
    ]);
    assert_command_success!(output);

    let json = output.json();
    assert_eq!(json["ats_analysis"]["job_role"], "Data Analyst");
    assert_eq!(json["format_analysis"]["is_compliant"], false);
    assert_eq!(
        json["priority_actions"][0],
        "Resume is too short (< 200 words)"
    );
    assert!(json["overall_score"].as_u64().unwrap() <= 100);
}

#[test]
fn test_jobs_recommendation() {
    let fixture = TestFixture::new("jobs");
    let jobs = fixture.write_file(
        "jobs.json",
        r#"[
  {"title": "Pastry Chef", "description": "Bake bread and pastries in a busy kitchen"},
  {"title": "Django Developer", "description": "Python developer for Django and PostgreSQL services"},
  {"title": "Backend Engineer", "description": "Backend engineer building REST APIs in Python and Django"}
]"#,
    );
    let output = fixture.run_ats(&[
        "jobs",
        "--jobs",
        jobs.to_str().unwrap(),
        "--text",
        BACKEND_RESUME,
        "--threshold",
        "0.3",
        "-O",
        "json",
    ]);
    assert_command_success!(output);

    let json = output.json();
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Backend Engineer", "Django Developer"]);
}

#[test]
fn test_config_defaults_json() {
    let fixture = TestFixture::new("config_defaults");
    let output = fixture.run_ats(&["config", "-O", "json"]);
    assert_command_success!(output);

    let json = output.json();
    assert_eq!(json["scoring"]["keyword_weight"], 0.4);
    assert_eq!(json["scoring"]["semantic_weight"], 0.6);
    assert_eq!(json["embedding"]["backend"], "hash");
    assert_eq!(json["cache"]["max_entries"], 1000);
}

#[test]
fn test_config_human_is_toml() {
    let fixture = TestFixture::new("config_toml");
    let output = fixture.run_ats(&["config"]);
    assert_command_success!(output);
    assert!(output.stdout.contains("[scoring]"));
    assert!(output.stdout.contains("similarity_threshold = 0.55"));
}

#[test]
fn test_project_config_overrides_weights() {
    let fixture = TestFixture::new("project_config");
    fixture.write_file(
        ".resume-ats.toml",
        "[scoring]\nkeyword_weight = 1.0\nsemantic_weight = 0.0\n",
    );

    let output = fixture.run_ats(&["score", "Data Analyst", "--text", ANALYST_TEXT, "-O", "json"]);
    assert_command_success!(output);
    assert_eq!(output.json()["final_score"], 26);
}

#[test]
fn test_global_config_taxonomy_path() {
    let fixture = TestFixture::new("global_taxonomy");
    let taxonomy = fixture.write_file(
        "roles.json",
        r#"{"Baker": {"core": {"sourdough": 3, "lamination": 2}, "optional": {}}}"#,
    );
    fixture.write_global_config(&format!(
        "[taxonomy]\npath = '{}'\ndefault_role = \"Baker\"\n",
        taxonomy.display()
    ));

    let output = fixture.run_ats(&["roles", "-O", "json"]);
    assert_command_success!(output);
    let json = output.json();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["role"], "Baker");
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let fixture = TestFixture::new("bad_config");
    fixture.write_file(".resume-ats.toml", "[scoring]\nbogus = 1\n");

    let output = fixture.run_ats(&["config", "-O", "json"]);
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["code"], "CONFIG_INVALID");
}

#[test]
fn test_explicit_config_must_exist() {
    let fixture = TestFixture::new("missing_explicit");
    let output = fixture.run_ats(&["--config", "nope.toml", "config", "-O", "json"]);
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["code"], "CONFIG_NOT_FOUND");
}

#[test]
fn test_env_override_is_validated() {
    let fixture = TestFixture::new("env_override");
    let output = fixture.run_ats_with_env(
        &["config", "-O", "json"],
        &[("RESUME_ATS_KEYWORD_WEIGHT", "0.5")],
    );
    assert_eq!(output.exit_code, 1);
    assert_eq!(output.json()["code"], "WEIGHTS_INVALID");
}

#[test]
fn test_env_override_applies() {
    let fixture = TestFixture::new("env_override_ok");
    let output = fixture.run_ats_with_env(
        &["config", "-O", "json"],
        &[
            ("RESUME_ATS_KEYWORD_WEIGHT", "0.3"),
            ("RESUME_ATS_SEMANTIC_WEIGHT", "0.7"),
            ("RESUME_ATS_CACHE_DISABLED", "1"),
        ],
    );
    assert_command_success!(output);

    let json: Value = output.json();
    assert_eq!(json["scoring"]["keyword_weight"], 0.3);
    assert_eq!(json["cache"]["enabled"], false);
}
