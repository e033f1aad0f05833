//! Shared test utilities for resume-ats: fixture taxonomies, instrumented
//! embedders and test logging.

pub mod fixtures;
pub mod logging;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run table-driven tests, reporting the failing case by name.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F)
where
    I: std::fmt::Debug + Clone,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    for case in cases {
        let actual = test_fn(case.input.clone());
        assert_eq!(
            actual, case.expected,
            "case '{}' failed for input {:?}",
            case.name, case.input
        );
    }
}
