//! Integration tests: engine scenarios and the `ats` binary.

#[macro_use]
mod fixture;

mod cli_tests;
mod engine_tests;
