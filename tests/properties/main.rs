//! Property tests for scoring bounds, gap partition and cache behavior.

mod cache_props;
mod scoring_props;
