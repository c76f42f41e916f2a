//! Core pipeline orchestration and domain logic for BlogSquad.
//!
//! This crate ties the search and language model collaborators into the
//! research → draft/evaluate → improve workflow (see [`pipeline::run_pipeline`]).

pub mod export;
pub mod pipeline;
pub mod prompts;
pub mod stages;
pub mod verdict;

#[cfg(test)]
mod testing;

pub use pipeline::{
    DEFAULT_MAX_RESULTS, PipelineOutput, PipelineRequest, ProgressReporter, SilentProgress, Stage,
    run_pipeline,
};
pub use verdict::{VerdictMatcher, is_failing_verdict};
