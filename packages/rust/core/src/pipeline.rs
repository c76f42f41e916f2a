//! End-to-end blog pipeline: topic → research → draft + evaluate → (improve) → done.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use blogsquad_llm::LanguageModel;
use blogsquad_search::SearchProvider;
use blogsquad_shared::{BlogSquadError, Generation, PipelineState, Result, RunId, SearchResult};

use crate::stages::{self, StageContext};
use crate::verdict::VerdictMatcher;

/// Search hits fed to the research stage unless the caller asks otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 3;

// ---------------------------------------------------------------------------
// Stage state machine
// ---------------------------------------------------------------------------

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Research,
    Draft,
    Improve,
    Terminal,
}

impl Stage {
    /// The stage that follows this one. `needs_improvement` only matters
    /// when leaving [`Stage::Draft`].
    pub fn next(self, needs_improvement: bool) -> Stage {
        match self {
            Stage::Research => Stage::Draft,
            Stage::Draft if needs_improvement => Stage::Improve,
            Stage::Draft | Stage::Improve | Stage::Terminal => Stage::Terminal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Research => "Researching topic",
            Stage::Draft => "Drafting and evaluating",
            Stage::Improve => "Improving draft",
            Stage::Terminal => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// Request / output
// ---------------------------------------------------------------------------

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Subject of the blog post.
    pub topic: String,
    /// Model identifier passed to every language model call.
    pub model_id: String,
    /// Search hits fed to the research stage.
    pub max_results: usize,
    /// Strategy used to read the evaluation verdict.
    pub matcher: VerdictMatcher,
}

impl PipelineRequest {
    pub fn new(topic: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            model_id: model_id.into(),
            max_results: DEFAULT_MAX_RESULTS,
            matcher: VerdictMatcher::default(),
        }
    }

    /// Reject blank inputs before any collaborator is touched.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(BlogSquadError::empty_input("topic"));
        }
        if self.model_id.trim().is_empty() {
            return Err(BlogSquadError::empty_input("model id"));
        }
        if self.max_results == 0 {
            return Err(BlogSquadError::config("max_results must be at least 1"));
        }
        Ok(())
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub run_id: RunId,
    pub topic: String,
    pub model: String,
    /// Research brief (summary plus source list).
    pub research: String,
    pub initial_draft: String,
    /// Raw reply of the evaluation call.
    pub evaluation: String,
    /// Routing flag as set by the evaluation, before any improvement.
    pub needs_improvement: bool,
    /// Revision, present only when the improve stage ran.
    pub improved_draft: Option<String>,
    /// The improved draft when present, otherwise the initial draft.
    pub final_draft: String,
    /// Search hits the research brief was written from.
    pub sources: Vec<SearchResult>,
    pub model_calls: usize,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl PipelineOutput {
    pub fn was_improved(&self) -> bool {
        self.improved_draft.is_some()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when the run enters a stage (including [`Stage::Terminal`]).
    fn stage(&self, stage: Stage);
    /// Called once after a successful run.
    fn done(&self, output: &PipelineOutput);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: Stage) {}
    fn done(&self, _output: &PipelineOutput) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Usage {
    calls: usize,
    tokens_in: u64,
    tokens_out: u64,
}

impl Usage {
    fn record(&mut self, generation: &Generation) {
        self.calls += 1;
        self.tokens_in += generation.tokens_in;
        self.tokens_out += generation.tokens_out;
    }
}

/// Run the full pipeline.
///
/// 1. Research: one search, one summary call
/// 2. Draft: one drafting call, one evaluation call
/// 3. Improve: one revision call, only if the verdict failed
///
/// Any collaborator error aborts the run; nothing partial is returned.
#[instrument(skip_all, fields(topic = %request.topic, model = %request.model_id))]
pub async fn run_pipeline(
    request: &PipelineRequest,
    search: &dyn SearchProvider,
    model: &dyn LanguageModel,
    progress: &dyn ProgressReporter,
) -> Result<PipelineOutput> {
    request.validate()?;

    let start = Instant::now();
    let started_at = Utc::now();
    let run_id = RunId::new();
    let model_id = request.model_id.trim();

    info!(%run_id, search = search.name(), llm = model.name(), "starting blog pipeline");

    let ctx = StageContext {
        model_id,
        max_results: request.max_results,
        matcher: request.matcher,
        search,
        model,
    };
    let mut state = PipelineState::new(request.topic.trim());
    let mut usage = Usage::default();

    // --- Research ---
    progress.stage(Stage::Research);
    let researched = stages::research(&state, &ctx).await?;
    usage.record(&researched.summary);
    state.set_research(researched.summary.text);

    // --- Draft + evaluate ---
    let mut stage = Stage::Research.next(false);
    progress.stage(stage);
    let drafted = stages::draft_and_evaluate(&state, &ctx).await?;
    usage.record(&drafted.draft);
    usage.record(&drafted.evaluation);
    let initial_draft = drafted.draft.text.clone();
    state.set_draft(drafted.draft.text, drafted.needs_improvement);

    // --- Route ---
    stage = stage.next(state.needs_improvement());
    let improved_draft = match stage {
        Stage::Improve => {
            progress.stage(stage);
            let improved = stages::improve(&state, &ctx).await?;
            usage.record(&improved);
            state.apply_improvement(improved.text.clone());
            stage = stage.next(state.needs_improvement());
            Some(improved.text)
        }
        _ => None,
    };
    debug_assert_eq!(stage, Stage::Terminal);
    progress.stage(Stage::Terminal);

    let output = PipelineOutput {
        run_id,
        topic: state.topic().to_string(),
        model: model_id.to_string(),
        research: state.research().to_string(),
        initial_draft,
        evaluation: drafted.evaluation.text,
        needs_improvement: drafted.needs_improvement,
        improved_draft,
        final_draft: state.blog_draft().to_string(),
        sources: researched.sources,
        model_calls: usage.calls,
        tokens_in: usage.tokens_in,
        tokens_out: usage.tokens_out,
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    progress.done(&output);

    info!(
        run_id = %output.run_id,
        improved = output.was_improved(),
        model_calls = output.model_calls,
        tokens_in = output.tokens_in,
        tokens_out = output.tokens_out,
        elapsed_ms = output.elapsed_ms,
        "blog pipeline complete"
    );

    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
