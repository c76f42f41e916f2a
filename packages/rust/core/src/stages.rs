//! The three pipeline stages: research, draft + evaluate, improve.
//!
//! Each stage reads what it needs from the [`PipelineState`], makes its
//! collaborator calls in order, and hands back an outcome. The orchestrator
//! is the only writer of the state.

use tracing::{debug, info, instrument, warn};

use blogsquad_llm::LanguageModel;
use blogsquad_search::{SearchProvider, format_results};
use blogsquad_shared::{BlogSquadError, Generation, PipelineState, Result, SearchResult};

use crate::prompts;
use crate::verdict::VerdictMatcher;

/// Collaborators and per-run settings shared by every stage.
pub struct StageContext<'a> {
    pub model_id: &'a str,
    pub max_results: usize,
    pub matcher: VerdictMatcher,
    pub search: &'a dyn SearchProvider,
    pub model: &'a dyn LanguageModel,
}

/// Output of the research stage.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// The search hits the brief was written from.
    pub sources: Vec<SearchResult>,
    /// The model's brief, passed through unvalidated.
    pub summary: Generation,
}

/// Output of the draft + evaluate stage.
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub draft: Generation,
    pub evaluation: Generation,
    pub needs_improvement: bool,
}

/// Search the topic and have the model condense the hits into a brief.
#[instrument(skip_all, fields(topic = %state.topic(), max_results = ctx.max_results))]
pub async fn research(state: &PipelineState, ctx: &StageContext<'_>) -> Result<ResearchOutcome> {
    let sources = ctx.search.search(state.topic(), ctx.max_results).await?;
    info!(provider = ctx.search.name(), hits = sources.len(), "search complete");

    let prompt = prompts::research_prompt(state.topic(), &format_results(&sources));
    let summary = ctx.model.generate(ctx.model_id, &prompt).await?;

    if !summary.text.contains(prompts::SOURCES_HEADING) {
        debug!("research brief has no sources section");
    }
    info!(chars = summary.text.len(), "research brief ready");

    Ok(ResearchOutcome { sources, summary })
}

/// Draft the post from the brief, then ask the model to grade it.
#[instrument(skip_all, fields(topic = %state.topic(), research_len = state.research().len()))]
pub async fn draft_and_evaluate(
    state: &PipelineState,
    ctx: &StageContext<'_>,
) -> Result<DraftOutcome> {
    let draft = ctx
        .model
        .generate(ctx.model_id, &prompts::draft_prompt(state.topic(), state.research()))
        .await?;
    info!(words = word_count(&draft.text), "draft written");

    let evaluation = ctx
        .model
        .generate(ctx.model_id, &prompts::evaluation_prompt(&draft.text))
        .await?;
    let needs_improvement = ctx.matcher.is_failing(&evaluation.text);

    info!(
        verdict = evaluation.text.trim(),
        needs_improvement,
        matcher = ?ctx.matcher,
        "draft evaluated"
    );

    Ok(DraftOutcome {
        draft,
        evaluation,
        needs_improvement,
    })
}

/// Revise the current draft once. The result is not evaluated again.
///
/// A blank draft fails with `EmptyInput` before the model is called.
#[instrument(skip_all, fields(draft_words = word_count(state.blog_draft())))]
pub async fn improve(state: &PipelineState, ctx: &StageContext<'_>) -> Result<Generation> {
    if state.blog_draft().trim().is_empty() {
        warn!("refusing to improve an empty draft");
        return Err(BlogSquadError::empty_input("blog_draft"));
    }

    let improved = ctx
        .model
        .generate(ctx.model_id, &prompts::improve_prompt(state.blog_draft()))
        .await?;
    info!(words = word_count(&improved.text), "draft improved");

    Ok(improved)
}

/// Whitespace-delimited word count, as used in the evaluation rubric.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
