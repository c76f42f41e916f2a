//! Core domain types for BlogSquad pipeline runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Collaborator payloads
// ---------------------------------------------------------------------------

/// A single ranked web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Provider relevance score, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            score: None,
        }
    }
}

/// Text produced by one language model call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    /// Model that actually served the request (as reported by the provider).
    pub model: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub latency_ms: u64,
}

impl Generation {
    /// A bare generation carrying only text, with no usage accounting.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// The record threaded through the pipeline stages for a single run.
///
/// Fields fill in dependency order: research, then the draft and its
/// verdict flag, then (optionally) the improved draft. The topic is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    topic: String,
    research: String,
    blog_draft: String,
    needs_improvement: bool,
}

impl PipelineState {
    /// Start a run with only the topic populated.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            research: String::new(),
            blog_draft: String::new(),
            needs_improvement: false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn research(&self) -> &str {
        &self.research
    }

    pub fn blog_draft(&self) -> &str {
        &self.blog_draft
    }

    pub fn needs_improvement(&self) -> bool {
        self.needs_improvement
    }

    /// Record the research brief.
    pub fn set_research(&mut self, research: String) {
        debug_assert!(self.blog_draft.is_empty(), "research recorded after draft");
        self.research = research;
    }

    /// Record the initial draft and the evaluation's routing flag.
    pub fn set_draft(&mut self, draft: String, needs_improvement: bool) {
        self.blog_draft = draft;
        self.needs_improvement = needs_improvement;
    }

    /// Replace the draft with its revision. The flag is always cleared since
    /// the revision is not evaluated again.
    pub fn apply_improvement(&mut self, improved: String) {
        self.blog_draft = improved;
        self.needs_improvement = false;
    }
}
