//! Web search collaborator for the research stage.
//!
//! The pipeline only sees the [`SearchProvider`] trait: "given a query,
//! return up to K ranked results". [`TavilySearch`] is the production
//! adapter; tests substitute their own implementations.

mod tavily;

use async_trait::async_trait;
use blogsquad_shared::{Result, SearchResult};

pub use tavily::{TavilyOptions, TavilySearch};

/// A web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Run `query` and return at most `max_results` ranked hits.
    ///
    /// Failures surface as `BlogSquadError::SearchUnavailable`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Render search hits as the plain-text block embedded in the research prompt.
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No search results found.".to_string();
    }

    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}. {}\n   URL: {}\n   {}\n",
            i + 1,
            result.title.trim(),
            result.url.trim(),
            result.snippet.trim()
        ));
    }
    out
}
