//! Tavily search API adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use blogsquad_shared::{BlogSquadError, Result, SearchResult, TavilyConfig};

use crate::SearchProvider;

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("BlogSquad/", env!("CARGO_PKG_VERSION"));

/// Longest error body we echo back into an error message.
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for [`TavilySearch`].
#[derive(Debug, Clone)]
pub struct TavilyOptions {
    pub base_url: String,
    pub timeout_secs: u64,
    /// "basic" or "advanced".
    pub search_depth: String,
}

impl Default for TavilyOptions {
    fn default() -> Self {
        Self::from(&TavilyConfig::default())
    }
}

impl From<&TavilyConfig> for TavilyOptions {
    fn from(config: &TavilyConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
            search_depth: config.search_depth.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
}

impl From<TavilyHit> for SearchResult {
    fn from(hit: TavilyHit) -> Self {
        Self {
            title: hit.title,
            url: hit.url,
            snippet: hit.content,
            score: hit.score,
        }
    }
}

/// Search client for `POST {base_url}/search`.
pub struct TavilySearch {
    client: Client,
    api_key: String,
    endpoint: String,
    search_depth: String,
}

impl TavilySearch {
    /// Build a client. The key is taken as-is; callers resolve it from the environment.
    pub fn new(api_key: impl Into<String>, opts: &TavilyOptions) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(BlogSquadError::SearchUnavailable("Tavily API key is empty".into()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| {
                BlogSquadError::SearchUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/search", opts.base_url.trim_end_matches('/')),
            search_depth: opts.search_depth.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    #[instrument(skip(self), fields(provider = "tavily"))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let request = SearchRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BlogSquadError::SearchUnavailable(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(BlogSquadError::SearchUnavailable(format!(
                "HTTP {status}: {excerpt}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            BlogSquadError::SearchUnavailable(format!("failed to read response body: {e}"))
        })?;

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            BlogSquadError::SearchUnavailable(format!("invalid search response: {e}"))
        })?;

        let results: Vec<SearchResult> = parsed
            .results
            .into_iter()
            .take(max_results)
            .map(SearchResult::from)
            .collect();

        debug!(hits = results.len(), "search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(server: &MockServer) -> TavilyOptions {
        TavilyOptions {
            base_url: server.uri(),
            timeout_secs: 5,
            search_depth: "basic".into(),
        }
    }

    #[test]
    fn empty_key_rejected() {
        let result = TavilySearch::new("  ", &TavilyOptions::default());
        assert!(matches!(result, Err(BlogSquadError::SearchUnavailable(_))));
    }

    #[tokio::test]
    async fn search_maps_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_partial_json(serde_json::json!({
                "query": "agentic ai",
                "max_results": 3,
                "search_depth": "basic"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "agentic ai",
                "results": [
                    {"title": "A", "url": "http://a", "content": "x", "score": 0.91},
                    {"title": "B", "url": "http://b", "content": "y"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let search = TavilySearch::new("tvly-test", &options(&server)).unwrap();
        let results = search.search("agentic ai", 3).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "A");
        assert_eq!(results[0].url, "http://a");
        assert_eq!(results[0].snippet, "x");
        assert_eq!(results[0].score, Some(0.91));
        assert_eq!(results[1].score, None);
    }

    #[tokio::test]
    async fn search_truncates_to_max_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"title": "1", "url": "http://1", "content": "a"},
                    {"title": "2", "url": "http://2", "content": "b"},
                    {"title": "3", "url": "http://3", "content": "c"}
                ]
            })))
            .mount(&server)
            .await;

        let search = TavilySearch::new("key", &options(&server)).unwrap();
        let results = search.search("q", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "2");
    }

    #[tokio::test]
    async fn auth_failure_is_search_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"detail":{"error":"Unauthorized"}}"#),
            )
            .mount(&server)
            .await;

        let search = TavilySearch::new("bad-key", &options(&server)).unwrap();
        let err = search.search("q", 3).await.unwrap_err();
        match err {
            BlogSquadError::SearchUnavailable(msg) => assert!(msg.contains("401")),
            other => panic!("expected SearchUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_search_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let search = TavilySearch::new("key", &options(&server)).unwrap();
        let err = search.search("q", 3).await.unwrap_err();
        assert!(err.to_string().contains("invalid search response"));
    }

    #[tokio::test]
    async fn missing_results_field_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"query": "q"})))
            .mount(&server)
            .await;

        let search = TavilySearch::new("key", &options(&server)).unwrap();
        assert!(search.search("q", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refused_connection_is_search_unavailable() {
        let opts = TavilyOptions {
            base_url: "http://127.0.0.1:1".into(),
            ..TavilyOptions::default()
        };
        let search = TavilySearch::new("key", &opts).unwrap();

        let err = search.search("q", 3).await.unwrap_err();
        match err {
            BlogSquadError::SearchUnavailable(msg) => {
                assert!(msg.contains("127.0.0.1:1/search"));
            }
            other => panic!("expected SearchUnavailable, got {other:?}"),
        }
    }
}
