//! Groq chat-completions adapter (OpenAI-compatible wire format).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use blogsquad_shared::{BlogSquadError, Generation, GroqConfig, Result};

use crate::LanguageModel;

/// User-Agent string for model requests.
const USER_AGENT: &str = concat!("BlogSquad/", env!("CARGO_PKG_VERSION"));

/// Longest error body we echo back into an error message.
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for [`GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqOptions {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GroqOptions {
    fn default() -> Self {
        Self::from(&GroqConfig::default())
    }
}

impl From<&GroqConfig> for GroqOptions {
    fn from(config: &GroqConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for `POST {base_url}/chat/completions`.
pub struct GroqClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GroqClient {
    /// Build a client. The key is taken as-is; callers resolve it from the environment.
    pub fn new(api_key: impl Into<String>, opts: &GroqOptions) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(BlogSquadError::ModelUnavailable("Groq API key is empty".into()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| {
                BlogSquadError::ModelUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", opts.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    #[instrument(skip(self, prompt), fields(provider = "groq", prompt_len = prompt.len()))]
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<Generation> {
        if model_id.trim().is_empty() {
            return Err(BlogSquadError::invalid_model(model_id));
        }

        let request = ChatRequest {
            model: model_id,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BlogSquadError::ModelUnavailable(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model request rejected");
            return Err(classify_error(status, &body, model_id));
        }

        let body = response.text().await.map_err(|e| {
            BlogSquadError::ModelUnavailable(format!("failed to read response body: {e}"))
        })?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            BlogSquadError::ModelUnavailable(format!("invalid completion response: {e}"))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                BlogSquadError::ModelUnavailable("completion response contains no choices".into())
            })?;

        let (tokens_in, tokens_out) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(response_len = text.len(), tokens_in, tokens_out, latency_ms, "completion received");

        Ok(Generation {
            text,
            model: parsed.model.unwrap_or_else(|| model_id.to_string()),
            tokens_in,
            tokens_out,
            latency_ms,
        })
    }
}

/// Map a non-2xx response to the error taxonomy.
fn classify_error(status: StatusCode, body: &str, model_id: &str) -> BlogSquadError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    // Only the error envelope identifies an unknown model; a bare 404 does not
    let unknown_model = api_error.as_ref().is_some_and(|e| {
        e.code.as_deref() == Some("model_not_found")
            || e.message.to_lowercase().contains("does not exist")
    });
    if unknown_model {
        return BlogSquadError::invalid_model(model_id);
    }

    let detail = match api_error {
        Some(e) if !e.message.is_empty() => e.message,
        _ => body.chars().take(MAX_ERROR_BODY).collect(),
    };

    if status == StatusCode::TOO_MANY_REQUESTS {
        BlogSquadError::ModelUnavailable(format!("rate limit exceeded (HTTP 429): {detail}"))
    } else {
        BlogSquadError::ModelUnavailable(format!("HTTP {status}: {detail}"))
    }
}
