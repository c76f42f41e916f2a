//! Recording fakes of the two collaborators for stage and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use blogsquad_llm::LanguageModel;
use blogsquad_search::SearchProvider;
use blogsquad_shared::{BlogSquadError, Generation, Result, SearchResult};

/// Search fake that returns canned hits and records every query.
pub struct FakeSearch {
    results: Option<Vec<SearchResult>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results: Some(results),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `SearchUnavailable`.
    pub fn failing() -> Self {
        Self {
            results: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        match &self.results {
            Some(results) => Ok(results.iter().take(max_results).cloned().collect()),
            None => Err(BlogSquadError::SearchUnavailable("connection refused".into())),
        }
    }
}

/// Model fake that answers calls from a fixed script, in order.
///
/// Running past the end of the script is an error, so an unexpected extra
/// call fails the run loudly.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    model_ids: Mutex<Vec<String>>,
    fail_at: Option<(usize, fn(&str) -> BlogSquadError)>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            model_ids: Mutex::new(Vec::new()),
            fail_at: None,
        }
    }

    /// Make the zero-based `call` fail with the error built by `make_err`.
    pub fn failing_at(mut self, call: usize, make_err: fn(&str) -> BlogSquadError) -> Self {
        self.fail_at = Some((call, make_err));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn model_ids(&self) -> Vec<String> {
        self.model_ids.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, model_id: &str, prompt: &str) -> Result<Generation> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        self.model_ids.lock().unwrap().push(model_id.to_string());

        if let Some((fail_call, make_err)) = self.fail_at {
            if fail_call == call {
                return Err(make_err(model_id));
            }
        }

        let text = self.replies.lock().unwrap().pop_front().ok_or_else(|| {
            BlogSquadError::ModelUnavailable(format!("script exhausted at call {call}"))
        })?;

        Ok(Generation {
            model: model_id.to_string(),
            tokens_in: prompt.split_whitespace().count() as u64,
            tokens_out: text.split_whitespace().count() as u64,
            latency_ms: 1,
            text,
        })
    }
}
