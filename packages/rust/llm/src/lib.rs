//! Language model collaborator.
//!
//! Every stage talks to the model through [`LanguageModel`]: a prompt goes
//! in, generated text comes out. The model identifier travels with each
//! call so one client can serve whatever model the caller picked at run
//! time. [`GroqClient`] is the production adapter.

mod groq;

use async_trait::async_trait;
use blogsquad_shared::{Generation, Result};

pub use groq::{GroqClient, GroqOptions};

/// A text-generation backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` using `model_id`.
    ///
    /// Fails with `BlogSquadError::InvalidModelName` when the provider does
    /// not recognize `model_id`, and `BlogSquadError::ModelUnavailable` for
    /// transport, auth, rate-limit or response-shape failures.
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<Generation>;
}
