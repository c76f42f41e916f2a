//! Error types for BlogSquad.
//!
//! Library crates use [`BlogSquadError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all BlogSquad operations.
#[derive(Debug, thiserror::Error)]
pub enum BlogSquadError {
    /// A required input (topic or model id) was blank.
    #[error("empty input: {field} must not be blank")]
    EmptyInput { field: &'static str },

    /// The search collaborator failed (network, auth, bad response).
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// The language model collaborator failed (network, auth, rate limit, bad response).
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The selected model identifier is not recognized by the provider.
    #[error("invalid model name: '{model}'")]
    InvalidModelName { model: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogSquadError>;

impl BlogSquadError {
    /// Create an empty-input error for the named field.
    pub fn empty_input(field: &'static str) -> Self {
        Self::EmptyInput { field }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-model error for the given identifier.
    pub fn invalid_model(model: impl Into<String>) -> Self {
        Self::InvalidModelName {
            model: model.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from one of the external collaborators.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::SearchUnavailable(_) | Self::ModelUnavailable(_) | Self::InvalidModelName { .. }
        )
    }
}
