//! Shared types, error model, and configuration for BlogSquad.
//!
//! This crate is the foundation depended on by all other BlogSquad crates.
//! It provides:
//! - [`BlogSquadError`]: the unified error type
//! - Domain types ([`PipelineState`], [`SearchResult`], [`Generation`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GroqConfig, TavilyConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_api_keys,
};
pub use error::{BlogSquadError, Result};
pub use types::{Generation, PipelineState, RunId, SearchResult};
