//! Application configuration for BlogSquad.
//!
//! User config lives at `~/.blogsquad/blogsquad.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BlogSquadError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogsquad.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogsquad";

// ---------------------------------------------------------------------------
// Config structs (matching blogsquad.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Groq (language model) settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Tavily (web search) settings.
    #[serde(default)]
    pub tavily: TavilyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Model used when `--model` is not given.
    #[serde(default = "default_model")]
    pub model: String,

    /// Number of search results fed into the research stage.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Directory the final blog is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_results: default_max_results(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_max_results() -> usize {
    3
}
fn default_output_dir() -> String {
    ".".into()
}

/// `[groq]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_groq_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API root.
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_groq_key_env(),
            base_url: default_groq_base_url(),
            timeout_secs: default_groq_timeout(),
        }
    }
}

fn default_groq_key_env() -> String {
    "GROQ_API_KEY".into()
}
fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_groq_timeout() -> u64 {
    120
}

/// `[tavily]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilyConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_tavily_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_tavily_base_url")]
    pub base_url: String,

    #[serde(default = "default_tavily_timeout")]
    pub timeout_secs: u64,

    /// "basic" or "advanced".
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_tavily_key_env(),
            base_url: default_tavily_base_url(),
            timeout_secs: default_tavily_timeout(),
            search_depth: default_search_depth(),
        }
    }
}

fn default_tavily_key_env() -> String {
    "TAVILY_API_KEY".into()
}
fn default_tavily_base_url() -> String {
    "https://api.tavily.com".into()
}
fn default_tavily_timeout() -> u64 {
    30
}
fn default_search_depth() -> String {
    "basic".into()
}

impl AppConfig {
    /// Check the values that cannot be caught by deserialization alone.
    pub fn validate(&self) -> Result<()> {
        if self.defaults.max_results == 0 {
            return Err(BlogSquadError::config("defaults.max_results must be at least 1"));
        }
        for (section, base_url) in [("groq", &self.groq.base_url), ("tavily", &self.tavily.base_url)] {
            Url::parse(base_url).map_err(|e| {
                BlogSquadError::config(format!("{section}.base_url '{base_url}' is not a valid URL: {e}"))
            })?;
        }
        match self.tavily.search_depth.as_str() {
            "basic" | "advanced" => Ok(()),
            other => Err(BlogSquadError::config(format!(
                "tavily.search_depth must be 'basic' or 'advanced', got '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogsquad/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlogSquadError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogsquad/blogsquad.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlogSquadError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BlogSquadError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BlogSquadError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlogSquadError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlogSquadError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that both API key env vars are set and non-empty.
pub fn validate_api_keys(config: &AppConfig) -> Result<()> {
    let required = [
        ("Groq", &config.groq.api_key_env, "https://console.groq.com/keys"),
        ("Tavily", &config.tavily.api_key_env, "https://app.tavily.com"),
    ];
    for (provider, var_name, signup) in required {
        match std::env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => {}
            _ => {
                return Err(BlogSquadError::config(format!(
                    "{provider} API key not found. Set the {var_name} environment variable.\n\
                     Get a key at {signup}"
                )));
            }
        }
    }
    Ok(())
}
