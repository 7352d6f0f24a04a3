//! Configuration loading
//!
//! All credentials and tunables live in one [`PressConfig`] that is handed
//! to each stage explicitly.
//!
//! Search order for the config file:
//! 1. `--config PATH`
//! 2. Environment variable `PRESS_CONFIG_PATH`
//! 3. `.press.toml` in the current directory or any parent
//! 4. `~/.config/press/.press.toml`
//! 5. Defaults
//!
//! `GOOGLE_API_KEY`, `GOOGLE_CSE_ID` and `GEMINI_API_KEY` override whatever
//! the file says.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use web_search::{FetchConfig, SearchConfig};

const CONFIG_FILENAME: &str = ".press.toml";

/// Values that mean "someone forgot to fill this in"
const PLACEHOLDER_CREDENTIALS: [&str; 4] = [
    "YOUR_API_KEY_HERE",
    "YOUR_CSE_ID_HERE",
    "YOUR_GEMINI_API_KEY_HERE",
    "key plzzz",
];

/// Configuration errors. All are fatal and stop the run before any
/// network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set. Add it to .press.toml or set {1}")]
    MissingCredential(&'static str, &'static str),
    #[error("{0} still holds a placeholder value. Update it in .press.toml or set {1}")]
    PlaceholderCredential(&'static str, &'static str),
    #[error("total_results must be greater than 0")]
    NoResultsRequested,
    #[error("no search terms configured. Add [search] terms or pass --term")]
    NoSearchTerms,
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Find a config file by walking up the directory tree, then checking global config.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    // Fallback: Check global config
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("press").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level configuration (from .press.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PressConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// LLM configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Generative Language API base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// Primary subject the sentiment is measured against
    #[serde(default = "default_subject")]
    pub subject: String,
}

/// Stage 2 pipeline configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Pause after each fully analysed row, in milliseconds
    #[serde(default = "default_row_delay_ms")]
    pub row_delay_ms: u64,
    /// Directory for stage 1 and stage 2 output files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Explicit stage 1 file to analyse; newest one is used when unset
    #[serde(default)]
    pub input_file: Option<PathBuf>,
}

// Default value functions
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_subject() -> String {
    "ENEC (Emirates Nuclear Energy Corporation)".to_string()
}

fn default_row_delay_ms() -> u64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            endpoint: default_llm_endpoint(),
            subject: default_subject(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: default_row_delay_ms(),
            output_dir: default_output_dir(),
            input_file: None,
        }
    }
}

impl PressConfig {
    /// Load config, apply environment overrides.
    ///
    /// An explicit `path` must exist; discovered files are optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("PRESS_CONFIG_PATH").map(PathBuf::from));

        let mut config = match explicit.or_else(|| find_config_file(CONFIG_FILENAME)) {
            Some(config_path) => {
                tracing::debug!("Loading config from: {}", config_path.display());
                Self::load_from_path(&config_path)?
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Credentials from the environment take priority over the file
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.search.api_key = key;
        }
        if let Ok(cx) = std::env::var("GOOGLE_CSE_ID") {
            self.search.engine_id = cx;
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = key;
        }
    }

    /// Check everything stage 1 needs before the first search request
    pub fn validate_search(&self) -> Result<(), ConfigError> {
        check_credential(&self.search.api_key, "search.api_key", "GOOGLE_API_KEY")?;
        check_credential(&self.search.engine_id, "search.engine_id", "GOOGLE_CSE_ID")?;
        if self.search.total_results == 0 {
            return Err(ConfigError::NoResultsRequested);
        }
        if self.search.terms.is_empty() {
            return Err(ConfigError::NoSearchTerms);
        }
        Ok(())
    }

    /// Check everything stage 2 needs before the first fetch
    pub fn validate_analysis(&self) -> Result<(), ConfigError> {
        check_credential(&self.llm.api_key, "llm.api_key", "GEMINI_API_KEY")
    }
}

fn check_credential(
    value: &str,
    name: &'static str,
    env_var: &'static str,
) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingCredential(name, env_var));
    }
    let templated = value.starts_with("YOUR_") && value.ends_with("_HERE");
    if templated || PLACEHOLDER_CREDENTIALS.contains(&value) {
        return Err(ConfigError::PlaceholderCredential(name, env_var));
    }
    Ok(())
}
