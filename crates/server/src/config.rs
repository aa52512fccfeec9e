//! # Application Configuration
//!
//! This module defines the configuration structure for the `docforge-server` and
//! the logic for loading it. Sources are layered, later ones winning:
//!
//! 1. Programmatic defaults (model constants from the `docforge` library).
//! 2. An optional `config.yml`, with `${VAR}` placeholders filled from the environment.
//! 3. Plain environment variables for top-level keys (`PORT`, `STRATEGY`, ...).
//! 4. `DOCFORGE_`-prefixed variables for nested keys
//!    (e.g. `DOCFORGE_PROVIDER__API_URL`).

use docforge::{
    constants::{
        API_KEY_ENV_VAR, DOCUMENT_GENERATION_MAX_TOKENS, DOCUMENT_GENERATION_MODEL,
        TEMPLATE_ANALYSIS_MAX_TOKENS, TEMPLATE_ANALYSIS_MODEL,
    },
    providers::factory::{ProviderKind, ProviderSettings},
    NormalizationStrategy, TaskSettings,
};
#[cfg(feature = "docx")]
use docforge_docx::DocxMode;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::{env, fmt, fs, path::Path, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

/// A custom error type for configuration issues.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate or a bad value.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The largest accepted request body for `/analyze`, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// The normalization strategy used when a request does not pick one.
    #[serde(default)]
    pub strategy: NormalizationStrategy,
    /// How DOCX uploads are flattened to text.
    #[cfg(feature = "docx")]
    #[serde(default)]
    pub docx_mode: DocxMode,
    #[serde(default)]
    pub provider: ProviderConfig,
    pub tasks: TasksConfig,
}

fn default_port() -> u16 {
    9090
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Connection settings for the model backend.
#[derive(Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// `anthropic` or `local`.
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub api_url: Option<String>,
    /// Falls back to `ANTHROPIC_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            kind: self.provider,
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// The model used by each of the two flows.
#[derive(Debug, Deserialize, Clone)]
pub struct TasksConfig {
    pub template_analysis: TaskConfig,
    pub document_generation: TaskConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TaskConfig {
    pub model_name: String,
    pub max_tokens: u32,
}

impl From<&TaskConfig> for TaskSettings {
    fn from(task: &TaskConfig) -> Self {
        TaskSettings::new(task.model_name.clone(), task.max_tokens)
    }
}

// Reads a file and substitutes `${VAR}` placeholders with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.into_owned()))
}

/// Loads the application configuration from defaults, an optional file and
/// environment variables.
///
/// With `config_path_override` set, that file must exist. Otherwise
/// `config.yml` next to this crate is used when present and skipped when not.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("tasks.template_analysis.model_name", TEMPLATE_ANALYSIS_MODEL)?
        .set_default("tasks.template_analysis.max_tokens", TEMPLATE_ANALYSIS_MAX_TOKENS)?
        .set_default("tasks.document_generation.model_name", DOCUMENT_GENERATION_MODEL)?
        .set_default(
            "tasks.document_generation.max_tokens",
            DOCUMENT_GENERATION_MAX_TOKENS,
        )?;

    // Layer 2: Optional YAML file.
    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            let content = read_and_substitute(&default_path)?;
            if content.is_some() {
                info!("Loading configuration from '{default_path}'.");
            }
            content
        }
    };
    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 3: Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Prefixed environment variables for nested overrides.
        .add_source(
            Environment::with_prefix("DOCFORGE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Treat an empty key (e.g. an unset `${VAR}` placeholder) as absent.
    config.provider.api_key = config
        .provider
        .api_key
        .take()
        .filter(|key| !key.trim().is_empty());

    if config.provider.api_key.is_none() && config.provider.provider == ProviderKind::Anthropic {
        match env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => config.provider.api_key = Some(key),
            _ => warn!("{API_KEY_ENV_VAR} is not set; model calls will fail until it is provided."),
        }
    }

    Ok(config)
}
