//! # AI Provider Factory
//!
//! This module centralizes the logic for turning a provider description into a
//! concrete client. Placing it in the `lib` crate lets any consumer (the server,
//! tests, other binaries) build providers the same way.

use crate::{
    constants::DEFAULT_ANTHROPIC_API_URL,
    errors::TemplateError,
    providers::ai::{AiProvider, AnthropicProvider, LocalAiProvider},
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tracing::{info, warn};

/// The kinds of model backends the pipeline can talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    Local,
}

/// Everything needed to construct a provider.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Required for `Local`; `Anthropic` falls back to the public endpoint.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Creates an AI provider instance from `settings`.
pub fn create_ai_provider(settings: &ProviderSettings) -> Result<Box<dyn AiProvider>, TemplateError> {
    let provider: Box<dyn AiProvider> = match settings.kind {
        ProviderKind::Anthropic => {
            let api_url = settings
                .api_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_URL.to_string());
            if settings.api_key.is_none() {
                warn!("Anthropic provider configured without an API key; model calls will fail.");
            }
            info!("Configuring Anthropic provider with URL: {}", api_url);
            Box::new(AnthropicProvider::new(
                api_url,
                settings.api_key.clone(),
                settings.timeout,
            )?)
        }
        ProviderKind::Local => {
            let api_url = settings
                .api_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| {
                    TemplateError::MissingAiProvider(
                        "api_url is required for the local provider".to_string(),
                    )
                })?;
            info!("Configuring local AI provider with URL: {}", api_url);
            Box::new(LocalAiProvider::new(
                api_url,
                settings.api_key.clone(),
                settings.timeout,
            )?)
        }
    };

    Ok(provider)
}
