use crate::{
    constants::ANTHROPIC_API_VERSION, errors::TemplateError, providers::ai::AiProvider,
    types::ModelRequest,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tracing::{debug, info};

// --- Messages API request and response structures ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize, Debug)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// --- Anthropic Provider implementation ---

/// A provider for the Anthropic Messages API.
///
/// The credential is optional at construction time so a server can start
/// without it; the first call then fails with `ModelCallFailed`.
#[derive(Clone)]
pub struct AnthropicProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider`.
    ///
    /// `timeout` bounds the whole request; `None` keeps reqwest's default of no timeout.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TemplateError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TemplateError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<String, TemplateError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TemplateError::ModelCallFailed("API key is not configured".to_string())
        })?;

        let request_body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        info!(
            model = %request.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "--> Sending request to Anthropic API"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TemplateError::ModelCallFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TemplateError::ModelCallFailed(format!(
                "Anthropic API returned {status}: {error_text}"
            )));
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| TemplateError::ModelCallFailed(e.to_string()))?;

        let raw_response = messages_response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                TemplateError::ModelCallFailed(
                    "Anthropic API response contained no text content".to_string(),
                )
            })?;

        debug!("<-- Full response from Anthropic: {}", raw_response);

        Ok(raw_response)
    }
}
