use thiserror::Error;

/// Custom error types for the template pipeline.
///
/// Every stage surfaces its failure to the immediate caller. Nothing here is
/// retried or recovered locally; the HTTP layer decides how each variant is
/// presented to clients.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),
    #[error("Failed to extract text from document: {0}")]
    ExtractionFailed(String),
    #[error("At least one document is required")]
    NoDocuments,
    #[error("Model call failed: {0}")]
    ModelCallFailed(String),
    #[error("No valid JSON found in the model response")]
    NoJsonFound,
    #[error("Model response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("Failed to serialize prompt input: {0}")]
    JsonSerialization(#[source] serde_json::Error),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("AI provider is missing or misconfigured: {0}")]
    MissingAiProvider(String),
}
