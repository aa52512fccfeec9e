//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: the model provider, the document-format plugins
//! and the `TemplateClient` that ties them together.

use crate::config::AppConfig;
use docforge::{
    providers::{ai::AiProvider, factory::create_ai_provider},
    ExtractorRegistry, TemplateClient, TemplateClientBuilder,
};
#[cfg(any(feature = "pdf", feature = "docx"))]
use docforge::MediaType;
#[cfg(feature = "docx")]
use docforge_docx::DocxExtractor;
#[cfg(feature = "pdf")]
use docforge_pdf::PdfExtractor;
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The configuration the server was started with.
    pub config: Arc<AppConfig>,
    pub client: Arc<TemplateClient>,
}

/// Registers every document-format plugin compiled into this build.
pub fn build_extractors(config: &AppConfig) -> ExtractorRegistry {
    #[allow(unused_mut)]
    let mut registry = ExtractorRegistry::new();

    #[cfg(feature = "pdf")]
    {
        registry = registry.register(MediaType::Pdf, PdfExtractor::new());
    }
    #[cfg(feature = "docx")]
    {
        registry = registry.register(MediaType::Docx, DocxExtractor::new(config.docx_mode));
        info!(mode = ?config.docx_mode, "DOCX extraction enabled.");
    }
    #[cfg(not(feature = "docx"))]
    let _ = config;

    registry
}

/// Builds the shared application state from the configuration.
///
/// The model provider is created from the `provider` section.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    info!(
        provider = ?config.provider.provider,
        api_key = if config.provider.api_key.is_some() { "set" } else { "not set" },
        "Configuring model provider."
    );
    let ai_provider = create_ai_provider(&config.provider.to_settings())?;
    build_app_state_with_provider(config, ai_provider)
}

/// Builds the shared application state around an already constructed provider.
pub fn build_app_state_with_provider(
    config: AppConfig,
    ai_provider: Box<dyn AiProvider>,
) -> anyhow::Result<AppState> {
    let client = TemplateClientBuilder::new()
        .ai_provider(ai_provider)
        .extractors(build_extractors(&config))
        .strategy(config.strategy)
        .analysis_task((&config.tasks.template_analysis).into())
        .generation_task((&config.tasks.document_generation).into())
        .build()?;

    Ok(AppState {
        config: Arc::new(config),
        client: Arc::new(client),
    })
}
