use crate::{
    constants::{
        DOCUMENT_GENERATION_MAX_TOKENS, DOCUMENT_GENERATION_MODEL, TEMPLATE_ANALYSIS_MAX_TOKENS,
        TEMPLATE_ANALYSIS_MODEL,
    },
    errors::TemplateError,
    extract::ExtractorRegistry,
    normalize::normalize,
    prompts::{build_analyze_prompt, build_generate_prompt},
    providers::ai::AiProvider,
    types::{
        ModelRequest, NormalizationStrategy, TaskSettings, TemplateStructure, UploadedFile,
        UserInputs,
    },
};
use std::fmt;
use tracing::{debug, info, instrument};

/// Runs the two document flows: template analysis and document generation.
///
/// The client owns no per-request state and can be shared across handlers.
#[derive(Clone)]
pub struct TemplateClient {
    pub(crate) ai_provider: Box<dyn AiProvider>,
    pub(crate) extractors: ExtractorRegistry,
    pub(crate) strategy: NormalizationStrategy,
    pub(crate) analysis_task: TaskSettings,
    pub(crate) generation_task: TaskSettings,
}

impl fmt::Debug for TemplateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateClient")
            .field("ai_provider", &self.ai_provider)
            .field("extractors", &self.extractors)
            .field("strategy", &self.strategy)
            .field("analysis_task", &self.analysis_task)
            .field("generation_task", &self.generation_task)
            .finish()
    }
}

impl TemplateClient {
    /// Infers a template structure from sample documents with the configured strategy.
    pub async fn analyze(&self, files: &[UploadedFile]) -> Result<TemplateStructure, TemplateError> {
        self.analyze_with_strategy(files, self.strategy).await
    }

    /// Infers a template structure, overriding the normalization strategy for this call.
    ///
    /// Extraction runs concurrently over all files and fails fast; the model is
    /// then called exactly once with every document's text.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn analyze_with_strategy(
        &self,
        files: &[UploadedFile],
        strategy: NormalizationStrategy,
    ) -> Result<TemplateStructure, TemplateError> {
        if files.is_empty() {
            return Err(TemplateError::NoDocuments);
        }

        info!("Extracting text from {} file(s)...", files.len());
        let texts = self.extractors.extract_all(files).await?;

        let prompt = build_analyze_prompt(&texts);
        debug!(prompt_chars = prompt.len(), "Built template analysis prompt");

        info!("Sending template analysis request to the model...");
        let request = ModelRequest::for_task(&self.analysis_task, prompt);
        let raw_response = self.ai_provider.generate(&request).await?;

        normalize(&raw_response, strategy)
    }

    /// Writes a full document from `structure` and `user_inputs`.
    ///
    /// The model's text is returned as-is; no normalization is applied.
    #[instrument(skip_all)]
    pub async fn generate(
        &self,
        structure: &TemplateStructure,
        user_inputs: &UserInputs,
    ) -> Result<String, TemplateError> {
        let prompt = build_generate_prompt(structure, user_inputs)?;
        debug!(prompt_chars = prompt.len(), "Built document generation prompt");

        info!("Sending document generation request to the model...");
        let request = ModelRequest::for_task(&self.generation_task, prompt);
        self.ai_provider.generate(&request).await
    }

    pub fn strategy(&self) -> NormalizationStrategy {
        self.strategy
    }
}

/// A builder for creating `TemplateClient` instances.
#[derive(Default)]
pub struct TemplateClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    extractors: ExtractorRegistry,
    strategy: NormalizationStrategy,
    analysis_task: Option<TaskSettings>,
    generation_task: Option<TaskSettings>,
}

impl TemplateClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model client used by both flows.
    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the document-format plugins.
    pub fn extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    /// Sets the default normalization strategy for `analyze`.
    pub fn strategy(mut self, strategy: NormalizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn analysis_task(mut self, task: TaskSettings) -> Self {
        self.analysis_task = Some(task);
        self
    }

    pub fn generation_task(mut self, task: TaskSettings) -> Self {
        self.generation_task = Some(task);
        self
    }

    /// Builds the `TemplateClient`.
    ///
    /// Fails with `MissingAiProvider` if no provider was set.
    pub fn build(self) -> Result<TemplateClient, TemplateError> {
        let ai_provider = self.ai_provider.ok_or_else(|| {
            TemplateError::MissingAiProvider("no AI provider was given to the builder".to_string())
        })?;

        Ok(TemplateClient {
            ai_provider,
            extractors: self.extractors,
            strategy: self.strategy,
            analysis_task: self.analysis_task.unwrap_or_else(|| {
                TaskSettings::new(TEMPLATE_ANALYSIS_MODEL, TEMPLATE_ANALYSIS_MAX_TOKENS)
            }),
            generation_task: self.generation_task.unwrap_or_else(|| {
                TaskSettings::new(DOCUMENT_GENERATION_MODEL, DOCUMENT_GENERATION_MAX_TOKENS)
            }),
        })
    }
}
