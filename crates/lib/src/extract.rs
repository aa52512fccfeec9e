//! # Text Extraction
//!
//! The seam between the pipeline and the document-format plugins. Each plugin
//! crate (`docforge-pdf`, `docforge-docx`) implements [`Extractor`]; the
//! [`ExtractorRegistry`] dispatches uploads to them by declared media type.

use crate::{
    errors::TemplateError,
    types::{MediaType, UploadedFile},
};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{debug, instrument, warn};

/// A generic trait that defines the contract for a document-format plugin.
///
/// Implementations receive a file whose declared media type has already been
/// matched to them and return its plain text in reading order.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> Result<String, TemplateError>;
}

/// Maps each supported media type to the plugin that reads it.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<MediaType, Arc<dyn Extractor>>,
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("media_types", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `extractor` for `media_type`, replacing any previous one.
    pub fn register(mut self, media_type: MediaType, extractor: impl Extractor + 'static) -> Self {
        self.extractors.insert(media_type, Arc::new(extractor));
        self
    }

    /// Registers an already shared extractor.
    pub fn register_shared(mut self, media_type: MediaType, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.insert(media_type, extractor);
        self
    }

    pub fn supports(&self, media_type: MediaType) -> bool {
        self.extractors.contains_key(&media_type)
    }

    /// Extracts the text of a single file.
    ///
    /// Fails with `UnsupportedMediaType` before touching any decoder when the
    /// declared type is unknown or has no registered plugin.
    pub async fn extract(&self, file: &UploadedFile) -> Result<String, TemplateError> {
        let extractor = MediaType::from_mime(&file.media_type)
            .and_then(|media_type| self.extractors.get(&media_type))
            .ok_or_else(|| {
                warn!(file = file.label(), media_type = %file.media_type, "Rejecting unsupported upload");
                TemplateError::UnsupportedMediaType(file.media_type.clone())
            })?;

        debug!(
            file = file.label(),
            media_type = %file.media_type,
            bytes = file.bytes.len(),
            "Extracting text"
        );
        extractor.extract(file).await
    }

    /// Extracts every file concurrently.
    ///
    /// The result order matches `files` regardless of completion order. The
    /// first failure fails the whole batch; no partial results are returned.
    #[instrument(skip_all, fields(files = files.len()))]
    pub async fn extract_all(&self, files: &[UploadedFile]) -> Result<Vec<String>, TemplateError> {
        try_join_all(files.iter().map(|file| self.extract(file))).await
    }
}
