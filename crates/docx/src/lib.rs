//! # docforge-docx: Word Document Extraction Plugin
//!
//! Reads `.docx` packages with `docx-rs` and flattens their body to text for
//! the `docforge` pipeline. Two modes are supported:
//!
//! - `Raw`: paragraphs only. Table cells are unrolled into paragraphs and
//!   images are skipped.
//! - `Structured`: tables keep their row and cell shape and embedded images
//!   are inlined as `data:` URLs.

pub mod tree;

use async_trait::async_trait;
use docforge::{extract::Extractor, TemplateError, UploadedFile};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use tree::{render_text, DocNode};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum DocxExtractError {
    #[error("Failed to read DOCX package: {0}")]
    DocxParse(String),
    #[error("DOCX extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<DocxExtractError> for TemplateError {
    fn from(err: DocxExtractError) -> Self {
        TemplateError::ExtractionFailed(err.to_string())
    }
}

// --- Modes ---

/// How much of the document layout survives extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocxMode {
    #[default]
    Raw,
    Structured,
}

impl FromStr for DocxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(DocxMode::Raw),
            "structured" => Ok(DocxMode::Structured),
            other => Err(format!("unknown docx mode '{other}'")),
        }
    }
}

// --- Core Extraction Logic ---

/// Parses a DOCX package into its body nodes.
pub fn parse_document(bytes: &[u8], mode: DocxMode) -> Result<Vec<DocNode>, DocxExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocxExtractError::DocxParse(e.to_string()))?;
    Ok(tree::build_nodes(&docx, mode))
}

/// Extracts the text of a DOCX package synchronously.
pub fn extract_text_from_docx(bytes: &[u8], mode: DocxMode) -> Result<String, DocxExtractError> {
    let nodes = parse_document(bytes, mode)?;
    Ok(render_text(&nodes))
}

// --- Extractor Implementation ---

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor {
    mode: DocxMode,
}

impl DocxExtractor {
    pub fn new(mode: DocxMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DocxMode {
        self.mode
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    #[instrument(skip_all, fields(file = file.label(), mode = ?self.mode))]
    async fn extract(&self, file: &UploadedFile) -> Result<String, TemplateError> {
        let data = file.bytes.clone();
        let mode = self.mode;

        let text = tokio::task::spawn_blocking(move || extract_text_from_docx(&data, mode))
            .await
            .map_err(DocxExtractError::from)??;

        if text.trim().is_empty() {
            warn!("DOCX '{}' produced no text.", file.label());
        } else {
            info!("Extracted {} characters from DOCX '{}'.", text.len(), file.label());
        }

        Ok(text)
    }
}
