//! # docforge-pdf: PDF Extraction Plugin
//!
//! This crate provides text extraction for PDF documents, acting as a plugin
//! for the `docforge` pipeline. It implements the `Extractor` trait from the
//! core crate.

use async_trait::async_trait;
use docforge::{extract::Extractor, TemplateError, UploadedFile};
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use thiserror::Error;
use tracing::{info, instrument, warn};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<PdfExtractError> for TemplateError {
    fn from(err: PdfExtractError) -> Self {
        TemplateError::ExtractionFailed(err.to_string())
    }
}

// --- Core Extraction Logic ---

/// Extracts text from all pages of a PDF synchronously.
///
/// Text-drawing operators are concatenated in content-stream order. Line moves
/// start a new line and pages are separated by a blank line.
pub fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;

        let Some(content) = &page.contents else {
            warn!("Page {} has no content stream.", page_num);
            continue;
        };

        let operations = content
            .operations(&resolver)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;

        let mut page_text = String::new();
        for op in operations.iter() {
            match op {
                Op::TextDraw { text } => page_text.push_str(&text.to_string_lossy()),
                Op::TextDrawAdjusted { array } => {
                    for item in array.iter() {
                        if let TextDrawAdjusted::Text(text) = item {
                            page_text.push_str(&text.to_string_lossy());
                        }
                    }
                }
                Op::MoveTextPosition { .. } | Op::TextNewline | Op::EndText => {
                    if !page_text.is_empty() && !page_text.ends_with('\n') {
                        page_text.push('\n');
                    }
                }
                _ => {}
            }
        }

        if !full_text.is_empty() {
            full_text.push('\n');
        }
        full_text.push_str(&page_text);
    }

    Ok(full_text)
}

// --- Extractor Implementation ---

/// The Extractor implementation for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    #[instrument(skip_all, fields(file = file.label(), bytes = file.bytes.len()))]
    async fn extract(&self, file: &UploadedFile) -> Result<String, TemplateError> {
        let data = file.bytes.clone();

        // The decoder is synchronous and CPU-bound.
        let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&data))
            .await
            .map_err(PdfExtractError::from)??;

        if text.trim().is_empty() {
            warn!("PDF '{}' produced no extractable text.", file.label());
        } else {
            info!("Extracted {} characters from PDF '{}'.", text.len(), file.label());
        }

        Ok(text)
    }
}
