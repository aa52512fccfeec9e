//! # Core Data Model
//!
//! Every value here is transient and scoped to a single request. Nothing is
//! persisted by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A nested JSON object describing document sections and fields.
pub type TemplateStructure = Value;

/// Caller-supplied values for the generation flow. Not validated against the structure.
pub type UserInputs = Value;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The document formats the pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    /// Resolves a declared media type such as `application/pdf; name=a.pdf`.
    ///
    /// Only the essence of the type is compared, case-insensitively.
    pub fn from_mime(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(MediaType::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(MediaType::Docx)
        } else {
            None
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => PDF_MIME,
            MediaType::Docx => DOCX_MIME,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// An in-memory upload handed over by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// The original file name, if the client sent one.
    pub name: Option<String>,
    pub bytes: Vec<u8>,
    /// The media type exactly as declared by the uploader.
    pub media_type: String,
}

impl UploadedFile {
    pub fn new(name: Option<String>, bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            name,
            bytes,
            media_type: media_type.into(),
        }
    }

    /// A printable label for logs and error messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// The rule set used to turn a raw model response into a template structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// Take everything from the first `{` to the last `}` and parse it.
    #[default]
    JsonExtract,
    /// Parse the whole response and relabel its top-level keys.
    KeyPrettify,
}

impl FromStr for NormalizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "json_extract" => Ok(NormalizationStrategy::JsonExtract),
            "key_prettify" => Ok(NormalizationStrategy::KeyPrettify),
            other => Err(format!(
                "Unknown normalization strategy '{other}'. Expected 'json_extract' or 'key_prettify'."
            )),
        }
    }
}

/// A fixed model configuration for one of the two flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl TaskSettings {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
        }
    }
}

/// A single-turn, non-streaming request to the remote model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub prompt: String,
}

impl ModelRequest {
    /// Builds a request for `task` at temperature zero.
    pub fn for_task(task: &TaskSettings, prompt: String) -> Self {
        Self {
            model: task.model.clone(),
            max_tokens: task.max_tokens,
            temperature: 0.0,
            prompt,
        }
    }
}
