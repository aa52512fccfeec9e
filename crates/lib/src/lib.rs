//! # Document Templates from Sample Documents
//!
//! This crate extracts text from uploaded documents, asks a large language model
//! to infer a reusable template from them, and writes new documents from a
//! template plus user-supplied values.
//!
//! Document formats are handled by plugin crates implementing
//! [`extract::Extractor`]; the model is reached through
//! [`providers::ai::AiProvider`], so the whole pipeline runs without network
//! access when a mock provider is injected.

pub mod client;
pub mod constants;
pub mod errors;
pub mod extract;
pub mod normalize;
pub mod prompts;
pub mod providers;
pub mod types;

pub use client::{TemplateClient, TemplateClientBuilder};
pub use errors::TemplateError;
pub use extract::{Extractor, ExtractorRegistry};
pub use types::{
    MediaType, ModelRequest, NormalizationStrategy, TaskSettings, TemplateStructure, UploadedFile,
    UserInputs,
};
