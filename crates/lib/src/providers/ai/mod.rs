pub mod anthropic;
pub mod local;

use crate::{errors::TemplateError, types::ModelRequest};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use anthropic::AnthropicProvider;
pub use local::LocalAiProvider;

/// A trait for interacting with a remote language model.
///
/// Implementations issue exactly one non-streaming request per call, carrying a
/// single user-role message, and return the model's raw text. Transport and API
/// failures surface as [`TemplateError::ModelCallFailed`]; nothing is retried.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Sends `request` to the model and returns its textual payload.
    async fn generate(&self, request: &ModelRequest) -> Result<String, TemplateError>;
}

dyn_clone::clone_trait_object!(AiProvider);
