//! # Shared Constants
//!
//! Model identifiers, token budgets and endpoint defaults shared across the
//! `docforge` workspace.

/// The model used to infer a template from sample documents.
pub const TEMPLATE_ANALYSIS_MODEL: &str = "claude-3-5-sonnet-20240620";

/// The output token budget for template analysis.
pub const TEMPLATE_ANALYSIS_MAX_TOKENS: u32 = 4000;

/// The model used to write a document from a template and user inputs.
pub const DOCUMENT_GENERATION_MODEL: &str = "claude-3-sonnet-20240229";

/// The output token budget for document generation.
pub const DOCUMENT_GENERATION_MAX_TOKENS: u32 = 4000;

/// The Anthropic Messages API endpoint.
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// The Messages API version header value.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// The environment variable holding the model API credential.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
