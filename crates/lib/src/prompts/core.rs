//! # Prompt Builders
//!
//! Functions that embed request data into the fixed templates from
//! [`super::tasks`]. Inputs are passed through untouched: no truncation and no
//! chunking, however large the documents are.

use super::tasks::{DOCUMENT_GENERATION_PROMPT, DOCUMENT_SEPARATOR, TEMPLATE_ANALYSIS_PROMPT};
use crate::{
    errors::TemplateError,
    types::{TemplateStructure, UserInputs},
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(structure|user_inputs)\}").expect("valid placeholder pattern")
});

/// Joins extracted document texts with [`DOCUMENT_SEPARATOR`], preserving order.
pub fn join_documents<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(DOCUMENT_SEPARATOR)
}

/// Builds the template-discovery prompt for the given document texts.
pub fn build_analyze_prompt<S: AsRef<str>>(texts: &[S]) -> String {
    TEMPLATE_ANALYSIS_PROMPT.replace("{documents}", &join_documents(texts))
}

/// Builds the document-generation prompt.
///
/// Both values are serialized as compact JSON. Substitution happens in a single
/// pass so placeholder-like text inside the values is left alone.
pub fn build_generate_prompt(
    structure: &TemplateStructure,
    user_inputs: &UserInputs,
) -> Result<String, TemplateError> {
    let structure_json =
        serde_json::to_string(structure).map_err(TemplateError::JsonSerialization)?;
    let inputs_json =
        serde_json::to_string(user_inputs).map_err(TemplateError::JsonSerialization)?;

    let prompt = PLACEHOLDER.replace_all(DOCUMENT_GENERATION_PROMPT, |caps: &Captures| {
        match &caps[1] {
            "structure" => structure_json.clone(),
            _ => inputs_json.clone(),
        }
    });

    Ok(prompt.into_owned())
}
