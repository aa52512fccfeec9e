//! # Response Normalization
//!
//! Turns an untrusted model response into a template structure. Two strategies
//! exist, selected by [`NormalizationStrategy`]:
//!
//! - **JSON extract**: take the text from the first `{` to the last `}` and parse
//!   it. This breaks when the model emits two objects or prose containing
//!   braces; the matching rule is kept as-is for compatibility.
//! - **Key prettify**: parse the whole response, then relabel the top-level keys
//!   (`itemName` -> `Item Name`), drop keys holding an empty object and keep keys
//!   holding an empty array.

use crate::{
    errors::TemplateError,
    types::{NormalizationStrategy, TemplateStructure},
};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

static JSON_OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON span pattern"));
static INNER_CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B([A-Z])").expect("valid capital pattern"));

/// Shapes `raw` according to `strategy`.
pub fn normalize(
    raw: &str,
    strategy: NormalizationStrategy,
) -> Result<TemplateStructure, TemplateError> {
    debug!(?strategy, response_chars = raw.len(), "Normalizing model response");
    match strategy {
        NormalizationStrategy::JsonExtract => extract_json_object(raw),
        NormalizationStrategy::KeyPrettify => prettify_keys(raw),
    }
}

/// Parses the greedy `{ ... }` span of `raw`.
pub fn extract_json_object(raw: &str) -> Result<TemplateStructure, TemplateError> {
    let candidate = JSON_OBJECT_SPAN.find(raw).ok_or(TemplateError::NoJsonFound)?;
    serde_json::from_str(candidate.as_str()).map_err(TemplateError::MalformedJson)
}

/// Parses all of `raw` and rewrites its top-level keys.
///
/// Nested values pass through verbatim. A top-level value that is not an
/// object has no keys to rewrite and is returned unchanged.
pub fn prettify_keys(raw: &str) -> Result<TemplateStructure, TemplateError> {
    let parsed: Value = serde_json::from_str(raw).map_err(TemplateError::MalformedJson)?;

    let Value::Object(fields) = parsed else {
        return Ok(parsed);
    };

    let mut prettified = Map::with_capacity(fields.len());
    for (key, value) in fields {
        if matches!(&value, Value::Object(inner) if inner.is_empty()) {
            debug!(key = %key, "Dropping empty section");
            continue;
        }
        prettified.insert(humanize_key(&key), value);
    }

    Ok(Value::Object(prettified))
}

/// Converts a camelCase key into a capitalized, space-separated label.
pub fn humanize_key(key: &str) -> String {
    let spaced = INNER_CAPITAL.replace_all(key, " $1");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
