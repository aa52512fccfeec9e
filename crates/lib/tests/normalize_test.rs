//! # Response Normalizer Tests

use docforge::{
    normalize::{extract_json_object, humanize_key, normalize, prettify_keys},
    NormalizationStrategy, TemplateError,
};
use serde_json::json;

// --- JSON extract ---

#[test]
fn test_json_extract_ignores_surrounding_prose() {
    let raw = "Here is the template:\n{\"a\":1}\nThanks";
    let value = normalize(raw, NormalizationStrategy::JsonExtract).unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[test]
fn test_json_extract_spans_multiple_lines() {
    let raw = "```json\n{\n  \"header\": {\n    \"title\": \"[Title]\"\n  }\n}\n```";
    let value = extract_json_object(raw).unwrap();
    assert_eq!(value, json!({"header": {"title": "[Title]"}}));
}

#[test]
fn test_json_extract_without_braces_is_no_json_found() {
    let result = normalize("I cannot help with that.", NormalizationStrategy::JsonExtract);
    assert!(matches!(result, Err(TemplateError::NoJsonFound)), "Got {result:?}");
}

/// The span runs from the first `{` to the last `}`, so two objects do not parse.
#[test]
fn test_json_extract_two_objects_is_malformed() {
    let result = extract_json_object(r#"{"a":1} and {"b":2}"#);
    assert!(matches!(result, Err(TemplateError::MalformedJson(_))), "Got {result:?}");
}

#[test]
fn test_json_extract_keeps_key_order() {
    let value = extract_json_object(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

// --- Key prettify ---

#[test]
fn test_key_prettify_relabels_and_drops_empty_objects() {
    let raw = r#"{"itemName": "Pen", "extras": {}, "tags": []}"#;
    let value = normalize(raw, NormalizationStrategy::KeyPrettify).unwrap();
    assert_eq!(value, json!({"Item Name": "Pen", "Tags": []}));
}

#[test]
fn test_key_prettify_leaves_nested_values_alone() {
    let raw = r#"{"billingAddress": {"streetLine": "[Street]", "unused": {}}}"#;
    let value = prettify_keys(raw).unwrap();
    assert_eq!(
        value,
        json!({"Billing Address": {"streetLine": "[Street]", "unused": {}}})
    );
}

#[test]
fn test_key_prettify_rejects_surrounding_prose() {
    let result = prettify_keys("Sure! {\"a\": 1}");
    assert!(matches!(result, Err(TemplateError::MalformedJson(_))), "Got {result:?}");
}

#[test]
fn test_key_prettify_returns_non_objects_unchanged() {
    assert_eq!(prettify_keys("[1, 2]").unwrap(), json!([1, 2]));
    assert_eq!(prettify_keys("\"text\"").unwrap(), json!("text"));
}

#[test]
fn test_humanize_key() {
    assert_eq!(humanize_key("itemName"), "Item Name");
    assert_eq!(humanize_key("purchaseOrderNumber"), "Purchase Order Number");
    assert_eq!(humanize_key("Total"), "Total");
    assert_eq!(humanize_key(""), "");
}
