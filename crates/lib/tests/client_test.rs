//! # Template Client Tests
//!
//! Exercises both flows end to end with `MockAiProvider` and `MockExtractor`,
//! so no document decoder or network access is involved.

use docforge::{
    constants::{DOCUMENT_GENERATION_MODEL, TEMPLATE_ANALYSIS_MAX_TOKENS, TEMPLATE_ANALYSIS_MODEL},
    types::PDF_MIME,
    ExtractorRegistry, MediaType, NormalizationStrategy, TaskSettings, TemplateClient,
    TemplateClientBuilder, TemplateError, UploadedFile,
};
use docforge_test_utils::{MockAiProvider, MockExtractor};
use serde_json::json;
use std::sync::Once;

static INIT: Once = Once::new();

fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn client_with(provider: &MockAiProvider) -> TemplateClient {
    TemplateClientBuilder::new()
        .ai_provider(Box::new(provider.clone()))
        .extractors(ExtractorRegistry::new().register(MediaType::Pdf, MockExtractor::new()))
        .build()
        .unwrap()
}

fn pdf(name: &str, text: &str) -> UploadedFile {
    UploadedFile::new(Some(name.to_string()), text.as_bytes().to_vec(), PDF_MIME)
}

#[tokio::test]
async fn test_analyze_sends_all_documents_in_one_call() {
    setup_tracing();

    // --- 1. Arrange ---
    let provider = MockAiProvider::new();
    provider.add_response(
        "Invoice A",
        "Here you go:\n{\"header\": {\"title\": \"[Title]\"}, \"lineItems\": []}\nDone.",
    );
    let client = client_with(&provider);

    // --- 2. Act ---
    let structure = client
        .analyze(&[pdf("a.pdf", "Invoice A"), pdf("b.pdf", "Invoice B")])
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(
        structure,
        json!({"header": {"title": "[Title]"}, "lineItems": []})
    );

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, TEMPLATE_ANALYSIS_MODEL);
    assert_eq!(calls[0].max_tokens, TEMPLATE_ANALYSIS_MAX_TOKENS);
    assert_eq!(calls[0].temperature, 0.0);
    assert!(calls[0]
        .prompt
        .ends_with("Invoice A\n\n---DOCUMENT SEPARATOR---\n\nInvoice B"));
}

#[tokio::test]
async fn test_analyze_with_key_prettify_strategy() {
    let provider = MockAiProvider::new();
    provider.add_response("Order", r#"{"itemName": "Pen", "extras": {}, "tags": []}"#);
    let client = client_with(&provider);

    let structure = client
        .analyze_with_strategy(&[pdf("a.pdf", "Order")], NormalizationStrategy::KeyPrettify)
        .await
        .unwrap();

    assert_eq!(structure, json!({"Item Name": "Pen", "Tags": []}));
}

#[tokio::test]
async fn test_builder_strategy_is_the_default_for_analyze() {
    let provider = MockAiProvider::new();
    provider.add_response("Order", r#"{"shipTo": "[Address]"}"#);
    let client = TemplateClientBuilder::new()
        .ai_provider(Box::new(provider.clone()))
        .extractors(ExtractorRegistry::new().register(MediaType::Pdf, MockExtractor::new()))
        .strategy(NormalizationStrategy::KeyPrettify)
        .build()
        .unwrap();

    let structure = client.analyze(&[pdf("a.pdf", "Order")]).await.unwrap();

    assert_eq!(client.strategy(), NormalizationStrategy::KeyPrettify);
    assert_eq!(structure, json!({"Ship To": "[Address]"}));
}

#[tokio::test]
async fn test_analyze_without_files_is_no_documents() {
    let provider = MockAiProvider::new();
    let client = client_with(&provider);

    let result = client.analyze(&[]).await;

    assert!(matches!(result, Err(TemplateError::NoDocuments)));
    assert!(provider.get_calls().is_empty());
}

#[tokio::test]
async fn test_extraction_failure_skips_the_model() {
    let provider = MockAiProvider::new();
    let client = client_with(&provider);

    let result = client
        .analyze(&[pdf("a.pdf", "fine"), pdf("b.pdf", "FAIL")])
        .await;

    assert!(matches!(result, Err(TemplateError::ExtractionFailed(_))));
    assert!(provider.get_calls().is_empty());
}

#[tokio::test]
async fn test_model_failure_is_called_once_and_propagated() {
    let provider = MockAiProvider::new();
    provider.fail_with("connection reset");
    let client = client_with(&provider);

    let result = client.analyze(&[pdf("a.pdf", "Invoice")]).await;

    assert!(
        matches!(&result, Err(TemplateError::ModelCallFailed(m)) if m == "connection reset"),
        "Got {result:?}"
    );
    assert_eq!(provider.get_calls().len(), 1);
}

#[tokio::test]
async fn test_analyze_response_without_json_is_no_json_found() {
    let provider = MockAiProvider::new();
    provider.add_response("Invoice", "Sorry, I could not find a template.");
    let client = client_with(&provider);

    let result = client.analyze(&[pdf("a.pdf", "Invoice")]).await;

    assert!(matches!(result, Err(TemplateError::NoJsonFound)));
}

#[tokio::test]
async fn test_generate_returns_raw_model_text() {
    let provider = MockAiProvider::new();
    provider.add_response("Quarterly Report", "# Quarterly Report\n\nRevenue grew {a lot}.");
    let client = client_with(&provider);

    let document = client
        .generate(
            &json!({"title": "[Title]"}),
            &json!({"title": "Quarterly Report"}),
        )
        .await
        .unwrap();

    assert_eq!(document, "# Quarterly Report\n\nRevenue grew {a lot}.");
    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, DOCUMENT_GENERATION_MODEL);
    assert!(calls[0].prompt.contains(r#"Structure: {"title":"[Title]"}."#));
}

#[tokio::test]
async fn test_custom_task_settings_reach_the_provider() {
    let provider = MockAiProvider::new();
    provider.add_response("Invoice", "{}");
    let client = TemplateClientBuilder::new()
        .ai_provider(Box::new(provider.clone()))
        .extractors(ExtractorRegistry::new().register(MediaType::Pdf, MockExtractor::new()))
        .analysis_task(TaskSettings::new("small-model", 512))
        .build()
        .unwrap();

    client.analyze(&[pdf("a.pdf", "Invoice")]).await.unwrap();

    let calls = provider.get_calls();
    assert_eq!(calls[0].model, "small-model");
    assert_eq!(calls[0].max_tokens, 512);
}

#[test]
fn test_builder_without_provider_fails() {
    let result = TemplateClientBuilder::new().build();
    assert!(matches!(result, Err(TemplateError::MissingAiProvider(_))));
}
