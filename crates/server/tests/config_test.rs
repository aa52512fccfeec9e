//! # Configuration Tests
//!
//! Covers layering of defaults, the YAML file, `${VAR}` substitution and
//! environment overrides.

use docforge::{
    constants::{API_KEY_ENV_VAR, TEMPLATE_ANALYSIS_MAX_TOKENS, TEMPLATE_ANALYSIS_MODEL},
    providers::factory::ProviderKind,
    NormalizationStrategy,
};
use docforge_docx::DocxMode;
use docforge_server::config::{get_config, ConfigError};
use std::env;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

// Environment variables are process-global, so tests that touch them run one at a time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears every environment variable these tests set.
fn clear_env_vars() {
    env::remove_var("PORT");
    env::remove_var("STRATEGY");
    env::remove_var("DOCFORGE_PROVIDER__API_URL");
    env::remove_var("DOCFORGE_TASKS__TEMPLATE_ANALYSIS__MODEL_NAME");
    env::remove_var("DOCFORGE_TASKS__TEMPLATE_ANALYSIS__MAX_TOKENS");
    env::remove_var("DOCFORGE_TEST_SECRET");
    env::remove_var(API_KEY_ENV_VAR);
}

fn write_config(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn test_get_config_defaults() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let (_dir, path) = write_config("{}\n");
    let config = get_config(Some(&path)).expect("Configuration should load successfully");

    assert_eq!(config.port, 9090);
    assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(config.strategy, NormalizationStrategy::JsonExtract);
    assert_eq!(config.docx_mode, DocxMode::Raw);
    assert_eq!(config.provider.provider, ProviderKind::Anthropic);
    assert_eq!(config.provider.api_key, None);
    assert_eq!(config.provider.request_timeout_secs, None);
    assert_eq!(config.tasks.template_analysis.model_name, TEMPLATE_ANALYSIS_MODEL);
    assert_eq!(
        config.tasks.template_analysis.max_tokens,
        TEMPLATE_ANALYSIS_MAX_TOKENS
    );
}

#[test]
fn test_get_config_reads_file_and_substitutes_env() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("DOCFORGE_TEST_SECRET", "from-env");

    let (_dir, path) = write_config(
        r#"
port: 8181
strategy: key_prettify
docx_mode: structured
provider:
  provider: local
  api_url: "http://localhost:1234/v1/chat/completions"
  api_key: "${DOCFORGE_TEST_SECRET}"
  request_timeout_secs: 30
tasks:
  document_generation:
    model_name: "local-writer"
    max_tokens: 2048
"#,
    );
    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.port, 8181);
    assert_eq!(config.strategy, NormalizationStrategy::KeyPrettify);
    assert_eq!(config.docx_mode, DocxMode::Structured);
    assert_eq!(config.provider.provider, ProviderKind::Local);
    assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.provider.request_timeout_secs, Some(30));
    assert_eq!(config.tasks.document_generation.model_name, "local-writer");
    assert_eq!(config.tasks.document_generation.max_tokens, 2048);
    // Untouched task keeps its defaults.
    assert_eq!(config.tasks.template_analysis.model_name, TEMPLATE_ANALYSIS_MODEL);

    clear_env_vars();
}

#[test]
fn test_environment_overrides_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("PORT", "9999");
    env::set_var("DOCFORGE_PROVIDER__API_URL", "http://override.test/v1/messages");
    env::set_var("DOCFORGE_TASKS__TEMPLATE_ANALYSIS__MODEL_NAME", "env-model");
    env::set_var("DOCFORGE_TASKS__TEMPLATE_ANALYSIS__MAX_TOKENS", "123");

    let (_dir, path) = write_config("port: 8181\nprovider:\n  api_url: \"http://file.test\"\n");
    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.port, 9999);
    assert_eq!(
        config.provider.api_url.as_deref(),
        Some("http://override.test/v1/messages")
    );
    assert_eq!(config.tasks.template_analysis.model_name, "env-model");
    assert_eq!(config.tasks.template_analysis.max_tokens, 123);

    clear_env_vars();
}

#[test]
fn test_api_key_falls_back_to_anthropic_env_var() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var(API_KEY_ENV_VAR, "sk-test");

    // An unset placeholder expands to an empty key, which counts as missing.
    let (_dir, path) = write_config("provider:\n  api_key: \"${DOCFORGE_TEST_SECRET}\"\n");
    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));

    clear_env_vars();
}

#[test]
fn test_missing_api_key_is_not_fatal() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let (_dir, path) = write_config("{}\n");
    let config = get_config(Some(&path)).unwrap();

    assert!(config.provider.api_key.is_none());
}

#[test]
fn test_missing_explicit_config_file_is_not_found() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let result = get_config(Some("/definitely/not/here/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_config_debug_redacts_api_key() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let (_dir, path) = write_config("provider:\n  api_key: \"sk-config-secret\"\n");
    let config = get_config(Some(&path)).unwrap();
    let rendered = format!("{config:?}");

    assert_eq!(config.provider.api_key.as_deref(), Some("sk-config-secret"));
    assert!(!rendered.contains("sk-config-secret"), "Key leaked: {rendered}");
    assert!(rendered.contains("<redacted>"));
}
