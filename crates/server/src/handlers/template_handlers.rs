//! # Template Handlers
//!
//! `/analyze` turns uploaded sample documents into a template structure and
//! `/generate` writes a document from a structure plus user inputs.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::types::GenerateRequest;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use axum_extra::extract::Multipart;
use docforge::{NormalizationStrategy, TemplateStructure, UploadedFile};
use serde_json::json;
use tracing::{info, warn};

/// Declared type for parts sent without a `Content-Type` header.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Handler for `POST /analyze`.
///
/// Expects a multipart body with one or more `files` parts, each carrying its
/// own content type, and an optional `strategy` text part
/// (`json_extract` or `key_prettify`).
pub async fn analyze_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<TemplateStructure>>, AppError> {
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut strategy: Option<NormalizationStrategy> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" => {
                let file_name = field.file_name().map(str::to_string);
                let media_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_MEDIA_TYPE)
                    .to_string();
                let bytes = field.bytes().await?.to_vec();
                info!(
                    file = file_name.as_deref().unwrap_or("<unnamed>"),
                    media_type = %media_type,
                    bytes = bytes.len(),
                    "Received upload."
                );
                files.push(UploadedFile::new(file_name, bytes, media_type));
            }
            "strategy" => {
                let value = field.text().await?;
                strategy = Some(value.parse().map_err(AppError::BadRequest)?);
            }
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    let strategy = strategy.unwrap_or_else(|| app_state.client.strategy());
    info!(
        "Analyze request received with {} file(s), strategy {:?}.",
        files.len(),
        strategy
    );

    let debug_info = json!({
        "strategy": strategy,
        "files": files
            .iter()
            .map(|file| json!({
                "name": file.name,
                "media_type": file.media_type,
                "bytes": file.bytes.len(),
            }))
            .collect::<Vec<_>>(),
    });

    let structure = app_state
        .client
        .analyze_with_strategy(&files, strategy)
        .await?;

    Ok(wrap_response(structure, debug_params, Some(debug_info)))
}

/// Handler for `POST /generate`.
///
/// Returns the generated document text as the model wrote it.
pub async fn generate_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    info!("Generate request received.");

    let document = app_state
        .client
        .generate(&request.structure, &request.user_inputs)
        .await?;

    let debug_info = json!({
        "model": app_state.config.tasks.document_generation.model_name,
        "document_chars": document.len(),
    });

    Ok(wrap_response(document, debug_params, Some(debug_info)))
}
