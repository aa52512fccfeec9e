use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use docforge::TemplateError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates the kinds of errors that can occur within a handler,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `docforge` pipeline.
    Template(TemplateError),
    /// A request the server could not interpret (bad JSON, unknown option values).
    BadRequest(String),
    /// A multipart body that could not be read, including one over the size limit.
    Multipart(MultipartError),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Template(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Template(err) => {
                error!("TemplateError: {:?}", err);
                let status = match &err {
                    TemplateError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    TemplateError::ExtractionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    TemplateError::NoDocuments => StatusCode::BAD_REQUEST,
                    TemplateError::ModelCallFailed(_)
                    | TemplateError::NoJsonFound
                    | TemplateError::MalformedJson(_) => StatusCode::BAD_GATEWAY,
                    TemplateError::JsonSerialization(_)
                    | TemplateError::ReqwestClientBuild(_)
                    | TemplateError::MissingAiProvider(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            AppError::BadRequest(message) => {
                error!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Multipart(err) => {
                error!("Multipart error: {}", err.body_text());
                (err.status(), err.body_text())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = self.status_and_message();
        let body = Json(json!({
            "error": error_message,
        }));
        (status_code, body).into_response()
    }
}
