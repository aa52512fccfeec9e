use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let max_upload_bytes = app_state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/analyze",
            post(handlers::analyze_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/generate", post(handlers::generate_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
