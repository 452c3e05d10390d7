pub mod analyze;

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::analyzer::AreaAnalyzer;
use crate::error::AnalyzeError;

pub use analyze::api_analyze_area;

pub struct AppState {
    pub analyzer: AreaAnalyzer,
}

/// The HTTP surface: health check, analysis endpoint, CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Analysis
        .route("/analyze-area", post(api_analyze_area))
        .with_state(state)
        // Panics become a 500 with a `detail` body
        .layer(CatchPanicLayer::custom(panic_response))
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = panic.downcast_ref::<&str>() {
        text.to_string()
    } else {
        "handler panicked".to_string()
    };
    AnalyzeError::Internal(anyhow::anyhow!(message)).into_response()
}
