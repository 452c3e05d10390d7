use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Failure of one analysis, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The request names no place.
    #[error("{0}")]
    BadRequest(String),

    /// Geocoding or the feature query failed.
    #[error("{0}")]
    Lookup(String),

    /// The model failed or returned something unusable in the narrative stage.
    #[error("LLM API Error: {0}")]
    Upstream(String),

    #[error("Unexpected error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::Lookup(_) | AnalyzeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AnalyzeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Analysis failed");
        } else {
            warn!(status = status.as_u16(), detail = %detail, "Rejected analysis request");
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
