use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::analyzer::{AnalyzeRequest, AnalyzeResponse};
use crate::error::AnalyzeError;

use super::AppState;

pub async fn api_analyze_area(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let Json(request) = body.map_err(|rejection| AnalyzeError::BadRequest(rejection.body_text()))?;
    let response = state.analyzer.analyze(request).await?;
    Ok(Json(response))
}
