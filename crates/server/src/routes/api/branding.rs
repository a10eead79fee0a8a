//! Logo feedback API handler.

use axum::{Json, Router, extract::State, routing::post};

use brandgate_core::AiFeedback;
use brandgate_core::api::AnalyzeRequest;

use crate::claude::ClaudeError;
use crate::error::AppError;
use crate::state::AppState;

/// Build the branding API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/branding/analyze", post(analyze))
}

/// POST /api/branding/analyze
///
/// 503 when no Claude API key is configured.
async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AiFeedback>, AppError> {
    let claude = state
        .claude()
        .ok_or_else(|| AppError::Unavailable("logo feedback is not configured".to_string()))?;
    let feedback = claude.analyze_logo(&body.image).await.map_err(|e| match e {
        ClaudeError::UnsupportedImage(msg) => AppError::Validation(format!("unsupported image: {msg}")),
        other => AppError::Claude(other),
    })?;
    Ok(Json(feedback))
}
