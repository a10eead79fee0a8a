//! Site config API handlers.

use axum::{Json, Router, extract::State, routing::get};

use brandgate_core::SiteConfig;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the config router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/config", get(get_config).put(save_config))
}

/// Current public config (default when none was saved).
///
/// GET /api/config
async fn get_config(State(state): State<AppState>) -> Result<Json<SiteConfig>, AppError> {
    Ok(Json(state.stores().config.get().await?))
}

/// Replace the public config.
///
/// PUT /api/config
async fn save_config(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(config): Json<SiteConfig>,
) -> Result<Json<SiteConfig>, AppError> {
    let config = config
        .validated()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    state.stores().config.save(&config).await?;
    tracing::info!(admin_id = %admin.id, "Site config saved");
    Ok(Json(config))
}
