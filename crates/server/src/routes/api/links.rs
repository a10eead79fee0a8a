//! Link queue API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use brandgate_core::api::{AddLinkRequest, ConsumeResponse};
use brandgate_core::{LinkId, LinkItem, LinkUrl};

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the links router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/links", get(list).post(add).delete(clear))
        .route("/api/links/consume", post(consume_next))
        .route("/api/links/{id}", delete(remove))
}

/// GET /api/links
async fn list(State(state): State<AppState>) -> Result<Json<Vec<LinkItem>>, AppError> {
    Ok(Json(state.stores().links.list().await?))
}

/// POST /api/links
async fn add(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<AddLinkRequest>,
) -> Result<Json<Vec<LinkItem>>, AppError> {
    let url = LinkUrl::parse(&body.url).map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(state.stores().links.add(url).await?))
}

/// DELETE /api/links/{id}
///
/// Unknown ids are a no-op; the current queue is returned either way.
async fn remove(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LinkItem>>, AppError> {
    let id: LinkId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid link id: {id}")))?;
    Ok(Json(state.stores().links.remove(id).await?))
}

/// DELETE /api/links
async fn clear(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkItem>>, AppError> {
    tracing::info!(admin_id = %admin.id, "Clearing link queue");
    Ok(Json(state.stores().links.clear().await?))
}

/// POST /api/links/consume
async fn consume_next(State(state): State<AppState>) -> Result<Json<ConsumeResponse>, AppError> {
    let next = state.stores().links.consume_next().await?;
    if let Some(item) = &next {
        tracing::info!(link_id = %item.id, "Link consumed");
    }
    Ok(Json(ConsumeResponse {
        url: next.map(|item| item.url.into_inner()),
    }))
}
