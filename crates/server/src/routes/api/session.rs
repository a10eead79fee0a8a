//! Session API handlers (login state for the typed client).

use axum::{Json, Router, extract::State, routing::get};
use tower_sessions::Session;

use brandgate_core::api::{LoginRequest, SessionInfo};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{AdminSession, SessionAuth};
use crate::models::CurrentAdmin;
use crate::services::AuthService;
use crate::state::AppState;

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/session",
        get(get_session).post(login).delete(logout),
    )
}

/// GET /api/session
async fn get_session(SessionAuth(auth): SessionAuth) -> Json<SessionInfo> {
    Json(SessionInfo::from(auth.user().cloned()))
}

/// POST /api/session
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionInfo>, AppError> {
    let auth = AuthService::new(state.stores().admins.as_ref());
    let user = auth.login_with_password(&body.email, &body.password).await?;

    let admin = CurrentAdmin::from(&user);
    AdminSession(&session).begin(&admin).await?;
    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(SessionInfo::from(Some(admin))))
}

/// DELETE /api/session
///
/// Idempotent: logging out without a session succeeds.
async fn logout(session: Session) -> Result<Json<SessionInfo>, AppError> {
    AdminSession(&session).end().await?;
    clear_sentry_user();
    Ok(Json(SessionInfo::default()))
}
