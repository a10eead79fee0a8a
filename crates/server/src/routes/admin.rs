//! Admin console (server-rendered).
//!
//! `GET /admin` is the guarded route: it renders the login form in place
//! while no admin is logged in, and the dashboard afterwards. Mutations are
//! plain form posts that redirect back with a notice code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use brandgate_core::{AuthState, LinkId, LinkItem, LinkUrl, Route, SiteConfig, View};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{AdminSession, RequireAdminAuth, SessionAuth};
use crate::models::CurrentAdmin;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Login form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin: CurrentAdmin,
    pub config: SiteConfig,
    pub links: Vec<LinkItem>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigForm {
    pub image_url: String,
    pub caption: String,
}

#[derive(Debug, Deserialize)]
pub struct AddLinkForm {
    pub url: String,
}

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/config", post(save_config))
        .route("/admin/links", post(add_link))
        .route("/admin/links/clear", post(clear_links))
        .route("/admin/links/{id}/delete", post(remove_link))
}

/// Map a notice code from the query string to its message.
fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "config_saved" => Some("Configuração salva."),
        "link_added" => Some("Link adicionado à fila."),
        "link_removed" => Some("Link removido."),
        "queue_cleared" => Some("Fila esvaziada."),
        _ => None,
    }
}

/// Render the dashboard with fresh config and queue.
async fn render_dashboard(
    state: &AppState,
    admin: CurrentAdmin,
    notice: Option<&'static str>,
    error: Option<String>,
) -> Result<DashboardTemplate, AppError> {
    let stores = state.stores();
    let (config, links) = tokio::try_join!(stores.config.get(), stores.links.list())?;

    Ok(DashboardTemplate {
        admin,
        config,
        links,
        notice,
        error,
    })
}

/// Dashboard re-rendered with a validation error.
async fn rejected(state: &AppState, admin: CurrentAdmin, message: String) -> Response {
    match render_dashboard(state, admin, None, Some(message)).await {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /admin
async fn index(
    State(state): State<AppState>,
    SessionAuth(auth): SessionAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    match (auth.view_for(Route::Admin), auth) {
        (View::AdminDashboard, AuthState::Authenticated { user }) => {
            let notice = query.notice.as_deref().and_then(notice_message);
            Ok(render_dashboard(&state, user, notice, None)
                .await?
                .into_response())
        }
        _ => Ok(LoginTemplate {
            error: None,
            email: String::new(),
        }
        .into_response()),
    }
}

/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.stores().admins.as_ref());

    match auth.login_with_password(&form.email, &form.password).await {
        Ok(user) => {
            let admin = CurrentAdmin::from(&user);
            AdminSession(&session).begin(&admin).await?;
            set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
            tracing::info!(admin_id = %admin.id, "Admin logged in");
            Ok(Redirect::to("/admin").into_response())
        }
        Err(e) => {
            let err = AppError::from(e);
            if !matches!(err, AppError::Auth(_)) {
                return Err(err);
            }
            tracing::warn!("Admin login failed");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    error: Some(err.to_string()),
                    email: form.email,
                },
            )
                .into_response())
        }
    }
}

/// POST /admin/logout
///
/// Always ends on the public page.
async fn logout(session: Session) -> Result<Redirect, AppError> {
    AdminSession(&session).end().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// POST /admin/config
async fn save_config(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ConfigForm>,
) -> Result<Response, AppError> {
    let config = SiteConfig {
        image_url: form.image_url,
        caption: form.caption,
    };
    let config = match config.validated() {
        Ok(config) => config,
        Err(e) => return Ok(rejected(&state, admin, e.to_string()).await),
    };

    state.stores().config.save(&config).await?;
    tracing::info!(admin_id = %admin.id, "Site config saved");
    Ok(Redirect::to("/admin?notice=config_saved").into_response())
}

/// POST /admin/links
async fn add_link(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<AddLinkForm>,
) -> Result<Response, AppError> {
    let url = match LinkUrl::parse(&form.url) {
        Ok(url) => url,
        Err(e) => return Ok(rejected(&state, admin, e.to_string()).await),
    };

    state.stores().links.add(url).await?;
    Ok(Redirect::to("/admin?notice=link_added").into_response())
}

/// POST /admin/links/{id}/delete
async fn remove_link(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id: LinkId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid link id: {id}")))?;
    state.stores().links.remove(id).await?;
    Ok(Redirect::to("/admin?notice=link_removed"))
}

/// POST /admin/links/clear
async fn clear_links(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    state.stores().links.clear().await?;
    tracing::info!(admin_id = %admin.id, "Link queue cleared");
    Ok(Redirect::to("/admin?notice=queue_cleared"))
}
