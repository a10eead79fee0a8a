//! Public landing page and link consumption.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use brandgate_core::SiteConfig;

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Shown when the queue is empty at consumption time.
pub const NO_LINKS_MESSAGE: &str = "Nenhum link disponível no momento. Tente novamente mais tarde.";

/// Shown when consumption fails.
pub const PROCESSING_ERROR_MESSAGE: &str =
    "Não foi possível processar seu acesso. Tente novamente.";

/// Public landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "public.html")]
pub struct PublicTemplate {
    pub config: SiteConfig,
    pub message: Option<String>,
}

/// Build the public router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/go", post(go))
}

/// GET /
async fn index(State(state): State<AppState>) -> Result<PublicTemplate, AppError> {
    let config = state.stores().config.get().await?;
    Ok(PublicTemplate {
        config,
        message: None,
    })
}

/// Take the next link and redirect to it.
///
/// POST /go
async fn go(State(state): State<AppState>) -> Response {
    let outcome = state.stores().links.consume_next().await;

    let (status, message) = match outcome {
        Ok(Some(item)) => {
            tracing::info!(link_id = %item.id, "Redirecting visitor");
            return Redirect::to(item.url.as_str()).into_response();
        }
        Ok(None) => (StatusCode::OK, NO_LINKS_MESSAGE),
        Err(e) => {
            tracing::error!(error = %e, "Failed to consume next link");
            (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_ERROR_MESSAGE)
        }
    };

    // Best effort: the page still renders with the default config.
    let config = match state.stores().config.get().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load site config");
            SiteConfig::default()
        }
    };

    (
        status,
        PublicTemplate {
            config,
            message: Some(message.to_owned()),
        },
    )
        .into_response()
}
