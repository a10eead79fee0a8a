//! JSON storage API.
//!
//! The contract the typed client speaks. Public reads, admin-gated writes,
//! errors as `{"error", "message"}` bodies.

pub mod branding;
pub mod config;
pub mod links;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(config::router())
        .merge(session::router())
        .merge(links::router())
        .merge(branding::router())
}
