//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! GET  /                          - Landing page (config image + caption)
//! POST /go                        - Consume next link, 303 to it
//!
//! # Admin console (login form rendered in place when logged out)
//! GET  /admin                     - Login form or dashboard
//! POST /admin/login               - Password login
//! POST /admin/logout              - Logout, back to /
//! POST /admin/config              - Save site config
//! POST /admin/links               - Enqueue a link
//! POST /admin/links/{id}/delete   - Remove a link
//! POST /admin/links/clear         - Empty the queue
//!
//! # Branding preview
//! GET  /branding                  - Preview with the default logo
//! POST /branding                  - Upload / adjust / confirm / analyze / reset
//!
//! # JSON API
//! GET|PUT         /api/config
//! GET|POST|DELETE /api/session
//! GET|POST|DELETE /api/links
//! DELETE          /api/links/{id}
//! POST            /api/links/consume
//! POST            /api/branding/analyze
//! ```

pub mod admin;
pub mod api;
pub mod branding;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the router with every application route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .merge(admin::router())
        .merge(branding::router())
        .merge(api::router())
}
