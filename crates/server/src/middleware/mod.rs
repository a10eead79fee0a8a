//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first, see `app::router`)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Security headers
//! 4. Session layer (tower-sessions, `PostgreSQL` or memory store)
//!
//! Admin-only handlers take the [`RequireAdminAuth`] extractor; the rest read
//! [`SessionAuth`].

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{AdminSession, RequireAdminAuth, SessionAuth};
pub use security_headers::security_headers_middleware;
pub use session::{create_memory_session_layer, create_session_layer};
