//! Session middleware configuration.
//!
//! Sessions are `PostgreSQL`-backed in production and held in memory when
//! the server runs with `BRANDGATE_STORAGE=memory`. Both share the same
//! cookie settings (SameSite=Strict, 24hr inactivity expiry).

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "brandgate_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Panics
///
/// Panics if the store rejects the hardcoded schema or table name.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AppConfig,
) -> SessionManagerLayer<PostgresStore> {
    // The session table is created by migration in the brandgate schema.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("brandgate")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    configure(store, config.is_secure())
}

/// Create the session layer with an in-process store.
#[must_use]
pub fn create_memory_session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default(), config.is_secure())
}

fn configure<S: SessionStore>(store: S, is_secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
