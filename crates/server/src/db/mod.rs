//! Storage backends.
//!
//! # Database: `brandgate` schema
//!
//! ## Tables
//!
//! - `admin_user` - Admin accounts with Argon2id password hashes
//! - `link_queue` - FIFO queue of redirect targets (`position` orders it)
//! - `settings` - Key/value JSONB settings (`site_config` lives here)
//! - `session` - `tower-sessions` storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p brandgate-cli -- migrate
//! ```
//!
//! Every store is also available as an in-process implementation (see
//! [`memory`]) selected with `BRANDGATE_STORAGE=memory`.

pub mod admin_users;
pub mod links;
pub mod memory;
pub mod settings;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use brandgate_core::{Email, LinkId, LinkItem, LinkUrl, SiteConfig};

use crate::models::admin_user::AdminUser;

pub use admin_users::AdminUserRepository;
pub use links::LinkRepository;
pub use memory::{InMemoryAdminUsers, InMemoryLinkQueue, InMemorySiteConfig};
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The ordered queue of redirect targets.
///
/// Mutating operations return the queue as it stands afterwards.
#[async_trait]
pub trait LinkQueueStore: Send + Sync {
    /// Current ordered snapshot.
    async fn list(&self) -> Result<Vec<LinkItem>, RepositoryError>;

    /// Append `url` at the tail with a fresh id.
    async fn add(&self, url: LinkUrl) -> Result<Vec<LinkItem>, RepositoryError>;

    /// Remove the item with `id`. Unknown ids are a no-op.
    async fn remove(&self, id: LinkId) -> Result<Vec<LinkItem>, RepositoryError>;

    /// Atomically remove and return the head item.
    ///
    /// Each item is returned to at most one caller.
    async fn consume_next(&self) -> Result<Option<LinkItem>, RepositoryError>;

    /// Remove every item.
    async fn clear(&self) -> Result<Vec<LinkItem>, RepositoryError>;
}

/// The singleton public site configuration.
#[async_trait]
pub trait SiteConfigStore: Send + Sync {
    /// The persisted config, or [`SiteConfig::default`] when none was saved.
    async fn get(&self) -> Result<SiteConfig, RepositoryError>;

    /// Replace the persisted config wholesale.
    async fn save(&self, config: &SiteConfig) -> Result<(), RepositoryError>;
}

/// Admin accounts.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Look up an admin and their password hash.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError>;

    /// Create an admin. Fails with [`RepositoryError::Conflict`] on a taken email.
    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError>;

    /// Whether an admin with this email exists.
    async fn exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.get_password_hash(email).await?.is_some())
    }
}

/// The set of stores the server runs on.
#[derive(Clone)]
pub struct Stores {
    pub links: Arc<dyn LinkQueueStore>,
    pub config: Arc<dyn SiteConfigStore>,
    pub admins: Arc<dyn AdminUserStore>,
}

impl Stores {
    /// Stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            links: Arc::new(LinkRepository::new(pool.clone())),
            config: Arc::new(SettingsRepository::new(pool.clone())),
            admins: Arc::new(AdminUserRepository::new(pool)),
        }
    }

    /// Stores held in process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            links: Arc::new(InMemoryLinkQueue::default()),
            config: Arc::new(InMemorySiteConfig::default()),
            admins: Arc::new(InMemoryAdminUsers::default()),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
