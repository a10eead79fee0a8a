//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! BRANDGATE_ADMIN_PASSWORD=... bg-cli admin create -e admin@example.com -n "Admin Name"
//! ```
//!
//! # Environment Variables
//!
//! - `BRANDGATE_DATABASE_URL` - `PostgreSQL` connection string

use brandgate_server::db::AdminUserRepository;
use brandgate_server::services::{AuthError, AuthService};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use super::migrate::{MigrationError, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Config(#[from] MigrationError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid input, taken email, or storage failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let users = AdminUserRepository::new(pool);
    let user = AuthService::new(&users)
        .create_admin(email, name, password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id.as_i32())
}
