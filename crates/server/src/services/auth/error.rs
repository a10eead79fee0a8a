//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown email or malformed email. Never says which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Input rejected when creating an admin.
    #[error("{0}")]
    Validation(String),

    /// An admin with this email already exists.
    #[error("an admin with this email already exists")]
    UserExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    Hash(String),
}
