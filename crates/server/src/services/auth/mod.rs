//! Authentication service.
//!
//! Email + password login against Argon2id hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

use tracing::instrument;

use brandgate_core::Email;

use crate::db::{AdminUserStore, RepositoryError};
use crate::models::AdminUser;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash checked when the email is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("brandgate-dummy-password").ok());

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn AdminUserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn AdminUserStore) -> Self {
        Self { users }
    }

    /// Create an admin with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the email, name or password is invalid.
    /// Returns `AuthError::UserExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name must not be empty".to_owned()));
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(admin_id = %user.id, "Admin created");
        Ok(user)
    }

    /// Create the admin unless one with this email already exists.
    ///
    /// Returns `true` when a new admin was created.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::create_admin`], minus `UserExists`.
    pub async fn ensure_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        match self.create_admin(email, name, password).await {
            Ok(_) => Ok(true),
            Err(AuthError::UserExists) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Check password requirements.
///
/// # Errors
///
/// Returns `AuthError::Validation` describing the unmet requirement.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::InMemoryAdminUsers;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[tokio::test]
    async fn test_login_flow() {
        let store = InMemoryAdminUsers::default();
        let auth = AuthService::new(&store);
        auth.create_admin("Admin@Example.com", "Admin", "s3cret-pass")
            .await
            .unwrap();

        let user = auth
            .login_with_password("admin@example.com", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "admin@example.com");

        let err = auth
            .login_with_password("admin@example.com", "nope-nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        let err = auth
            .login_with_password("nobody@example.com", "s3cret-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_dummy_hash_rejects_everything() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(dummy).is_ok());
        assert!(verify_password("s3cret-pass", dummy).is_err());
        assert!(verify_password("", dummy).is_err());
    }

    #[tokio::test]
    async fn test_unknown_email_is_indistinguishable() {
        let store = InMemoryAdminUsers::default();
        let auth = AuthService::new(&store);
        auth.create_admin("admin@example.com", "Admin", "s3cret-pass")
            .await
            .unwrap();

        let unknown = auth
            .login_with_password("nobody@example.com", "s3cret-pass")
            .await
            .unwrap_err();
        let wrong = auth
            .login_with_password("admin@example.com", "wrong-pass")
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(LazyLock::force(&DUMMY_HASH).is_some());
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = InMemoryAdminUsers::default();
        let auth = AuthService::new(&store);
        assert!(auth.ensure_admin("a@example.com", "A", "password1").await.unwrap());
        assert!(!auth.ensure_admin("a@example.com", "A", "password1").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_admin_validation() {
        let store = InMemoryAdminUsers::default();
        let auth = AuthService::new(&store);
        assert!(matches!(
            auth.create_admin("not-an-email", "A", "password1").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.create_admin("a@example.com", "  ", "password1").await,
            Err(AuthError::Validation(_))
        ));
    }
}
