//! Admin session extractors.
//!
//! The session holds at most one [`CurrentAdmin`] under
//! [`session_keys::CURRENT_ADMIN`]. Handlers either read it as an
//! [`AuthState`] ([`SessionAuth`]) or demand it ([`RequireAdminAuth`]).

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use brandgate_core::AuthState;

use crate::error::AppError;
use crate::models::{CurrentAdmin, session_keys};

/// Auth state of the requesting browser or client.
///
/// Never rejects: a missing session layer or an unreadable session is
/// [`AuthState::Unauthenticated`].
pub struct SessionAuth(pub AuthState);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => AdminSession(session).current().await,
            None => None,
        };
        Ok(Self(AuthState::from(user)))
    }
}

/// The logged-in admin; rejects everyone else.
///
/// ```rust,ignore
/// async fn clear(RequireAdminAuth(admin): RequireAdminAuth) { .. }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Why [`RequireAdminAuth`] refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRequired {
    /// Form posts go back to `/admin`, which shows the login form.
    Page,
    /// JSON callers get a `permission` error body.
    Api,
}

impl IntoResponse for AdminRequired {
    fn into_response(self) -> Response {
        match self {
            Self::Page => Redirect::to("/admin").into_response(),
            Self::Api => AppError::Unauthorized("admin login required".to_string()).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminRequired;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionAuth(auth) = SessionAuth::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match auth {
            AuthState::Authenticated { user } => Ok(Self(user)),
            AuthState::Unauthenticated if parts.uri.path().starts_with("/api/") => {
                Err(AdminRequired::Api)
            }
            AuthState::Unauthenticated => Err(AdminRequired::Page),
        }
    }
}

/// Admin identity stored in a tower session.
#[derive(Clone, Copy)]
pub struct AdminSession<'a>(pub &'a Session);

impl AdminSession<'_> {
    /// The stored admin. Store failures are logged and read as "nobody".
    pub async fn current(self) -> Option<CurrentAdmin> {
        self.0
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read admin from session");
                None
            })
    }

    /// Store `admin` under a fresh session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn begin(self, admin: &CurrentAdmin) -> Result<(), tower_sessions::session::Error> {
        self.0.cycle_id().await?;
        self.0.insert(session_keys::CURRENT_ADMIN, admin).await
    }

    /// Forget the admin. Succeeds when nobody was logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn end(self) -> Result<(), tower_sessions::session::Error> {
        self.0
            .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .map(drop)
    }
}
