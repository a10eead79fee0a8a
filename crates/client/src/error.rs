//! Client error type.

use brandgate_core::api::{ErrorBody, ErrorKind};
use thiserror::Error;

/// Errors returned by the typed client.
///
/// Server error bodies are mapped onto the variant of their `error` kind;
/// the message is the server's, suitable for showing to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected by the server.
    #[error("{0}")]
    Validation(String),

    /// Login failed.
    #[error("{0}")]
    Auth(String),

    /// Not logged in as an admin.
    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    /// The server failed.
    #[error("{0}")]
    Backend(String),

    /// Transport failure (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL could not be joined with an endpoint path.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The error class, with transport failures counted as backend errors.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Permission(_) => ErrorKind::Permission,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Backend(_) | Self::Http(_) | Self::Url(_) => ErrorKind::Backend,
        }
    }
}

impl From<ErrorBody> for ClientError {
    fn from(body: ErrorBody) -> Self {
        match body.error {
            ErrorKind::Validation => Self::Validation(body.message),
            ErrorKind::Auth => Self::Auth(body.message),
            ErrorKind::Permission => Self::Permission(body.message),
            ErrorKind::NotFound => Self::NotFound(body.message),
            ErrorKind::Backend => Self::Backend(body.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_mapping() {
        let err = ClientError::from(ErrorBody {
            error: ErrorKind::Auth,
            message: "Invalid email or password".to_owned(),
        });
        assert!(matches!(err, ClientError::Auth(_)));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.kind(), ErrorKind::Auth);
    }
}
