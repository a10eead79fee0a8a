//! JSON bodies of the storage HTTP API.
//!
//! Shared by the server handlers and the typed client so both sides agree on
//! the wire format.

use serde::{Deserialize, Serialize};

use crate::auth_gate::{AuthState, CurrentAdmin};

/// Classification carried by every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Auth,
    Permission,
    NotFound,
    Backend,
}

/// Error response body: `{"error": kind, "message": text}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

/// `GET /api/session` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentAdmin>,
}

impl From<Option<CurrentAdmin>> for SessionInfo {
    fn from(user: Option<CurrentAdmin>) -> Self {
        Self {
            authenticated: user.is_some(),
            user,
        }
    }
}

impl From<SessionInfo> for AuthState {
    fn from(info: SessionInfo) -> Self {
        match (info.authenticated, info.user) {
            (true, Some(user)) => Self::Authenticated { user },
            _ => Self::Unauthenticated,
        }
    }
}

/// `POST /api/session` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/links` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLinkRequest {
    pub url: String,
}

/// `POST /api/links/consume` response. `url` is `null` when the queue is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub url: Option<String>,
}

/// `POST /api/branding/analyze` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// `data:image/...;base64,` URL or `http(s)` URL.
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{AdminUserId, Email};

    #[test]
    fn test_session_info_wire_format() {
        let json = serde_json::to_string(&SessionInfo::default()).unwrap();
        assert_eq!(json, r#"{"authenticated":false}"#);

        let info = SessionInfo::from(Some(CurrentAdmin {
            id: AdminUserId::new(3),
            email: Email::parse("ops@example.com").unwrap(),
            name: "Ops".to_owned(),
        }));
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["authenticated"], true);
        assert_eq!(value["user"]["email"], "ops@example.com");
        assert!(AuthState::from(info).is_authenticated());
    }

    #[test]
    fn test_inconsistent_session_is_unauthenticated() {
        let info = SessionInfo {
            authenticated: true,
            user: None,
        };
        assert_eq!(AuthState::from(info), AuthState::Unauthenticated);
    }

    #[test]
    fn test_error_kind_wire_format() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"not_found","message":"gone"}"#).unwrap();
        assert_eq!(body.error, ErrorKind::NotFound);
    }

    #[test]
    fn test_consume_response_null() {
        let json = serde_json::to_string(&ConsumeResponse { url: None }).unwrap();
        assert_eq!(json, r#"{"url":null}"#);
    }
}
