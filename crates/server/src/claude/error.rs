//! Failures of a logo analysis request.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer from the Messages API.
    #[error("API error {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// The configured key was refused or cannot be sent as a header.
    #[error("invalid API key")]
    InvalidKey,

    /// Only base64 data URLs of a supported type and http(s) URLs are sent.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The model answered, but not with a `{score, suggestions}` object.
    #[error("malformed feedback: {0}")]
    MalformedFeedback(String),
}

impl ClaudeError {
    /// Classify a non-success response from its status and body.
    ///
    /// `retry_after` is the parsed `Retry-After` header, when present.
    #[must_use]
    pub fn from_response(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                retry_after_secs: retry_after.unwrap_or(60),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::InvalidKey,
            _ => {
                let (kind, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
                    Ok(envelope) => (envelope.error.kind, envelope.error.message),
                    Err(_) => ("unknown".to_string(), body.trim().to_string()),
                };
                Self::Api {
                    status: status.as_u16(),
                    kind,
                    message,
                }
            }
        }
    }
}

/// `{"type": "error", "error": {"type": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}
