//! Queued redirect targets.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::id::LinkId;

/// Errors that can occur when validating a [`LinkUrl`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkUrlError {
    /// The input is empty (after trimming).
    #[error("link URL cannot be empty")]
    Empty,
    /// The input is longer than [`LinkUrl::MAX_LENGTH`].
    #[error("link URL must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not an absolute URL.
    #[error("invalid URL: {0}")]
    Malformed(String),
    /// The URL scheme is not one visitors can be redirected to.
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
}

/// A validated, absolute `http`/`https` redirect target.
///
/// ```
/// use brandgate_core::LinkUrl;
///
/// assert!(LinkUrl::parse("https://example.com/offer").is_ok());
/// assert!(LinkUrl::parse("not-a-url").is_err());
/// assert!(LinkUrl::parse("/relative/path").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkUrl(String);

impl LinkUrl {
    /// Maximum accepted URL length.
    pub const MAX_LENGTH: usize = 2048;

    /// Validate a redirect target.
    ///
    /// Surrounding whitespace is ignored. The stored form is the URL exactly
    /// as entered (trimmed), not the normalized serialization, so admins see
    /// what they typed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, not an absolute URL,
    /// or uses a scheme other than `http`/`https`.
    pub fn parse(input: &str) -> Result<Self, LinkUrlError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LinkUrlError::Empty);
        }
        if input.len() > Self::MAX_LENGTH {
            return Err(LinkUrlError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let url = Url::parse(input).map_err(|e| LinkUrlError::Malformed(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(LinkUrlError::UnsupportedScheme(other.to_owned())),
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(LinkUrlError::Malformed("URL has no host".to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `LinkUrl` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LinkUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LinkUrl {
    type Error = LinkUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LinkUrl> for String {
    fn from(url: LinkUrl) -> Self {
        url.0
    }
}

impl std::str::FromStr for LinkUrl {
    type Err = LinkUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for LinkUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A pending redirect target in the queue.
///
/// Wire format is `{ "id", "url", "createdAt" }` with `createdAt` in epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    /// Unique id within the queue.
    pub id: LinkId,
    /// Redirect target.
    pub url: LinkUrl,
    /// When the item was enqueued.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl LinkItem {
    /// Create a new item with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(url: LinkUrl) -> Self {
        Self {
            id: LinkId::generate(),
            url,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_absolute_http_urls() {
        assert!(LinkUrl::parse("http://example.com").is_ok());
        assert!(LinkUrl::parse("https://example.com/a?b=c#d").is_ok());
        assert_eq!(
            LinkUrl::parse("  https://example.com/x  ").unwrap().as_str(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_rejects_non_urls() {
        assert_eq!(LinkUrl::parse(""), Err(LinkUrlError::Empty));
        assert!(matches!(
            LinkUrl::parse("not-a-url"),
            Err(LinkUrlError::Malformed(_))
        ));
        assert!(matches!(
            LinkUrl::parse("example.com/path"),
            Err(LinkUrlError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            LinkUrl::parse("javascript:alert(1)"),
            Err(LinkUrlError::UnsupportedScheme("javascript".to_owned()))
        );
        assert!(matches!(
            LinkUrl::parse("mailto:someone@example.com"),
            Err(LinkUrlError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_overlong_urls() {
        let url = format!("https://example.com/{}", "a".repeat(LinkUrl::MAX_LENGTH));
        assert!(matches!(
            LinkUrl::parse(&url),
            Err(LinkUrlError::TooLong { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<LinkUrl>("\"nope\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_link_item_wire_format() {
        let item = LinkItem {
            id: LinkId::generate(),
            url: LinkUrl::parse("https://example.com").unwrap(),
            created_at: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["createdAt"], 1_700_000_000_123_i64);
        assert_eq!(json["id"], item.id.to_string());

        let back: LinkItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
