//! Claude API client for logo design feedback.

use std::sync::Arc;

use brandgate_core::AiFeedback;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::ClaudeConfig;

use super::error::ClaudeError;
use super::types::{ChatRequest, ChatResponse, ContentBlock, ImageSource, Message};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Media types the Messages API accepts for inline images.
const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

const SYSTEM_PROMPT: &str = "You are a brand identity designer reviewing logos. \
Reply with a single JSON object and nothing else.";

const ANALYZE_PROMPT: &str = "Evaluate this logo for use across a website navbar, \
a hero banner, an app icon and a dark sidebar. Respond with JSON of the form \
{\"score\": <number from 0 to 10>, \"suggestions\": [<short actionable suggestion>, ...]} \
with at most five suggestions, written in Portuguese.";

/// Claude API client.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
}

impl ClaudeClient {
    /// Create a new Claude client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key contains invalid header characters or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClaudeConfig) -> Result<Self, ClaudeError> {
        let api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ClaudeError::InvalidKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// Ask Claude for design feedback on a logo.
    ///
    /// `image` is either a `data:image/...;base64,` URL or an `http(s)` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is unsupported, the API request fails,
    /// or the model's answer is not the expected JSON.
    #[instrument(skip(self, image), fields(model = %self.inner.model))]
    pub async fn analyze_logo(&self, image: &str) -> Result<AiFeedback, ClaudeError> {
        let source = image_source(image)?;
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: vec![Message::user(vec![
                ContentBlock::Image { source },
                ContentBlock::Text {
                    text: ANALYZE_PROMPT.to_string(),
                },
            ])],
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let response = read_response(response).await?;
        tracing::debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Logo analysis completed"
        );
        parse_feedback(&response.text())
    }
}

/// Decode a success body or classify the failure.
async fn read_response(response: reqwest::Response) -> Result<ChatResponse, ClaudeError> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClaudeError::from_response(status, retry_after, &body));
    }
    serde_json::from_str(&body)
        .map_err(|e| ClaudeError::MalformedFeedback(format!("unreadable response: {e}")))
}

/// Turn a data URL or remote URL into an image source block.
fn image_source(image: &str) -> Result<ImageSource, ClaudeError> {
    if let Some(rest) = image.strip_prefix("data:") {
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| ClaudeError::UnsupportedImage("malformed data URL".to_string()))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ClaudeError::UnsupportedImage("data URL is not base64".to_string()))?;
        if !SUPPORTED_MEDIA_TYPES.contains(&media_type) {
            return Err(ClaudeError::UnsupportedImage(media_type.to_string()));
        }
        return Ok(ImageSource::Base64 {
            media_type: media_type.to_string(),
            data: data.to_string(),
        });
    }

    match url::Url::parse(image) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(ImageSource::Url {
            url: url.to_string(),
        }),
        _ => Err(ClaudeError::UnsupportedImage(
            "expected a data URL or an http(s) URL".to_string(),
        )),
    }
}

/// Extract the feedback object from the model's text answer.
///
/// Tolerates prose or code fences around the JSON object.
fn parse_feedback(text: &str) -> Result<AiFeedback, ClaudeError> {
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text.get(start..=end),
        _ => None,
    }
    .ok_or_else(|| ClaudeError::MalformedFeedback("no JSON object in model answer".to_string()))?;

    let feedback: AiFeedback = serde_json::from_str(json)
        .map_err(|e| ClaudeError::MalformedFeedback(e.to_string()))?;
    if !feedback.score.is_finite() {
        return Err(ClaudeError::MalformedFeedback("score is not a finite number".to_string()));
    }
    Ok(feedback)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_source_data_url() {
        let source = image_source("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(
            source,
            ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "iVBORw0KGgo=".to_string(),
            }
        );
    }

    #[test]
    fn test_image_source_remote_url() {
        let source = image_source("https://cdn.example.net/logo.png").unwrap();
        assert!(matches!(source, ImageSource::Url { .. }));
    }

    #[test]
    fn test_image_source_rejects_unsupported() {
        assert!(image_source("data:image/tiff;base64,AAAA").is_err());
        assert!(image_source("data:image/png,rawbytes").is_err());
        assert!(image_source("ftp://example.net/logo.png").is_err());
        assert!(image_source("logo.png").is_err());
    }

    #[test]
    fn test_parse_feedback_with_fences() {
        let text = "```json\n{\"score\": 7.5, \"suggestions\": [\"Aumente o contraste\", \"Simplifique\"]}\n```";
        let feedback = parse_feedback(text).unwrap();
        assert!((feedback.score - 7.5).abs() < f64::EPSILON);
        assert_eq!(feedback.suggestions, vec!["Aumente o contraste", "Simplifique"]);
    }

    #[test]
    fn test_parse_feedback_rejects_garbage() {
        assert!(parse_feedback("I cannot see the image.").is_err());
        assert!(parse_feedback("{\"rating\": 3}").is_err());
    }

    #[test]
    fn test_claude_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ClaudeClient>();
    }
}
