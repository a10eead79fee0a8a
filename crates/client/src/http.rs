//! HTTP implementation of [`Backend`] over `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use brandgate_core::api::{
    AddLinkRequest, AnalyzeRequest, ConsumeResponse, ErrorBody, LoginRequest, SessionInfo,
};
use brandgate_core::{AiFeedback, LinkId, LinkItem, SiteConfig};

use crate::backend::Backend;
use crate::error::ClientError;

/// Client for a running Brandgate server.
///
/// Keeps the session cookie in its own cookie store, so one instance is one
/// browser-like session. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

struct HttpBackendInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            // `/go` answers with 303 to an external site; callers of the JSON
            // API never need redirects followed.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpBackendInner { client, base_url }),
        })
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.inner.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        handle_response(response).await
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Decode a success body, or turn an error body into a [`ClientError`].
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(error) => Err(error.into()),
        Err(_) => {
            tracing::warn!(%status, "Unexpected error response");
            Err(ClientError::Backend(format!("unexpected response: HTTP {status}")))
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_config(&self) -> Result<SiteConfig, ClientError> {
        self.send(self.request(Method::GET, "/api/config")?).await
    }

    async fn save_config(&self, config: &SiteConfig) -> Result<SiteConfig, ClientError> {
        self.send(self.request(Method::PUT, "/api/config")?.json(config))
            .await
    }

    async fn get_session(&self) -> Result<SessionInfo, ClientError> {
        self.send(self.request(Method::GET, "/api/session")?).await
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<SessionInfo, ClientError> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.send(self.request(Method::POST, "/api/session")?.json(&body))
            .await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let _: SessionInfo = self.send(self.request(Method::DELETE, "/api/session")?).await?;
        Ok(())
    }

    async fn get_link_queue(&self) -> Result<Vec<LinkItem>, ClientError> {
        self.send(self.request(Method::GET, "/api/links")?).await
    }

    async fn add_link_to_queue(&self, url: &str) -> Result<Vec<LinkItem>, ClientError> {
        let body = AddLinkRequest {
            url: url.to_owned(),
        };
        self.send(self.request(Method::POST, "/api/links")?.json(&body))
            .await
    }

    async fn remove_link_from_queue(&self, id: LinkId) -> Result<Vec<LinkItem>, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/links/{id}"))?)
            .await
    }

    async fn clear_queue(&self) -> Result<Vec<LinkItem>, ClientError> {
        self.send(self.request(Method::DELETE, "/api/links")?).await
    }

    async fn consume_next_link(&self) -> Result<Option<String>, ClientError> {
        let response: ConsumeResponse = self
            .send(self.request(Method::POST, "/api/links/consume")?)
            .await?;
        Ok(response.url)
    }

    async fn analyze_logo(&self, image: &str) -> Result<AiFeedback, ClientError> {
        let body = AnalyzeRequest {
            image: image.to_owned(),
        };
        self.send(self.request(Method::POST, "/api/branding/analyze")?.json(&body))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let backend = HttpBackend::new("http://127.0.0.1:3000").unwrap();
        let request = backend
            .request(Method::DELETE, "/api/links/abc")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://127.0.0.1:3000/api/links/abc");
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ClientError::Url(_))
        ));
    }
}
