//! The storage/auth contract.

use async_trait::async_trait;

use brandgate_core::api::SessionInfo;
use brandgate_core::{AiFeedback, LinkId, LinkItem, SiteConfig};

use crate::error::ClientError;

/// Operations the stores need from the backend.
///
/// Queue mutations return the queue as it stands afterwards.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_config(&self) -> Result<SiteConfig, ClientError>;

    /// Requires an admin session.
    async fn save_config(&self, config: &SiteConfig) -> Result<SiteConfig, ClientError>;

    async fn get_session(&self) -> Result<SessionInfo, ClientError>;

    /// Fails with [`ClientError::Auth`] on bad credentials.
    async fn login(&self, email: &str, password: &str) -> Result<SessionInfo, ClientError>;

    /// Idempotent.
    async fn logout(&self) -> Result<(), ClientError>;

    async fn get_link_queue(&self) -> Result<Vec<LinkItem>, ClientError>;

    /// Requires an admin session. Malformed URLs fail with
    /// [`ClientError::Validation`].
    async fn add_link_to_queue(&self, url: &str) -> Result<Vec<LinkItem>, ClientError>;

    /// Requires an admin session. Unknown ids are a no-op.
    async fn remove_link_from_queue(&self, id: LinkId) -> Result<Vec<LinkItem>, ClientError>;

    /// Requires an admin session.
    async fn clear_queue(&self) -> Result<Vec<LinkItem>, ClientError>;

    /// Take the head of the queue. `None` when the queue is empty.
    async fn consume_next_link(&self) -> Result<Option<String>, ClientError>;

    /// AI design feedback for a `data:` or `http(s)` image URL.
    async fn analyze_logo(&self, image: &str) -> Result<AiFeedback, ClientError>;
}
