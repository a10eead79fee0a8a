//! In-process storage backend.
//!
//! Used with `BRANDGATE_STORAGE=memory` and by the router tests. Each store
//! keeps its state behind a `tokio::sync::Mutex`; every operation runs under
//! one lock acquisition, which makes `consume_next` linearizable.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use brandgate_core::{AdminUserId, Email, LinkId, LinkItem, LinkQueue, LinkUrl, SiteConfig};

use super::{AdminUserStore, LinkQueueStore, RepositoryError, SiteConfigStore};
use crate::models::admin_user::AdminUser;

/// In-memory link queue.
#[derive(Debug, Default)]
pub struct InMemoryLinkQueue {
    queue: Mutex<LinkQueue>,
}

#[async_trait]
impl LinkQueueStore for InMemoryLinkQueue {
    async fn list(&self) -> Result<Vec<LinkItem>, RepositoryError> {
        Ok(self.queue.lock().await.snapshot())
    }

    async fn add(&self, url: LinkUrl) -> Result<Vec<LinkItem>, RepositoryError> {
        let mut queue = self.queue.lock().await;
        queue.add(url);
        Ok(queue.snapshot())
    }

    async fn remove(&self, id: LinkId) -> Result<Vec<LinkItem>, RepositoryError> {
        let mut queue = self.queue.lock().await;
        queue.remove(id);
        Ok(queue.snapshot())
    }

    async fn consume_next(&self) -> Result<Option<LinkItem>, RepositoryError> {
        Ok(self.queue.lock().await.consume_next())
    }

    async fn clear(&self) -> Result<Vec<LinkItem>, RepositoryError> {
        let mut queue = self.queue.lock().await;
        queue.clear();
        Ok(queue.snapshot())
    }
}

/// In-memory site config. `None` until the first save.
#[derive(Debug, Default)]
pub struct InMemorySiteConfig {
    config: Mutex<Option<SiteConfig>>,
}

#[async_trait]
impl SiteConfigStore for InMemorySiteConfig {
    async fn get(&self) -> Result<SiteConfig, RepositoryError> {
        Ok(self.config.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, config: &SiteConfig) -> Result<(), RepositoryError> {
        *self.config.lock().await = Some(config.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct AdminTable {
    next_id: i32,
    rows: Vec<(AdminUser, String)>,
}

/// In-memory admin accounts.
#[derive(Debug, Default)]
pub struct InMemoryAdminUsers {
    table: Mutex<AdminTable>,
}

#[async_trait]
impl AdminUserStore for InMemoryAdminUsers {
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .find(|(user, _)| &user.email == email)
            .cloned())
    }

    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let mut table = self.table.lock().await;
        if table.rows.iter().any(|(user, _)| &user.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        table.next_id += 1;
        let user = AdminUser {
            id: AdminUserId::new(table.next_id),
            email: email.clone(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        table.rows.push((user.clone(), password_hash.to_owned()));
        Ok(user)
    }
}
