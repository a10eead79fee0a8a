//! Link queue repository for `PostgreSQL`.
//!
//! Order comes from the `position` identity column, so insertion order is
//! consumption order even when two rows share a `created_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use brandgate_core::{LinkId, LinkItem, LinkUrl};

use super::{LinkQueueStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    url: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for LinkItem {
    type Error = RepositoryError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let url = LinkUrl::parse(&row.url).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid url in link_queue: {e}"))
        })?;

        Ok(Self {
            id: LinkId::from_uuid(row.id),
            url,
            created_at: row.created_at,
        })
    }
}

/// Repository for the redirect link queue.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkQueueStore for LinkRepository {
    async fn list(&self) -> Result<Vec<LinkItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r"
            SELECT id, url, created_at
            FROM brandgate.link_queue
            ORDER BY position
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn add(&self, url: LinkUrl) -> Result<Vec<LinkItem>, RepositoryError> {
        let item = LinkItem::new(url);
        sqlx::query(
            r"
            INSERT INTO brandgate.link_queue (id, url, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(item.id.as_uuid())
        .bind(item.url.as_str())
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        self.list().await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: LinkId) -> Result<Vec<LinkItem>, RepositoryError> {
        sqlx::query("DELETE FROM brandgate.link_queue WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        self.list().await
    }

    #[instrument(skip(self))]
    async fn consume_next(&self) -> Result<Option<LinkItem>, RepositoryError> {
        // SKIP LOCKED: concurrent consumers each take a different head row
        let row = sqlx::query_as::<_, LinkRow>(
            r"
            DELETE FROM brandgate.link_queue
            WHERE id = (
                SELECT id FROM brandgate.link_queue
                ORDER BY position
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, url, created_at
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<Vec<LinkItem>, RepositoryError> {
        let result = sqlx::query("DELETE FROM brandgate.link_queue")
            .execute(&self.pool)
            .await?;
        tracing::info!(removed = result.rows_affected(), "Link queue cleared");

        Ok(Vec::new())
    }
}
