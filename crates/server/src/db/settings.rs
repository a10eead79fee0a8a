//! Settings database operations.
//!
//! Settings are JSONB values under a text key. The public site config is
//! stored under [`SITE_CONFIG_KEY`].

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use brandgate_core::SiteConfig;

use super::{RepositoryError, SiteConfigStore};

/// Key of the singleton site config row.
pub const SITE_CONFIG_KEY: &str = "site_config";

/// Repository for key/value settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            "SELECT value FROM brandgate.settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Set a setting value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_setting(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO brandgate.settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SiteConfigStore for SettingsRepository {
    async fn get(&self) -> Result<SiteConfig, RepositoryError> {
        match self.get_setting(SITE_CONFIG_KEY).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid site config: {e}"))
            }),
            None => Ok(SiteConfig::default()),
        }
    }

    async fn save(&self, config: &SiteConfig) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(config)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable config: {e}")))?;
        self.set_setting(SITE_CONFIG_KEY, &value).await
    }
}
