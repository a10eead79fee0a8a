//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::claude::ClaudeClient;
use crate::config::AppConfig;
use crate::db::Stores;

/// Application state shared across all handlers.
///
/// Cheap to clone: everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    stores: Stores,
    pool: Option<PgPool>,
    claude: Option<ClaudeClient>,
}

impl AppState {
    /// Build the state.
    ///
    /// `pool` is `None` in memory mode; the readiness probe then always
    /// reports ready.
    #[must_use]
    pub fn new(
        config: AppConfig,
        stores: Stores,
        pool: Option<PgPool>,
        claude: Option<ClaudeClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                pool,
                claude,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Claude client, when `CLAUDE_API_KEY` is configured.
    #[must_use]
    pub fn claude(&self) -> Option<&ClaudeClient> {
        self.inner.claude.as_ref()
    }
}
