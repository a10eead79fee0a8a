//! Integration tests for Brandgate.
//!
//! Each test starts a real server on an ephemeral port with in-memory
//! storage and drives it over HTTP through `brandgate-client`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p brandgate-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use brandgate_client::{Backend, HttpBackend};
use brandgate_server::app;
use brandgate_server::config::AppConfig;
use brandgate_server::db::Stores;
use brandgate_server::middleware::create_memory_session_layer;
use brandgate_server::state::AppState;

/// Credentials of the admin every test server is seeded with.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "integration-pass";

/// A running server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server with in-memory storage and the test admin.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be configured or bound.
    pub async fn start() -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("BRANDGATE_STORAGE", "memory".to_owned()),
            ("BRANDGATE_BASE_URL", "http://127.0.0.1".to_owned()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");

        let session_layer = create_memory_session_layer(&config);
        let state = AppState::new(config, Stores::in_memory(), None, None);

        let created = brandgate_server::services::AuthService::new(state.stores().admins.as_ref())
            .create_admin(ADMIN_EMAIL, "Admin", ADMIN_PASSWORD)
            .await
            .expect("test admin is created");
        assert_eq!(created.email.as_str(), ADMIN_EMAIL);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener has an address");

        let router = app::router(state.clone(), session_layer);
        let task = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server runs");
        });

        Self { addr, state, task }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh client with its own cookie jar (one browser session).
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Arc<HttpBackend> {
        Arc::new(HttpBackend::new(&self.base_url()).expect("valid base URL"))
    }

    /// A client already logged in as the test admin.
    ///
    /// # Panics
    ///
    /// Panics if the login fails.
    pub async fn admin_client(&self) -> Arc<HttpBackend> {
        let client = self.client();
        client
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("test admin can log in");
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
