//! Admin console store.
//!
//! Owns the auth gate, the cached site config and the cached queue. Every
//! backend call is sequence-tagged per operation; the cache only ever moves
//! forward to the newest response.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brandgate_core::{
    AuthGate, AuthState, LinkId, LinkItem, LinkUrl, RequestSequencer, Route, SiteConfig, Ticket,
    View,
};

use crate::backend::Backend;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ConsoleOp {
    Session,
    Config,
    Links,
}

#[derive(Debug, Default)]
struct ConsoleState {
    gate: AuthGate,
    config: SiteConfig,
    links: Vec<LinkItem>,
    error: Option<String>,
    sequencer: RequestSequencer<ConsoleOp>,
}

/// Point-in-time copy of the console state, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleSnapshot {
    pub view: View,
    pub auth: AuthState,
    pub config: SiteConfig,
    pub links: Vec<LinkItem>,
    /// Message of the last failed action, shown verbatim.
    pub error: Option<String>,
}

/// The admin console.
pub struct AdminConsole {
    backend: Arc<dyn Backend>,
    state: Mutex<ConsoleState>,
}

impl AdminConsole {
    /// Create a console starting on `route`, logged out until [`load`] runs.
    ///
    /// [`load`]: AdminConsole::load
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, route: Route) -> Self {
        Self {
            backend,
            state: Mutex::new(ConsoleState {
                gate: AuthGate::new(AuthState::Unauthenticated, route),
                ..ConsoleState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, op: ConsoleOp) -> Ticket<ConsoleOp> {
        self.lock().sequencer.begin(op)
    }

    /// Apply `f` if `ticket` is still current. Returns whether it was.
    fn apply(&self, ticket: Ticket<ConsoleOp>, f: impl FnOnce(&mut ConsoleState)) -> bool {
        let mut state = self.lock();
        if !state.sequencer.is_current(&ticket) {
            tracing::debug!(op = ?ticket.op(), seq = ticket.seq(), "Discarding stale response");
            return false;
        }
        f(&mut state);
        true
    }

    /// Record an input error caught before any backend call.
    ///
    /// No ticket is taken, so requests already in flight still land.
    fn reject(&self, err: ClientError) -> ClientError {
        self.lock().error = Some(err.to_string());
        err
    }

    /// Record a failure of a still-current operation and hand it back.
    fn fail(&self, ticket: Ticket<ConsoleOp>, err: ClientError) -> ClientError {
        let message = err.to_string();
        self.apply(ticket, |state| state.error = Some(message));
        err
    }

    #[must_use]
    pub fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.lock();
        ConsoleSnapshot {
            view: state.gate.view(),
            auth: state.gate.state().clone(),
            config: state.config.clone(),
            links: state.links.clone(),
            error: state.error.clone(),
        }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.lock().gate.view()
    }

    /// Change route. The auth state is untouched.
    pub fn navigate(&self, route: Route) -> View {
        self.lock().gate.navigate(route)
    }

    /// Restore the session and fetch config and queue, concurrently.
    ///
    /// Failures are recorded per part; the first one is returned.
    ///
    /// # Errors
    ///
    /// Returns the first backend error among the three loads.
    pub async fn load(&self) -> Result<View, ClientError> {
        let (session, config, links) =
            tokio::join!(self.refresh_session(), self.refresh_config(), self.refresh_links());
        session?;
        config?;
        links?;
        Ok(self.view())
    }

    /// Ask the backend whether a session exists.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the auth state is left unchanged.
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        let ticket = self.begin(ConsoleOp::Session);
        match self.backend.get_session().await {
            Ok(info) => {
                self.apply(ticket, |state| {
                    state.gate.restore(info.into());
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(ticket, e)),
        }
    }

    /// Re-fetch the site config.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cached config is kept.
    pub async fn refresh_config(&self) -> Result<(), ClientError> {
        let ticket = self.begin(ConsoleOp::Config);
        match self.backend.get_config().await {
            Ok(config) => {
                self.apply(ticket, |state| {
                    state.config = config;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(ticket, e)),
        }
    }

    /// Re-fetch the queue.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cached queue is kept.
    pub async fn refresh_links(&self) -> Result<(), ClientError> {
        let ticket = self.begin(ConsoleOp::Links);
        let result = self.backend.get_link_queue().await;
        self.finish_links(ticket, result)
    }

    fn finish_links(
        &self,
        ticket: Ticket<ConsoleOp>,
        result: Result<Vec<LinkItem>, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(links) => {
                self.apply(ticket, |state| {
                    state.links = links;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(ticket, e)),
        }
    }

    /// Log in. On failure the console stays logged out and the reason is
    /// kept in [`ConsoleSnapshot::error`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] on bad credentials, or the backend error.
    pub async fn login(&self, email: &str, password: &str) -> Result<View, ClientError> {
        let ticket = self.begin(ConsoleOp::Session);
        let info = match self.backend.login(email, password).await {
            Ok(info) => info,
            Err(e) => return Err(self.fail(ticket, e)),
        };

        let Some(user) = info.user else {
            let err = ClientError::Auth("login did not establish a session".to_owned());
            return Err(self.fail(ticket, err));
        };

        tracing::info!(admin_id = %user.id, "Logged in");
        let applied = self.apply(ticket, |state| {
            state.gate.authenticated(user);
            state.error = None;
        });
        if !applied {
            tracing::debug!("Login overtaken by a newer session change");
        }
        Ok(self.view())
    }

    /// Log out, unconditionally, and go back to the public route.
    ///
    /// The local state is logged out before the backend call, superseding
    /// any older session response still in flight. A login that starts
    /// after this call wins over it. A backend failure is only logged.
    pub async fn logout(&self) -> View {
        let view = {
            let mut state = self.lock();
            state.sequencer.invalidate(ConsoleOp::Session);
            state.error = None;
            state.gate.logout()
        };

        if let Err(e) = self.backend.logout().await {
            tracing::warn!(error = %e, "Logout request failed");
        }
        view
    }

    /// Save the site config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a rejected config,
    /// [`ClientError::Permission`] when logged out, or the backend error.
    pub async fn save_config(&self, config: SiteConfig) -> Result<(), ClientError> {
        let config = match config.validated() {
            Ok(config) => config,
            Err(e) => return Err(self.reject(ClientError::Validation(e.to_string()))),
        };

        let ticket = self.begin(ConsoleOp::Config);
        match self.backend.save_config(&config).await {
            Ok(saved) => {
                self.apply(ticket, |state| {
                    state.config = saved;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(ticket, e)),
        }
    }

    /// Append a link. Malformed URLs are rejected without a backend call and
    /// leave the cached queue untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a malformed URL, or the backend
    /// error.
    pub async fn add_link(&self, url: &str) -> Result<(), ClientError> {
        let url = match LinkUrl::parse(url) {
            Ok(url) => url,
            Err(e) => return Err(self.reject(ClientError::Validation(e.to_string()))),
        };

        let ticket = self.begin(ConsoleOp::Links);
        let result = self.backend.add_link_to_queue(url.as_str()).await;
        self.finish_links(ticket, result)
    }

    /// Remove a link. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn remove_link(&self, id: LinkId) -> Result<(), ClientError> {
        let ticket = self.begin(ConsoleOp::Links);
        let result = self.backend.remove_link_from_queue(id).await;
        self.finish_links(ticket, result)
    }

    /// Empty the queue.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn clear_queue(&self) -> Result<(), ClientError> {
        let ticket = self.begin(ConsoleOp::Links);
        let result = self.backend.clear_queue().await;
        self.finish_links(ticket, result)
    }
}

impl std::fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeBackend, PASSWORD, url};

    fn console(backend: &Arc<FakeBackend>, route: Route) -> AdminConsole {
        AdminConsole::new(Arc::clone(backend) as Arc<dyn Backend>, route)
    }

    fn urls(snapshot: &ConsoleSnapshot) -> Vec<&str> {
        snapshot.links.iter().map(|item| item.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_auth_scenario() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);

        assert_eq!(console.load().await.unwrap(), View::Login);

        let err = console.login("admin@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
        let snapshot = console.snapshot();
        assert_eq!(snapshot.view, View::Login);
        assert_eq!(snapshot.error.as_deref(), Some("Invalid email or password"));

        let view = console.login("admin@example.com", PASSWORD).await.unwrap();
        assert_eq!(view, View::AdminDashboard);
        assert!(console.snapshot().error.is_none());

        assert_eq!(console.logout().await, View::Public);
        assert_eq!(console.navigate(Route::Admin), View::Login);
    }

    #[tokio::test]
    async fn test_navigation_keeps_session() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", PASSWORD).await.unwrap();

        assert_eq!(console.navigate(Route::Public), View::Public);
        assert!(console.snapshot().auth.is_authenticated());
        assert_eq!(console.navigate(Route::Admin), View::AdminDashboard);
    }

    #[tokio::test]
    async fn test_default_config_when_nothing_saved() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Public);
        console.load().await.unwrap();
        assert_eq!(console.snapshot().config, SiteConfig::default());
    }

    #[tokio::test]
    async fn test_queue_scenario() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", PASSWORD).await.unwrap();

        console.add_link("https://a.example.com/").await.unwrap();
        console.add_link("https://b.example.com/").await.unwrap();
        assert_eq!(
            urls(&console.snapshot()),
            ["https://a.example.com/", "https://b.example.com/"]
        );

        assert_eq!(
            backend.consume_next_link().await.unwrap().as_deref(),
            Some("https://a.example.com/")
        );
        console.refresh_links().await.unwrap();
        assert_eq!(urls(&console.snapshot()), ["https://b.example.com/"]);

        console.add_link("https://c.example.com/").await.unwrap();
        assert_eq!(
            urls(&console.snapshot()),
            ["https://b.example.com/", "https://c.example.com/"]
        );

        console.clear_queue().await.unwrap();
        assert!(console.snapshot().links.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_link_leaves_queue_unchanged() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", PASSWORD).await.unwrap();
        console.add_link("https://a.example.com/").await.unwrap();

        let err = console.add_link("not-a-url").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(urls(&console.snapshot()), ["https://a.example.com/"]);
        assert_eq!(backend.get_link_queue().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_need_login() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        let err = console.add_link("https://a.example.com/").await.unwrap_err();
        assert!(matches!(err, ClientError::Permission(_)));
        assert!(console.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn test_remove_unknown_link_is_noop() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", PASSWORD).await.unwrap();
        console.add_link("https://a.example.com/").await.unwrap();

        console.remove_link(LinkId::generate()).await.unwrap();
        assert_eq!(urls(&console.snapshot()), ["https://a.example.com/"]);
    }

    #[tokio::test]
    async fn test_stale_queue_response_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        backend.seed(&[url("https://a.example.com/")]);
        let console = Arc::new(console(&backend, Route::Admin));
        console.login("admin@example.com", PASSWORD).await.unwrap();

        // A slow refresh starts first and reads the queue as [A].
        let gate = backend.hold_next_list();
        let slow = tokio::spawn({
            let console = Arc::clone(&console);
            async move { console.refresh_links().await }
        });
        gate.entered.notified().await;

        // A newer add completes while the refresh is still in flight.
        console.add_link("https://b.example.com/").await.unwrap();
        gate.release.notify_one();
        slow.await.unwrap().unwrap();

        assert_eq!(
            urls(&console.snapshot()),
            ["https://a.example.com/", "https://b.example.com/"]
        );
    }

    #[tokio::test]
    async fn test_login_after_slow_logout_stays_logged_in() {
        let backend = Arc::new(FakeBackend::default());
        let console = Arc::new(console(&backend, Route::Admin));
        console.login("admin@example.com", PASSWORD).await.unwrap();

        let gate = backend.hold_next_logout();
        let slow = tokio::spawn({
            let console = Arc::clone(&console);
            async move { console.logout().await }
        });
        gate.entered.notified().await;
        assert_eq!(console.view(), View::Public);

        // The admin logs back in while the logout response is still pending.
        assert_eq!(console.navigate(Route::Admin), View::Login);
        let view = console.login("admin@example.com", PASSWORD).await.unwrap();
        assert_eq!(view, View::AdminDashboard);
        gate.release.notify_one();
        slow.await.unwrap();

        assert!(backend.is_authenticated());
        let snapshot = console.snapshot();
        assert_eq!(snapshot.view, View::AdminDashboard);
        assert!(snapshot.auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_link_keeps_in_flight_refresh() {
        let backend = Arc::new(FakeBackend::default());
        backend.seed(&[url("https://a.example.com/")]);
        let console = Arc::new(console(&backend, Route::Admin));
        console.login("admin@example.com", PASSWORD).await.unwrap();

        let gate = backend.hold_next_list();
        let slow = tokio::spawn({
            let console = Arc::clone(&console);
            async move { console.refresh_links().await }
        });
        gate.entered.notified().await;

        let err = console.add_link("not-a-url").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        gate.release.notify_one();
        slow.await.unwrap().unwrap();

        let snapshot = console.snapshot();
        assert_eq!(urls(&snapshot), ["https://a.example.com/"]);
        assert_eq!(snapshot.links, backend.get_link_queue().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_config_is_reported_without_backend_call() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", PASSWORD).await.unwrap();

        let config = SiteConfig {
            image_url: "not a url".to_owned(),
            caption: "Oferta".to_owned(),
        };
        let err = console.save_config(config).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(console.snapshot().error.is_some());
        assert_eq!(backend.get_config().await.unwrap(), SiteConfig::default());
    }

    #[tokio::test]
    async fn test_successful_reload_clears_old_error() {
        let backend = Arc::new(FakeBackend::default());
        let console = console(&backend, Route::Admin);
        console.login("admin@example.com", "wrong").await.unwrap_err();
        assert!(console.snapshot().error.is_some());

        console.refresh_config().await.unwrap();
        assert!(console.snapshot().error.is_none());

        console.add_link("not-a-url").await.unwrap_err();
        console.refresh_session().await.unwrap();
        assert!(console.snapshot().error.is_none());
    }
}
