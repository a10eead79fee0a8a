//! Public consumer flow: confirm, wait, take the next link, redirect.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use brandgate_core::{LinkItem, RequestSequencer};

use crate::backend::Backend;

/// Pause between the visitor's confirmation and the consume call.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(1500);

/// Shown when the queue is empty at consumption time.
pub const NO_LINKS_MESSAGE: &str = "Nenhum link disponível no momento. Tente novamente mais tarde.";

/// Shown when consumption fails.
pub const PROCESSING_ERROR_MESSAGE: &str =
    "Não foi possível processar seu acesso. Tente novamente.";

/// Result of one confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Send the visitor here. Terminal.
    Redirect(String),
    /// The queue was empty.
    NoLinks,
    /// The backend failed. Not retried.
    Failed,
}

impl ConsumeOutcome {
    /// Message to show the visitor, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Redirect(_) => None,
            Self::NoLinks => Some(NO_LINKS_MESSAGE),
            Self::Failed => Some(PROCESSING_ERROR_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct QueueRefresh;

#[derive(Debug, Default)]
struct ConsumerState {
    queue: Vec<LinkItem>,
    sequencer: RequestSequencer<QueueRefresh>,
}

/// The public side of the redirect console.
pub struct PublicConsumer {
    backend: Arc<dyn Backend>,
    delay: Duration,
    state: Mutex<ConsumerState>,
}

impl PublicConsumer {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            delay: DEFAULT_PACING_DELAY,
            state: Mutex::new(ConsumerState::default()),
        }
    }

    /// Override the pacing delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Last known queue contents.
    #[must_use]
    pub fn queue_snapshot(&self) -> Vec<LinkItem> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .queue
            .clone()
    }

    /// Handle a confirmation.
    ///
    /// Waits the pacing delay, then takes the head of the queue. When the
    /// queue turns out to be empty the local snapshot is refreshed, best
    /// effort. Nothing is retried.
    pub async fn confirm(&self) -> ConsumeOutcome {
        tokio::time::sleep(self.delay).await;

        match self.backend.consume_next_link().await {
            Ok(Some(url)) => {
                tracing::info!("Redirecting visitor");
                ConsumeOutcome::Redirect(url)
            }
            Ok(None) => {
                self.refresh_queue().await;
                ConsumeOutcome::NoLinks
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to consume next link");
                ConsumeOutcome::Failed
            }
        }
    }

    /// Re-fetch the queue snapshot. Failures are logged.
    pub async fn refresh_queue(&self) {
        let ticket = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sequencer
            .begin(QueueRefresh);

        match self.backend.get_link_queue().await {
            Ok(queue) => {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                if state.sequencer.is_current(&ticket) {
                    state.queue = queue;
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to refresh link queue"),
        }
    }
}

impl std::fmt::Debug for PublicConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicConsumer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeBackend, url};

    fn consumer(backend: &Arc<FakeBackend>) -> PublicConsumer {
        PublicConsumer::new(Arc::clone(backend) as Arc<dyn Backend>).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_consumes_in_insertion_order() {
        let backend = Arc::new(FakeBackend::default());
        backend.seed(&[url("https://a.example.com/"), url("https://b.example.com/")]);
        let consumer = consumer(&backend);

        assert_eq!(
            consumer.confirm().await,
            ConsumeOutcome::Redirect("https://a.example.com/".to_owned())
        );
        assert_eq!(
            consumer.confirm().await,
            ConsumeOutcome::Redirect("https://b.example.com/".to_owned())
        );
        assert_eq!(consumer.confirm().await, ConsumeOutcome::NoLinks);
    }

    #[tokio::test]
    async fn test_empty_queue_refreshes_snapshot() {
        let backend = Arc::new(FakeBackend::default());
        let consumer = consumer(&backend);

        let outcome = consumer.confirm().await;
        assert_eq!(outcome.message(), Some(NO_LINKS_MESSAGE));
        assert!(consumer.queue_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_retried() {
        let backend = Arc::new(FakeBackend::default());
        backend.seed(&[url("https://a.example.com/")]);
        backend.fail_consume();
        let consumer = consumer(&backend);

        let outcome = consumer.confirm().await;
        assert_eq!(outcome, ConsumeOutcome::Failed);
        assert_eq!(outcome.message(), Some(PROCESSING_ERROR_MESSAGE));
        assert_eq!(backend.get_link_queue().await.unwrap().len(), 1);
    }

    #[test]
    fn test_default_delay() {
        let consumer = PublicConsumer::new(Arc::new(FakeBackend::default()));
        assert_eq!(consumer.delay, Duration::from_millis(1500));
    }
}
