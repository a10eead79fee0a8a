//! In-process [`Backend`] for the store tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use brandgate_core::api::SessionInfo;
use brandgate_core::{
    AdminUserId, AiFeedback, CurrentAdmin, Email, LinkId, LinkItem, LinkQueue, LinkUrl,
    SiteConfig,
};

use crate::backend::Backend;
use crate::error::ClientError;

pub const PASSWORD: &str = "s3cret-pass";

pub fn url(s: &str) -> LinkUrl {
    LinkUrl::parse(s).unwrap()
}

/// Pauses one backend call: `entered` fires once the call has read its
/// data, and the call returns after `release`.
#[derive(Default)]
pub struct Hold {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct FakeState {
    queue: LinkQueue,
    config: Option<SiteConfig>,
    user: Option<CurrentAdmin>,
    fail_consume: bool,
    analyze_calls: usize,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    list_hold: Mutex<Option<Arc<Hold>>>,
    logout_hold: Mutex<Option<Arc<Hold>>>,
    analyze_hold: Mutex<Option<Arc<Hold>>>,
}

impl FakeBackend {
    pub fn seed(&self, urls: &[LinkUrl]) {
        let mut state = self.state.lock().unwrap();
        for url in urls {
            state.queue.add(url.clone());
        }
    }

    pub fn fail_consume(&self) {
        self.state.lock().unwrap().fail_consume = true;
    }

    pub fn analyze_calls(&self) -> usize {
        self.state.lock().unwrap().analyze_calls
    }

    pub fn hold_next_list(&self) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        *self.list_hold.lock().unwrap() = Some(Arc::clone(&hold));
        hold
    }

    pub fn hold_next_logout(&self) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        *self.logout_hold.lock().unwrap() = Some(Arc::clone(&hold));
        hold
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().user.is_some()
    }

    pub fn hold_next_analyze(&self) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        *self.analyze_hold.lock().unwrap() = Some(Arc::clone(&hold));
        hold
    }

    fn require_admin(&self) -> Result<(), ClientError> {
        if self.state.lock().unwrap().user.is_some() {
            Ok(())
        } else {
            Err(ClientError::Permission("admin login required".to_owned()))
        }
    }
}

async fn pause(hold: Option<Arc<Hold>>) {
    if let Some(hold) = hold {
        hold.entered.notify_one();
        hold.release.notified().await;
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn get_config(&self) -> Result<SiteConfig, ClientError> {
        Ok(self.state.lock().unwrap().config.clone().unwrap_or_default())
    }

    async fn save_config(&self, config: &SiteConfig) -> Result<SiteConfig, ClientError> {
        self.require_admin()?;
        self.state.lock().unwrap().config = Some(config.clone());
        Ok(config.clone())
    }

    async fn get_session(&self) -> Result<SessionInfo, ClientError> {
        Ok(SessionInfo::from(self.state.lock().unwrap().user.clone()))
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionInfo, ClientError> {
        if email != "admin@example.com" || password != PASSWORD {
            return Err(ClientError::Auth("Invalid email or password".to_owned()));
        }
        let user = CurrentAdmin {
            id: AdminUserId::new(1),
            email: Email::parse(email).unwrap(),
            name: "Admin".to_owned(),
        };
        self.state.lock().unwrap().user = Some(user.clone());
        Ok(SessionInfo::from(Some(user)))
    }

    /// The session ends before the pause; only the response is delayed.
    async fn logout(&self) -> Result<(), ClientError> {
        self.state.lock().unwrap().user = None;
        let hold = self.logout_hold.lock().unwrap().take();
        pause(hold).await;
        Ok(())
    }

    async fn get_link_queue(&self) -> Result<Vec<LinkItem>, ClientError> {
        let snapshot = self.state.lock().unwrap().queue.snapshot();
        let hold = self.list_hold.lock().unwrap().take();
        pause(hold).await;
        Ok(snapshot)
    }

    async fn add_link_to_queue(&self, url: &str) -> Result<Vec<LinkItem>, ClientError> {
        self.require_admin()?;
        let url = LinkUrl::parse(url).map_err(|e| ClientError::Validation(e.to_string()))?;
        let mut state = self.state.lock().unwrap();
        state.queue.add(url);
        Ok(state.queue.snapshot())
    }

    async fn remove_link_from_queue(&self, id: LinkId) -> Result<Vec<LinkItem>, ClientError> {
        self.require_admin()?;
        let mut state = self.state.lock().unwrap();
        state.queue.remove(id);
        Ok(state.queue.snapshot())
    }

    async fn clear_queue(&self) -> Result<Vec<LinkItem>, ClientError> {
        self.require_admin()?;
        let mut state = self.state.lock().unwrap();
        state.queue.clear();
        Ok(state.queue.snapshot())
    }

    async fn consume_next_link(&self) -> Result<Option<String>, ClientError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_consume {
            return Err(ClientError::Backend("Internal server error".to_owned()));
        }
        Ok(state.queue.consume_next().map(|item| item.url.into_inner()))
    }

    /// Scores by call number, so tests can tell responses apart.
    async fn analyze_logo(&self, image: &str) -> Result<AiFeedback, ClientError> {
        let call = {
            let mut state = self.state.lock().unwrap();
            state.analyze_calls += 1;
            state.analyze_calls
        };
        let hold = self.analyze_hold.lock().unwrap().take();
        pause(hold).await;

        if image.is_empty() {
            return Err(ClientError::Validation("unsupported image".to_owned()));
        }
        Ok(AiFeedback {
            score: f64::from(u32::try_from(call).unwrap()),
            suggestions: vec![format!("suggestion {call}")],
        })
    }
}
