//! Branding session: the logo being previewed, its filter settings and the
//! last AI feedback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brandgate_core::{
    AiFeedback, DEFAULT_LOGO, LogoSettings, PreviewVariant, RequestSequencer, logo_data_url,
    render_previews,
};

use crate::backend::Backend;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Analysis;

#[derive(Debug)]
struct BrandingState {
    logo: String,
    confirmed: bool,
    settings: LogoSettings,
    feedback: Option<AiFeedback>,
    analyzing: bool,
    sequencer: RequestSequencer<Analysis>,
}

impl Default for BrandingState {
    fn default() -> Self {
        Self {
            logo: DEFAULT_LOGO.to_owned(),
            confirmed: false,
            settings: LogoSettings::default(),
            feedback: None,
            analyzing: false,
            sequencer: RequestSequencer::new(),
        }
    }
}

/// One visitor's branding preview.
pub struct BrandingSession {
    backend: Arc<dyn Backend>,
    state: Mutex<BrandingState>,
}

impl BrandingSession {
    /// Start on the confirmation screen with the default logo.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Mutex::new(BrandingState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrandingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn logo(&self) -> String {
        self.lock().logo.clone()
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.lock().confirmed
    }

    #[must_use]
    pub fn settings(&self) -> LogoSettings {
        self.lock().settings
    }

    #[must_use]
    pub fn feedback(&self) -> Option<AiFeedback> {
        self.lock().feedback.clone()
    }

    /// Whether an analysis request is in flight.
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.lock().analyzing
    }

    /// The four preview variants for the current logo and settings.
    #[must_use]
    pub fn previews(&self) -> Vec<PreviewVariant> {
        let state = self.lock();
        render_previews(&state.logo, &state.settings)
    }

    /// Replace the logo with an uploaded image.
    ///
    /// Clears feedback, drops any analysis in flight and goes back to the
    /// confirmation screen.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the file is not an image or is
    /// too large; the current logo is kept.
    pub fn upload(&self, content_type: &str, bytes: &[u8]) -> Result<(), ClientError> {
        let data_url =
            logo_data_url(content_type, bytes).map_err(|e| ClientError::Validation(e.to_string()))?;
        self.replace_logo(data_url);
        Ok(())
    }

    /// Restore the default logo and go back to the confirmation screen.
    pub fn reset(&self) {
        self.replace_logo(DEFAULT_LOGO.to_owned());
    }

    fn replace_logo(&self, logo: String) {
        let mut state = self.lock();
        state.logo = logo;
        state.confirmed = false;
        state.feedback = None;
        state.analyzing = false;
        state.sequencer.invalidate(Analysis);
    }

    /// Leave the confirmation screen for the editor.
    pub fn confirm(&self) {
        self.lock().confirmed = true;
    }

    /// Back to the confirmation screen. Settings and feedback are kept.
    pub fn back(&self) {
        self.lock().confirmed = false;
    }

    /// Replace the filter settings, clamped into their ranges.
    pub fn set_settings(&self, settings: LogoSettings) {
        self.lock().settings = settings.clamped();
    }

    /// Request AI feedback for the current logo.
    ///
    /// Failures are logged and swallowed: the feedback card simply stays
    /// empty. A response for a logo that has since been replaced, or one
    /// overtaken by a newer request, is discarded.
    pub async fn analyze(&self) -> Option<AiFeedback> {
        let (ticket, logo) = {
            let mut state = self.lock();
            state.analyzing = true;
            (state.sequencer.begin(Analysis), state.logo.clone())
        };

        let result = self.backend.analyze_logo(&logo).await;

        let mut state = self.lock();
        if !state.sequencer.is_current(&ticket) {
            tracing::debug!(seq = ticket.seq(), "Discarding stale logo analysis");
            return state.feedback.clone();
        }
        state.analyzing = false;
        match result {
            Ok(feedback) => state.feedback = Some(feedback),
            Err(e) => {
                tracing::warn!(error = %e, "Logo analysis failed");
                state.feedback = None;
            }
        }
        state.feedback.clone()
    }
}

impl std::fmt::Debug for BrandingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandingSession").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use brandgate_core::PreviewContext;

    use super::*;
    use crate::fake::FakeBackend;

    fn session(backend: &Arc<FakeBackend>) -> BrandingSession {
        BrandingSession::new(Arc::clone(backend) as Arc<dyn Backend>)
    }

    #[test]
    fn test_starts_with_default_logo() {
        let session = session(&Arc::new(FakeBackend::default()));
        assert_eq!(session.logo(), DEFAULT_LOGO);
        assert!(!session.is_confirmed());

        let previews = session.previews();
        let contexts: Vec<_> = previews.iter().map(|p| p.context).collect();
        assert_eq!(contexts, PreviewContext::ALL);
    }

    #[test]
    fn test_upload_resets_confirmation() {
        let session = session(&Arc::new(FakeBackend::default()));
        session.confirm();
        session.upload("image/png", b"png-bytes").unwrap();
        assert!(!session.is_confirmed());
        assert!(session.logo().starts_with("data:image/png;base64,"));

        let err = session.upload("text/plain", b"hello").unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(session.logo().starts_with("data:image/png;base64,"));

        session.reset();
        assert_eq!(session.logo(), DEFAULT_LOGO);
    }

    #[test]
    fn test_settings_are_clamped() {
        let session = session(&Arc::new(FakeBackend::default()));
        session.set_settings(LogoSettings {
            hue_rotate: 720.0,
            ..LogoSettings::default()
        });
        assert!((session.settings().hue_rotate - 360.0).abs() < f64::EPSILON);
        assert!(session.previews()[0].style.contains("hue-rotate(360deg)"));
    }

    #[tokio::test]
    async fn test_analyze_sets_feedback() {
        let backend = Arc::new(FakeBackend::default());
        let session = session(&backend);
        let feedback = session.analyze().await.unwrap();
        assert_eq!(feedback.suggestions, ["suggestion 1"]);
        assert_eq!(session.feedback(), Some(feedback));
        assert!(!session.is_analyzing());
    }

    #[tokio::test]
    async fn test_analysis_for_replaced_logo_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        let session = Arc::new(session(&backend));

        let hold = backend.hold_next_analyze();
        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.analyze().await }
        });
        hold.entered.notified().await;

        session.upload("image/png", b"new-logo").unwrap();
        hold.release.notify_one();

        assert!(pending.await.unwrap().is_none());
        assert!(session.feedback().is_none());
        assert_eq!(backend.analyze_calls(), 1);
    }
}
