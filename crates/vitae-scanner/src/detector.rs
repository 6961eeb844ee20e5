//! Per-profile resume check, one isolated session per invocation.

use crate::error::DetectionError;
use crate::heuristic;
use crate::report::{DetectionOutcome, ResumeSignals};
use vitae_browser::{Authenticator, Session, SessionFactory};
use vitae_core::{Credentials, PacingConfig, ProfileUrl};

/// Self-contained per-profile check.
///
/// Every invocation opens its own session, logs in, visits the profile, and
/// applies the resume heuristic. All failures are absorbed into the returned
/// outcome; the session is closed on every path.
pub struct ResumeDetector {
    factory: SessionFactory,
    authenticator: Authenticator,
    credentials: Credentials,
    pacing: PacingConfig,
}

impl ResumeDetector {
    /// Create a detector that opens sessions through `factory`.
    #[must_use]
    pub fn new(
        factory: SessionFactory,
        authenticator: Authenticator,
        credentials: Credentials,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            factory,
            authenticator,
            credentials,
            pacing,
        }
    }

    /// Check one profile. Never fails; errors become part of the outcome.
    pub async fn check(&self, index: usize, profile: ProfileUrl) -> DetectionOutcome {
        tracing::debug!(worker = index, profile = %profile, "checking profile");

        let mut session = match self.factory.open_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(worker = index, profile = %profile, "session launch failed: {e}");
                return DetectionOutcome::failed(profile, DetectionError::Session(e.to_string()));
            }
        };

        let result = self.evaluate_profile(&mut session, &profile).await;

        tokio::time::sleep(self.pacing.pre_close.sample()).await;
        session.close().await;

        match result {
            Ok(signals) => {
                tracing::debug!(
                    worker = index,
                    profile = %profile,
                    found = signals.found(),
                    links = signals.links().len(),
                    "check complete"
                );
                DetectionOutcome::detected(profile, signals)
            }
            Err(e) => {
                tracing::warn!(worker = index, profile = %profile, "check failed: {e}");
                DetectionOutcome::failed(profile, e)
            }
        }
    }

    async fn evaluate_profile(
        &self,
        session: &mut Session,
        profile: &ProfileUrl,
    ) -> Result<ResumeSignals, DetectionError> {
        self.authenticator
            .login(session, &self.credentials)
            .await
            .map_err(|e| DetectionError::Auth(e.to_string()))?;

        tokio::time::sleep(self.pacing.pre_navigation.sample()).await;
        session
            .navigate(profile.as_str())
            .await
            .map_err(|e| DetectionError::Navigation(e.to_string()))?;

        // Let lazy profile sections render before reading the page
        tokio::time::sleep(self.pacing.post_load.sample()).await;
        let html = session
            .content()
            .await
            .map_err(|e| DetectionError::Evaluation(e.to_string()))?;

        Ok(heuristic::detect_resume_signals(&html))
    }
}
