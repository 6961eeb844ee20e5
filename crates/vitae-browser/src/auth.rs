use crate::error::AuthError;
use crate::session::{AuthState, Session};
use scraper::{Html, Selector};
use std::time::{Duration, Instant};
use vitae_core::config::AuthConfig;
use vitae_core::Credentials;

/// Interval between post-submit login probes.
const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Drives the login form and classifies what the site did with the credentials.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

/// What a single post-submit probe of the page revealed.
#[derive(Debug, PartialEq, Eq)]
enum LoginProbe {
    Success,
    Challenge(String),
    Rejected(String),
    Pending,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Log the session in, updating its auth state on both outcomes.
    pub async fn login(
        &self,
        session: &mut Session,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        match self.try_login(session, credentials).await {
            Ok(()) => {
                session.set_auth_state(AuthState::Authenticated);
                tracing::info!(session = %session.id(), "login succeeded");
                Ok(())
            }
            Err(e) => {
                session.set_auth_state(AuthState::Failed);
                tracing::warn!(session = %session.id(), "login failed: {e}");
                Err(e)
            }
        }
    }

    async fn try_login(
        &self,
        session: &Session,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let login_url = self.config.login_url();
        session
            .navigate(&login_url)
            .await
            .map_err(|e| AuthError::Timeout(e.to_string()))?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let field_wait = session.element_timeout().min(timeout);
        session
            .wait_for_selector(&self.config.username_selector, field_wait)
            .await
            .map_err(|e| AuthError::Timeout(format!("login form not available: {e}")))?;
        session
            .wait_for_selector(&self.config.password_selector, field_wait)
            .await
            .map_err(|e| AuthError::Timeout(format!("login form not available: {e}")))?;

        session
            .type_into(&self.config.username_selector, credentials.email())
            .await
            .map_err(|e| AuthError::Timeout(e.to_string()))?;
        session
            .type_into(&self.config.password_selector, credentials.password())
            .await
            .map_err(|e| AuthError::Timeout(e.to_string()))?;
        session
            .press_enter(&self.config.password_selector)
            .await
            .map_err(|e| AuthError::Timeout(e.to_string()))?;

        let deadline = Instant::now() + timeout;
        loop {
            let url = session.current_url().await.unwrap_or_default();
            let html = session.content().await.unwrap_or_default();
            match classify_login_state(&url, &html, &self.config) {
                LoginProbe::Success => return Ok(()),
                LoginProbe::Challenge(marker) => {
                    return Err(AuthError::ChallengeDetected(format!(
                        "url matched '{marker}'"
                    )));
                }
                LoginProbe::Rejected(selector) => {
                    return Err(AuthError::CredentialsRejected(format!(
                        "page matched '{selector}'"
                    )));
                }
                LoginProbe::Pending => {}
            }
            if Instant::now() >= deadline {
                return Err(AuthError::Timeout(format!(
                    "no post-login marker within {}s (possible 2FA or blocking)",
                    self.config.timeout_secs
                )));
            }
            tokio::time::sleep(PROBE_INTERVAL).await;
        }
    }
}

/// Classify a snapshot of the post-submit page.
///
/// Challenge redirects win over everything else: once the site routes to a
/// verification flow, any leftover form markup is stale.
fn classify_login_state(url: &str, html: &str, config: &AuthConfig) -> LoginProbe {
    for marker in &config.challenge_markers {
        if url.contains(marker.as_str()) {
            return LoginProbe::Challenge(marker.clone());
        }
    }

    let document = Html::parse_document(html);
    for raw in &config.login_error_selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if document.select(&selector).next().is_some() {
                return LoginProbe::Rejected(raw.clone());
            }
        }
    }
    for raw in &config.post_login_selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if document.select(&selector).next().is_some() {
                return LoginProbe::Success;
            }
        }
    }
    LoginProbe::Pending
}
