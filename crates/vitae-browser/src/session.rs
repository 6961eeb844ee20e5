use crate::error::{BrowserError, Result};
use crate::fingerprint::{FingerprintConfig, STEALTH_SCRIPT};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetTimezoneOverrideParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use chrono::{DateTime, Utc};
use futures_util::stream::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;
use vitae_core::config::BrowserConfig as BrowserSettings;

/// Interval between selector polling attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Grace period for the browser process to exit after a close request.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Launch arguments applied to every session.
const SESSION_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-extensions",
    "--no-first-run",
    "--no-default-browser-check",
];

/// Authentication state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    Failed,
}

/// Opens isolated browser sessions.
///
/// Each call to [`SessionFactory::open_session`] launches its own browser
/// process with a randomized fingerprint and a unique user data directory, so
/// no state is shared between sessions.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    settings: BrowserSettings,
}

impl SessionFactory {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    /// Launch a browser process and prepare a masked page.
    pub async fn open_session(&self) -> Result<Session> {
        let fingerprint = FingerprintConfig::randomized();
        let id = Uuid::new_v4();
        let user_data_dir = std::env::temp_dir().join(format!("vitae-session-{id}"));
        std::fs::create_dir_all(&user_data_dir)
            .map_err(|e| BrowserError::LaunchFailed(format!("user data dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .user_data_dir(&user_data_dir)
            .args(SESSION_ARGS.to_vec());

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.settings.chrome_executable {
            if path.exists() {
                builder = builder.chrome_executable(path);
            }
        }

        // The profile dir exists from here on; every error return below has
        // to remove it, successful sessions remove it in close()
        let config = match builder.build() {
            Ok(config) => config,
            Err(e) => {
                remove_profile_dir(id, &user_data_dir);
                return Err(BrowserError::LaunchFailed(e));
            }
        };

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => {
                remove_profile_dir(id, &user_data_dir);
                return Err(BrowserError::LaunchFailed(e.to_string()));
            }
        };

        // Drain CDP events for the life of the session
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match Self::prepare_masked_page(&browser, &fingerprint).await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                let _ = browser.kill().await;
                remove_profile_dir(id, &user_data_dir);
                return Err(e);
            }
        };

        tracing::debug!(session = %id, user_agent = %fingerprint.user_agent, "session opened");

        Ok(Session {
            id,
            browser,
            page,
            fingerprint,
            auth_state: AuthState::Unauthenticated,
            created_at: Utc::now(),
            navigation_timeout: Duration::from_secs(self.settings.navigation_timeout_secs),
            element_timeout: Duration::from_secs(self.settings.element_timeout_secs),
            user_data_dir,
        })
    }

    /// Open a blank page with automation markers masked, ahead of any real
    /// navigation.
    async fn prepare_masked_page(
        browser: &Browser,
        fingerprint: &FingerprintConfig,
    ) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        page.execute(SetUserAgentOverrideParams {
            user_agent: fingerprint.user_agent.clone(),
            accept_language: Some(fingerprint.accept_language.clone()),
            platform: Some(fingerprint.platform.clone()),
            user_agent_metadata: None,
        })
        .await
        .map_err(|e| BrowserError::ChromiumError(format!("user agent override: {e}")))?;
        page.execute(SetTimezoneOverrideParams::new(fingerprint.timezone.clone()))
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("timezone override: {e}")))?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("stealth script: {e}")))?;
        Ok(page)
    }
}

/// One isolated browsing context backed by a single browser process.
///
/// Exclusively owned by its creator and destroyed after a single use;
/// [`Session::close`] must run on every exit path.
pub struct Session {
    id: Uuid,
    browser: Browser,
    page: Page,
    fingerprint: FingerprintConfig,
    auth_state: AuthState,
    created_at: DateTime<Utc>,
    navigation_timeout: Duration,
    element_timeout: Duration,
    user_data_dir: PathBuf,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    pub(crate) fn set_auth_state(&mut self, state: AuthState) {
        self.auth_state = state;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn fingerprint(&self) -> &FingerprintConfig {
        &self.fingerprint
    }

    /// How long element lookups wait before giving up.
    pub fn element_timeout(&self) -> Duration {
        self.element_timeout
    }

    /// Navigate and wait for the load to settle, bounded by the navigation timeout.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let nav = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.navigation_timeout, nav).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(format!("{url}: {e}"))),
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {}s",
                self.navigation_timeout.as_secs()
            ))),
        }
    }

    /// Poll until `selector` is present or `timeout` elapses.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::SelectorNotFound(format!(
                    "{selector} (waited {}s)",
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Poll until any of `selectors` is present, returning the one that matched.
    pub async fn first_present(&self, selectors: &[String], timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;
        loop {
            for selector in selectors {
                if self.page.find_element(selector.as_str()).await.is_ok() {
                    return Ok(selector.clone());
                }
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::SelectorNotFound(format!(
                    "none of [{}] appeared within {}s",
                    selectors.join(", "),
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Single presence check, no waiting.
    pub async fn is_present(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    /// Focus a field and type into it.
    pub async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("click {selector}: {e}")))?;
        element
            .type_str(text)
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("type into {selector}: {e}")))?;
        Ok(())
    }

    /// Press Enter on an element (submits its form).
    pub async fn press_enter(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .press_key("Enter")
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("press Enter on {selector}: {e}")))?;
        Ok(())
    }

    /// Full HTML of the current page.
    pub async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("page content: {e}")))
    }

    /// Current page URL, empty if the page has none yet.
    pub async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| BrowserError::ChromiumError(format!("page url: {e}")))
    }

    /// Scroll the viewport down by one window height.
    pub async fn scroll_by_viewport(&self) -> Result<()> {
        self.page
            .evaluate("window.scrollBy(0, window.innerHeight);")
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("scroll: {e}")))?;
        Ok(())
    }

    /// Current document scroll height, used to detect stalled lazy loading.
    pub async fn scroll_height(&self) -> Result<u64> {
        let height: f64 = self
            .page
            .evaluate("document.body.scrollHeight")
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("scroll height: {e}")))?
            .into_value()
            .map_err(|e| BrowserError::ChromiumError(format!("scroll height value: {e}")))?;
        Ok(height as u64)
    }

    /// Tear the session down, killing the browser if a graceful close stalls.
    pub async fn close(self) {
        let Session {
            id,
            mut browser,
            page,
            user_data_dir,
            ..
        } = self;

        if let Err(e) = page.close().await {
            tracing::debug!(session = %id, "page close failed: {e}");
        }
        if let Err(e) = browser.close().await {
            tracing::warn!(session = %id, "browser close failed: {e}");
        }
        if tokio::time::timeout(SHUTDOWN_GRACE, browser.wait())
            .await
            .is_err()
        {
            tracing::warn!(session = %id, "browser did not exit in time, killing");
            let _ = browser.kill().await;
        }
        remove_profile_dir(id, &user_data_dir);
        tracing::debug!(session = %id, "session closed");
    }
}

/// Remove a session's on-disk profile; a directory that is already gone is
/// not an error.
fn remove_profile_dir(id: Uuid, dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(session = %id, "user data dir cleanup failed: {e}");
        }
    }
}
