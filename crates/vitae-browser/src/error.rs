use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

/// Why a login attempt failed.
///
/// A rejected password and an intermediate verification screen are soft
/// failures the caller may want to handle differently from a hard timeout,
/// so they are separate variants rather than one opaque error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credentials rejected: {0}")]
    CredentialsRejected(String),

    #[error("verification challenge detected: {0}")]
    ChallengeDetected(String),

    #[error("login timed out: {0}")]
    Timeout(String),
}
