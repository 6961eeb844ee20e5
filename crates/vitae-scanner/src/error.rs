use thiserror::Error;
use vitae_browser::{AuthError, BrowserError};

/// Run-level failures: anything that aborts a search before the worker
/// pool produces outcomes.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The collection session could not be launched or driven.
    #[error("browser session failed: {0}")]
    Session(#[from] BrowserError),

    /// Login on the primary collection session failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The search input could not be located at all. Distinct from a
    /// search that simply returns zero results.
    #[error("search input not available: {0}")]
    SearchUiUnavailable(String),

    /// A configured selector does not parse as CSS.
    #[error("invalid selector '{selector}': {reason}")]
    SelectorInvalid {
        /// The selector as configured.
        selector: String,
        /// Why it failed to parse.
        reason: String,
    },
}

/// Per-profile failures, absorbed into that profile's outcome rather than
/// propagated. One broken check never aborts the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetectionError {
    /// The worker's own session could not be launched.
    #[error("session launch failed: {0}")]
    Session(String),

    /// The worker's own login failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Navigation to the profile failed or timed out.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The loaded page could not be read for evaluation.
    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    /// The worker task died without reporting an outcome.
    #[error("worker fault: {0}")]
    WorkerFault(String),
}

/// Convenience alias for run-level results.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::SearchUiUnavailable("no selector matched".to_string());
        assert!(err.to_string().contains("search input not available"));
    }

    #[test]
    fn test_detection_error_display() {
        let err = DetectionError::Navigation("timed out after 30s".to_string());
        assert!(err.to_string().contains("navigation failed"));
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_auth_error_converts_to_scan_error() {
        let auth = AuthError::CredentialsRejected("page matched '#error-for-password'".to_string());
        let err: ScanError = auth.into();
        assert!(matches!(err, ScanError::Auth(_)));
    }
}
