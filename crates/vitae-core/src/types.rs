//! Shared types used across the Vitae pipeline.
//!
//! This module defines the domain newtypes that flow between the collector,
//! the worker pool and the export sink.

use crate::error::{ConfigError, ConfigResult, CoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable holding the account email.
pub const EMAIL_ENV: &str = "VITAE_EMAIL";
/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "VITAE_PASSWORD";

/// Canonical URL of a candidate profile.
///
/// Collection deduplicates by this canonical form: scheme and host are
/// lowercased by the parser, the query string and fragment are dropped, and
/// any trailing slash is trimmed. Two references to the same profile reached
/// through different tracking parameters therefore compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileUrl(String);

impl ProfileUrl {
    /// Create a `ProfileUrl` from a raw href, canonicalizing it.
    ///
    /// # Errors
    /// Returns error if the value is not an absolute http(s) URL with a host.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = raw.as_ref();
        let mut parsed = Url::parse(raw)
            .map_err(|e| CoreError::Validation(format!("invalid profile URL '{raw}': {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::Validation(format!(
                "invalid profile URL '{raw}': scheme must be http or https"
            )));
        }
        if parsed.host_str().is_none() {
            return Err(CoreError::Validation(format!(
                "invalid profile URL '{raw}': missing host"
            )));
        }

        parsed.set_query(None);
        parsed.set_fragment(None);

        let canonical = parsed.to_string();
        let canonical = canonical.trim_end_matches('/').to_string();
        Ok(Self(canonical))
    }

    /// Get the canonical string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account credentials for the target site.
///
/// The password is wiped from memory on drop and never appears in `Debug`
/// output or serialized config. Credentials are read from the environment
/// only, never from the config file.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials from explicit values.
    ///
    /// # Errors
    /// Returns error if either value is empty.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, CoreError> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() {
            return Err(CoreError::Validation("email must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(CoreError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        Ok(Self { email, password })
    }

    /// Read credentials from `VITAE_EMAIL` and `VITAE_PASSWORD`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] naming the first variable that is
    /// unset or empty.
    pub fn from_env() -> ConfigResult<Self> {
        let email = read_env(EMAIL_ENV)?;
        let password = read_env(PASSWORD_ENV)?;
        Ok(Self { email, password })
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_env(var: &str) -> ConfigResult<String> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(ConfigError::MissingEnv {
            var: var.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_canonicalizes_query_and_fragment() {
        let url = ProfileUrl::new("https://example.com/in/jane-doe?miniProfile=abc#top")
            .expect("valid URL");
        assert_eq!(url.as_str(), "https://example.com/in/jane-doe");
    }

    #[test]
    fn test_profile_url_trims_trailing_slash() {
        let url = ProfileUrl::new("https://example.com/in/jane-doe/").expect("valid URL");
        assert_eq!(url.as_str(), "https://example.com/in/jane-doe");
    }

    #[test]
    fn test_profile_url_lowercases_host() {
        let url = ProfileUrl::new("HTTPS://Example.COM/in/Jane").expect("valid URL");
        assert_eq!(url.as_str(), "https://example.com/in/Jane");
    }

    #[test]
    fn test_profile_url_dedup_equality() {
        let a = ProfileUrl::new("https://example.com/in/jane?ref=search").expect("valid URL");
        let b = ProfileUrl::new("https://example.com/in/jane/").expect("valid URL");
        assert_eq!(a, b);
    }

    #[test]
    fn test_profile_url_invalid() {
        let invalid = vec!["", "not-a-url", "ftp://example.com/file", "/in/jane-doe"];
        for raw in invalid {
            assert!(ProfileUrl::new(raw).is_err(), "should fail for: {raw}");
        }
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("jane@example.com", "hunter2").expect("valid credentials");
        let debug = format!("{creds:?}");
        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_credentials_empty_rejected() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("jane@example.com", "").is_err());
    }

    #[test]
    fn test_credentials_from_env_missing() {
        std::env::remove_var(EMAIL_ENV);
        std::env::remove_var(PASSWORD_ENV);
        let err = Credentials::from_env().expect_err("missing env should fail");
        assert!(matches!(err, ConfigError::MissingEnv { .. }));
    }
}
