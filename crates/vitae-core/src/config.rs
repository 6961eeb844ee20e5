//! Configuration management for Vitae.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Credentials are deliberately not part of
//! this file-backed config; see [`crate::types::Credentials`].

use crate::error::{ConfigError, ConfigResult};
use crate::pacing::PacingConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable pointing at an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "VITAE_CONFIG";

/// Main application configuration.
///
/// Loaded from `~/.config/vitae/config.toml` (or platform equivalent), or the
/// path named by `VITAE_CONFIG`. If no file exists, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Login flow settings for the target site
    pub auth: AuthConfig,
    /// Search and collection settings
    pub search: SearchConfig,
    /// Worker pool settings
    pub workers: WorkerConfig,
    /// Randomized pacing between browser actions
    pub pacing: PacingConfig,
    /// Export sink settings
    pub export: ExportConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `VITAE_HEADLESS`: browser headless mode (`1`/`true`/`yes` or off)
    /// - `VITAE_CHROME_BIN`: path to a Chrome/Chromium binary
    /// - `VITAE_CONCURRENCY`: worker pool size
    /// - `VITAE_MAX_PROFILES`: default profile cap per search
    /// - `VITAE_OUTPUT_DIR`: CSV output directory
    /// - `VITAE_BASE_URL`: target site base URL
    /// - `VITAE_HOST` / `VITAE_PORT`: server bind address
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply the documented environment overrides to an already-loaded config.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VITAE_HEADLESS") {
            let headless = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
            self.browser.headless = headless;
            tracing::debug!("Override browser.headless from env: {}", headless);
        }

        if let Ok(val) = std::env::var("VITAE_CHROME_BIN") {
            if !val.trim().is_empty() {
                tracing::debug!("Override browser.chrome_executable from env: {}", val);
                self.browser.chrome_executable = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("VITAE_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.workers.concurrency = concurrency;
                tracing::debug!("Override workers.concurrency from env: {}", concurrency);
            }
        }

        if let Ok(val) = std::env::var("VITAE_MAX_PROFILES") {
            if let Ok(max) = val.parse() {
                self.search.max_profiles_default = max;
                tracing::debug!("Override search.max_profiles_default from env: {}", max);
            }
        }

        if let Ok(val) = std::env::var("VITAE_OUTPUT_DIR") {
            if !val.trim().is_empty() {
                tracing::debug!("Override export.output_dir from env: {}", val);
                self.export.output_dir = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("VITAE_BASE_URL") {
            if !val.trim().is_empty() {
                tracing::debug!("Override auth.base_url from env: {}", val);
                self.auth.base_url = val;
            }
        }

        if let Ok(val) = std::env::var("VITAE_HOST") {
            if !val.trim().is_empty() {
                self.server.host = val;
            }
        }

        if let Ok(val) = std::env::var("VITAE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// `VITAE_CONFIG` takes precedence; otherwise XDG base directories are
    /// used: `~/.config/vitae/config.toml`.
    pub fn config_path() -> ConfigResult<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let dirs = ProjectDirs::from("com", "vitae", "vitae").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Explicit Chrome/Chromium binary path (autodetected when unset)
    pub chrome_executable: Option<PathBuf>,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Element wait timeout in seconds (selector polling)
    pub element_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            navigation_timeout_secs: 30,
            element_timeout_secs: 15,
        }
    }
}

/// Login flow settings for the target site.
///
/// Selector lists are ordered: each is tried in turn before the step is
/// declared failed. Which DOM state means "challenge" or "bad credentials" is
/// site-dependent and deliberately kept out of code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Site root, e.g. `https://www.linkedin.com`
    pub base_url: String,
    /// Path of the login form relative to `base_url`
    pub login_path: String,
    /// Selector for the username/email field
    pub username_selector: String,
    /// Selector for the password field
    pub password_selector: String,
    /// Selectors whose presence confirms a completed login
    pub post_login_selectors: Vec<String>,
    /// URL substrings that indicate a verification challenge
    pub challenge_markers: Vec<String>,
    /// Selectors whose presence indicates rejected credentials
    pub login_error_selectors: Vec<String>,
    /// Overall login timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com".to_string(),
            login_path: "/login".to_string(),
            username_selector: "#username".to_string(),
            password_selector: "#password".to_string(),
            post_login_selectors: vec![
                "input[placeholder='Search']".to_string(),
                "img.global-nav__me-photo, button[aria-label*='Me']".to_string(),
            ],
            challenge_markers: vec!["/checkpoint/".to_string(), "/challenge".to_string()],
            login_error_selectors: vec![
                "#error-for-username".to_string(),
                "#error-for-password".to_string(),
            ],
            timeout_secs: 20,
        }
    }
}

impl AuthConfig {
    /// Absolute URL of the login form.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.login_path
        )
    }
}

/// Search and collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search input selectors, tried in order
    pub input_selectors: Vec<String>,
    /// Selector of the results list container
    pub results_selector: String,
    /// Substring a profile href must contain; items without a matching anchor
    /// fall back to their first anchor
    pub profile_link_pattern: String,
    /// Default profile cap when a request omits `max_profiles`
    pub max_profiles_default: u32,
    /// Consecutive no-growth scroll attempts before collection stops
    pub max_scroll_stalls: u32,
    /// Wait for the search UI and results list, in seconds
    pub wait_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            input_selectors: vec![
                "input.search-global-typeahead__input".to_string(),
                "input[placeholder='Search']".to_string(),
            ],
            results_selector: "ul[role='list']".to_string(),
            profile_link_pattern: "/in/".to_string(),
            max_profiles_default: 20,
            max_scroll_stalls: 30,
            wait_timeout_secs: 15,
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of detection workers (each owns one browser process)
    pub concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { concurrency: 6 }
    }
}

/// Export sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory CSV files are written to (created on demand)
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
