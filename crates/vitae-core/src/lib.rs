//! Vitae Core - Foundation crate for the Vitae resume-discovery pipeline.
//!
//! This crate provides the shared types, error handling, configuration
//! management and pacing policy that the browser, scanner and export crates
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Core error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`ProfileUrl`, `Credentials`)
//! - [`pacing`] - Randomized delay policy for anti-detection pacing
//!
//! # Example
//!
//! ```rust
//! use vitae_core::{AppConfig, ProfileUrl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//!
//! // Collection dedupes by canonical URL
//! let url = ProfileUrl::new("https://example.com/in/jane-doe?ref=search")?;
//! assert_eq!(url.as_str(), "https://example.com/in/jane-doe");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod pacing;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, AuthConfig, BrowserConfig, ExportConfig, SearchConfig, ServerConfig, WorkerConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use pacing::{DelayRange, PacingConfig};
pub use types::{Credentials, ProfileUrl};
