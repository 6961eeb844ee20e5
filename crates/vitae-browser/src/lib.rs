//! Headless browser sessions for vitae.
//!
//! Wraps `chromiumoxide` with session isolation (one browser process per
//! session, unique user data directory), fingerprint masking, and a login
//! driver that classifies how the target site responded to credentials.

pub mod auth;
pub mod error;
pub mod fingerprint;
pub mod session;

pub use auth::Authenticator;
pub use error::{AuthError, BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use session::{AuthState, Session, SessionFactory};
