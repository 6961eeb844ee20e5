//! Vitae Scanner - resume-discovery orchestration.
//!
//! This crate implements the scanning pipeline: collecting candidate profile
//! references from search results, fanning detection out across a bounded
//! pool of isolated browser sessions, and aggregating per-profile outcomes
//! into an ordered report.
//!
//! # Features
//!
//! - Scroll-driven collection of unique profile references, bounded by a
//!   stall counter
//! - Pattern-based resume heuristic over page content and link elements
//! - Bounded worker pool with per-worker session isolation
//! - Failure isolation: one profile's failure becomes an error-flagged
//!   outcome, never a batch abort
//! - Deterministic output ordering regardless of completion order
//!
//! # Example
//!
//! ```rust,ignore
//! use vitae_core::{AppConfig, Credentials};
//! use vitae_scanner::SearchOrchestrator;
//!
//! let config = AppConfig::load_with_env()?;
//! let credentials = Credentials::from_env()?;
//!
//! let orchestrator = SearchOrchestrator::new(config, credentials);
//! let report = orchestrator.run_search("site reliability engineer", 20).await?;
//! println!("{} of {} profiles expose a resume",
//!     report.resumes_found(), report.profiles_checked());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod collector;
pub mod detector;
pub mod error;
pub mod heuristic;
pub mod orchestrator;
pub mod pool;
pub mod report;

// Re-export commonly used types
pub use collector::ProfileCollector;
pub use detector::ResumeDetector;
pub use error::{DetectionError, Result, ScanError};
pub use heuristic::{detect_resume_signals, matches_resume_signal};
pub use orchestrator::SearchOrchestrator;
pub use pool::WorkerPool;
pub use report::{DetectionOutcome, OutcomeRow, ResumeSignals, SearchReport};
