//! Outcome and report types.
//!
//! A [`DetectionOutcome`] is the per-profile unit of result: either the
//! signals the resume heuristic extracted, or the error that stopped the
//! check. The two are mutually exclusive by construction. A [`SearchReport`]
//! aggregates the ordered outcome list for one run.

use crate::error::DetectionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitae_core::ProfileUrl;

/// What the resume heuristic extracted from one profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSignals {
    links: Vec<String>,
}

impl ResumeSignals {
    /// Wrap a deduplicated, first-seen-ordered link set.
    #[must_use]
    pub fn new(links: Vec<String>) -> Self {
        Self { links }
    }

    /// No signals at all.
    #[must_use]
    pub fn none() -> Self {
        Self { links: Vec::new() }
    }

    /// A resume is considered found iff at least one link was retained.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.links.is_empty()
    }

    /// The retained links, in the order they first appeared on the page.
    #[must_use]
    pub fn links(&self) -> &[String] {
        &self.links
    }
}

/// The result of checking one profile.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    profile: ProfileUrl,
    result: std::result::Result<ResumeSignals, DetectionError>,
}

impl DetectionOutcome {
    /// A completed check (whether or not anything was found).
    #[must_use]
    pub fn detected(profile: ProfileUrl, signals: ResumeSignals) -> Self {
        Self {
            profile,
            result: Ok(signals),
        }
    }

    /// A check that could not be completed.
    #[must_use]
    pub fn failed(profile: ProfileUrl, error: DetectionError) -> Self {
        Self {
            profile,
            result: Err(error),
        }
    }

    /// The profile this outcome belongs to.
    #[must_use]
    pub fn profile(&self) -> &ProfileUrl {
        &self.profile
    }

    /// Whether a resume was found. Always `false` for failed checks.
    #[must_use]
    pub fn found(&self) -> bool {
        matches!(&self.result, Ok(signals) if signals.found())
    }

    /// The retained resume links. Empty for failed checks.
    #[must_use]
    pub fn links(&self) -> &[String] {
        match &self.result {
            Ok(signals) => signals.links(),
            Err(_) => &[],
        }
    }

    /// The error that stopped the check, if it did not complete.
    #[must_use]
    pub fn error(&self) -> Option<&DetectionError> {
        self.result.as_ref().err()
    }

    /// Flatten into the serializable export/response row shape.
    #[must_use]
    pub fn to_row(&self) -> OutcomeRow {
        OutcomeRow {
            profile_url: self.profile.as_str().to_string(),
            resume_found: self.found(),
            resume_links: self.links().to_vec(),
            error: self.error().map(ToString::to_string),
        }
    }
}

/// One flat row of the final result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow {
    /// Canonical profile URL.
    pub profile_url: String,
    /// Whether the heuristic retained at least one link.
    pub resume_found: bool,
    /// The retained links.
    pub resume_links: Vec<String>,
    /// Error display string for checks that did not complete.
    pub error: Option<String>,
}

/// Aggregated result of one search run.
///
/// Outcomes are held in collection order; the summary counts are pure
/// functions of the list.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Correlation id for the run, carried through logs.
    pub run_id: Uuid,
    /// The query that was searched.
    pub query: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When aggregation completed.
    pub finished_at: DateTime<Utc>,
    /// Per-profile outcomes, in collection order.
    pub outcomes: Vec<DetectionOutcome>,
}

impl SearchReport {
    /// Assemble a report, stamping the finish time.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        query: String,
        started_at: DateTime<Utc>,
        outcomes: Vec<DetectionOutcome>,
    ) -> Self {
        Self {
            run_id,
            query,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        }
    }

    /// Number of profiles that were checked (including failed checks).
    #[must_use]
    pub fn profiles_checked(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of profiles where a resume was found.
    #[must_use]
    pub fn resumes_found(&self) -> usize {
        self.outcomes.iter().filter(|o| o.found()).count()
    }

    /// The flat row set, in collection order.
    #[must_use]
    pub fn rows(&self) -> Vec<OutcomeRow> {
        self.outcomes.iter().map(DetectionOutcome::to_row).collect()
    }
}
