//! Search run orchestration.
//!
//! This module provides the `SearchOrchestrator`, which ties the pipeline
//! together for one query: a primary session collects profile references,
//! then the worker pool fans detection out across isolated sessions and the
//! outcomes are aggregated into a [`SearchReport`].

use crate::collector::ProfileCollector;
use crate::detector::ResumeDetector;
use crate::error::Result;
use crate::pool::WorkerPool;
use crate::report::SearchReport;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use vitae_browser::{Authenticator, Session, SessionFactory};
use vitae_core::{AppConfig, Credentials, ProfileUrl};

/// Runs the full search pipeline for one query at a time.
pub struct SearchOrchestrator {
    config: AppConfig,
    credentials: Credentials,
}

impl SearchOrchestrator {
    /// Create an orchestrator over a loaded configuration and credentials.
    #[must_use]
    pub fn new(config: AppConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Execute one search run.
    ///
    /// Collection failures (session launch, primary login, missing search UI)
    /// abort the run before any worker starts. Once collection has succeeded,
    /// the run always completes: per-profile failures are carried inside the
    /// report, never surfaced as a run failure. An empty collection yields a
    /// valid zero report.
    pub async fn run_search(&self, query: &str, max_profiles: usize) -> Result<SearchReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, query, max_profiles, "search run started");

        let factory = SessionFactory::new(self.config.browser.clone());
        let authenticator = Authenticator::new(self.config.auth.clone());

        let references = self
            .collect_references(&factory, &authenticator, query, max_profiles)
            .await?;
        tracing::info!(%run_id, collected = references.len(), "collection complete");

        if references.is_empty() {
            return Ok(SearchReport::new(
                run_id,
                query.to_string(),
                started_at,
                Vec::new(),
            ));
        }

        let detector = Arc::new(ResumeDetector::new(
            factory,
            authenticator,
            self.credentials.clone(),
            self.config.pacing,
        ));
        let pool = WorkerPool::new(self.config.workers.concurrency);
        let outcomes = pool
            .run_all(references, move |index, profile| {
                let detector = Arc::clone(&detector);
                async move { detector.check(index, profile).await }
            })
            .await;

        let report = SearchReport::new(run_id, query.to_string(), started_at, outcomes);
        tracing::info!(
            %run_id,
            checked = report.profiles_checked(),
            found = report.resumes_found(),
            "search run finished"
        );
        Ok(report)
    }

    /// Collect references on a dedicated session, closed on every path.
    async fn collect_references(
        &self,
        factory: &SessionFactory,
        authenticator: &Authenticator,
        query: &str,
        max_profiles: usize,
    ) -> Result<Vec<ProfileUrl>> {
        let mut session = factory.open_session().await?;
        let result = self
            .login_and_collect(&mut session, authenticator, query, max_profiles)
            .await;
        session.close().await;
        result
    }

    async fn login_and_collect(
        &self,
        session: &mut Session,
        authenticator: &Authenticator,
        query: &str,
        max_profiles: usize,
    ) -> Result<Vec<ProfileUrl>> {
        authenticator.login(session, &self.credentials).await?;
        let collector = ProfileCollector::new(
            self.config.search.clone(),
            self.config.pacing,
            self.config.auth.base_url.clone(),
        );
        collector.collect(session, query, max_profiles).await
    }
}
