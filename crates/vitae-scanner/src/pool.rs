//! Bounded worker pool for profile checks.
//!
//! Workers claim references from a shared backlog and process them until it
//! is exhausted, so exactly `concurrency` checks run at once no matter how
//! many references were collected. Output order always matches input order:
//! outcomes are re-sequenced by original index, never by completion time.

use crate::error::DetectionError;
use crate::report::DetectionOutcome;
use futures::{future, FutureExt};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vitae_core::ProfileUrl;

/// Runs a per-reference check over a backlog with bounded concurrency.
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// Create a pool. A concurrency of zero is treated as one.
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Run `check` over every reference, returning outcomes in input order.
    ///
    /// Spawns `min(concurrency, references.len())` tasks; each claims the
    /// next unclaimed index from the backlog, runs the check, and accumulates
    /// its outcomes locally until the backlog is empty. A check that panics
    /// costs only its own reference: the worker keeps the outcomes it already
    /// finished, stops claiming, and the faulting slot (plus anything no
    /// surviving worker picks up) is backfilled with a worker-fault outcome.
    pub async fn run_all<F, Fut>(
        &self,
        references: Vec<ProfileUrl>,
        check: F,
    ) -> Vec<DetectionOutcome>
    where
        F: Fn(usize, ProfileUrl) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DetectionOutcome> + Send + 'static,
    {
        if references.is_empty() {
            return Vec::new();
        }

        let total = references.len();
        let workers = self.concurrency.min(total);
        let backlog: Arc<Vec<ProfileUrl>> = Arc::new(references);
        let cursor = Arc::new(AtomicUsize::new(0));
        let check = Arc::new(check);

        tracing::debug!(total, workers, "dispatching profile checks");

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let backlog = Arc::clone(&backlog);
            let cursor = Arc::clone(&cursor);
            let check = Arc::clone(&check);
            handles.push(tokio::spawn(async move {
                let mut completed = Vec::new();
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    if index >= backlog.len() {
                        break;
                    }
                    // Unwinds stop at the claimed index so the outcomes this
                    // worker already holds still make it back to the pool.
                    match AssertUnwindSafe((*check)(index, backlog[index].clone()))
                        .catch_unwind()
                        .await
                    {
                        Ok(outcome) => completed.push((index, outcome)),
                        Err(_) => {
                            tracing::error!(worker, index, "check panicked, worker retiring");
                            break;
                        }
                    }
                }
                tracing::debug!(worker, items = completed.len(), "worker drained backlog");
                completed
            }));
        }

        let mut slots: Vec<Option<DetectionOutcome>> = vec![None; total];
        for joined in future::join_all(handles).await {
            match joined {
                Ok(completed) => {
                    for (index, outcome) in completed {
                        slots[index] = Some(outcome);
                    }
                }
                Err(e) => {
                    tracing::error!("detection worker task died: {e}");
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    DetectionOutcome::failed(
                        backlog[index].clone(),
                        DetectionError::WorkerFault(
                            "worker terminated before reporting an outcome".to_string(),
                        ),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ResumeSignals;
    use std::time::Duration;

    fn references(n: usize) -> Vec<ProfileUrl> {
        (0..n)
            .map(|i| ProfileUrl::new(format!("https://net.test/in/profile-{i}")).unwrap())
            .collect()
    }

    fn outcome_for(index: usize, profile: ProfileUrl) -> DetectionOutcome {
        DetectionOutcome::detected(
            profile,
            ResumeSignals::new(vec![format!("https://files.test/{index}.pdf")]),
        )
    }

    #[tokio::test]
    async fn test_output_order_matches_input_despite_completion_order() {
        let input = references(6);
        let pool = WorkerPool::new(6);
        // Later indexes finish first, so completion order is reversed
        let outcomes = pool
            .run_all(input.clone(), |index, profile| async move {
                tokio::time::sleep(Duration::from_millis(60 - 10 * index as u64)).await;
                outcome_for(index, profile)
            })
            .await;

        assert_eq!(outcomes.len(), input.len());
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.profile(), &input[i]);
            assert_eq!(outcome.links(), [format!("https://files.test/{i}.pdf")]);
        }
    }

    #[tokio::test]
    async fn test_pool_sizes_one_and_six_agree() {
        let input = references(6);
        let run = |concurrency: usize| {
            let input = input.clone();
            async move {
                WorkerPool::new(concurrency)
                    .run_all(input, |index, profile| async move {
                        tokio::time::sleep(Duration::from_millis((index % 3) as u64 * 5)).await;
                        outcome_for(index, profile)
                    })
                    .await
            }
        };

        let serial = run(1).await;
        let parallel = run(6).await;

        assert_eq!(serial.len(), parallel.len());
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert_eq!(a.profile(), b.profile());
            assert_eq!(a.links(), b.links());
        }
    }

    #[tokio::test]
    async fn test_empty_backlog_yields_empty_output() {
        let pool = WorkerPool::new(6);
        let outcomes = pool
            .run_all(Vec::new(), |index, profile| async move {
                outcome_for(index, profile)
            })
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(2);

        let active_probe = Arc::clone(&active);
        let peak_probe = Arc::clone(&peak);
        let outcomes = pool
            .run_all(references(8), move |index, profile| {
                let active = Arc::clone(&active_probe);
                let peak = Arc::clone(&peak_probe);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    outcome_for(index, profile)
                }
            })
            .await;

        assert_eq!(outcomes.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_panicking_worker_backfills_remaining_slots() {
        let input = references(5);
        // Single worker: it completes 0 and 1, dies on 2, and nothing is
        // left alive to claim 3 and 4.
        let pool = WorkerPool::new(1);
        let outcomes = pool
            .run_all(input.clone(), |index, profile| async move {
                assert!(index != 2, "boom");
                outcome_for(index, profile)
            })
            .await;

        assert_eq!(outcomes.len(), 5);
        assert!(outcomes[0].error().is_none());
        assert!(outcomes[1].error().is_none());
        for (i, outcome) in outcomes.iter().enumerate().skip(2) {
            assert_eq!(outcome.profile(), &input[i]);
            assert!(matches!(
                outcome.error(),
                Some(DetectionError::WorkerFault(_))
            ));
            assert!(!outcome.found());
        }
    }

    #[tokio::test]
    async fn test_panic_costs_only_the_faulting_reference() {
        let input = references(6);
        // Two workers: whichever claims index 1 dies there, the survivor
        // drains the rest of the backlog.
        let pool = WorkerPool::new(2);
        let outcomes = pool
            .run_all(input.clone(), |index, profile| async move {
                assert!(index != 1, "boom");
                outcome_for(index, profile)
            })
            .await;

        assert_eq!(outcomes.len(), 6);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.profile(), &input[i]);
            if i == 1 {
                assert!(matches!(
                    outcome.error(),
                    Some(DetectionError::WorkerFault(_))
                ));
            } else {
                assert!(outcome.error().is_none(), "index {i} should be clean");
            }
        }
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped_to_one() {
        let outcomes = WorkerPool::new(0)
            .run_all(references(3), |index, profile| async move {
                outcome_for(index, profile)
            })
            .await;
        assert_eq!(outcomes.len(), 3);
    }
}
