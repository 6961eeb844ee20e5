//! Pipeline behavior from pool dispatch through report aggregation, driven by
//! stub checks so no browser is needed.

use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use vitae_core::ProfileUrl;
use vitae_scanner::{
    detect_resume_signals, DetectionError, DetectionOutcome, SearchReport, WorkerPool,
};

fn references(n: usize) -> Vec<ProfileUrl> {
    (0..n)
        .map(|i| ProfileUrl::new(format!("https://net.test/in/candidate-{i}")).unwrap())
        .collect()
}

/// Three profiles, all checks succeed, two pages expose a `.pdf` link.
#[tokio::test]
async fn test_three_profiles_two_with_resumes() {
    const PAGES: [&str; 3] = [
        r#"<html><body><a href="https://files.test/jane-resume.pdf">Resume</a></body></html>"#,
        r#"<html><body><p>Just a profile, nothing attached.</p></body></html>"#,
        r#"<html><body><a href="https://drive.test/cv-2024.pdf">CV 2024</a></body></html>"#,
    ];

    let input = references(3);
    let outcomes = WorkerPool::new(6)
        .run_all(input.clone(), |index, profile| async move {
            DetectionOutcome::detected(profile, detect_resume_signals(PAGES[index]))
        })
        .await;

    let report = SearchReport::new(Uuid::new_v4(), "data engineer".to_string(), Utc::now(), outcomes);

    assert_eq!(report.profiles_checked(), 3);
    assert_eq!(report.resumes_found(), 2);

    let rows = report.rows();
    assert!(rows[0].resume_found);
    assert_eq!(rows[0].resume_links, ["https://files.test/jane-resume.pdf"]);
    assert!(!rows[1].resume_found);
    assert!(rows[1].resume_links.is_empty());
    assert!(rows[2].resume_found);
    assert!(rows.iter().all(|r| r.error.is_none()));
}

/// One of five checks times out; the other four still complete and the failed
/// one is carried as an error-flagged outcome in its original position.
#[tokio::test]
async fn test_one_timeout_among_five() {
    let input = references(5);
    let outcomes = WorkerPool::new(6)
        .run_all(input.clone(), |index, profile| async move {
            if index == 3 {
                DetectionOutcome::failed(
                    profile,
                    DetectionError::Navigation("navigation to profile exceeded 30s".to_string()),
                )
            } else {
                DetectionOutcome::detected(
                    profile,
                    detect_resume_signals(r#"<a href="/files/resume.docx">resume</a>"#),
                )
            }
        })
        .await;

    let report = SearchReport::new(Uuid::new_v4(), "designer".to_string(), Utc::now(), outcomes);

    assert_eq!(report.profiles_checked(), 5);
    assert_eq!(report.resumes_found(), 4);

    let rows = report.rows();
    assert_eq!(rows.iter().filter(|r| r.error.is_some()).count(), 1);
    assert_eq!(rows[3].profile_url, input[3].as_str());
    assert!(!rows[3].resume_found);
    assert!(rows[3].resume_links.is_empty());
    assert!(rows[3].error.as_deref().unwrap().contains("navigation failed"));
}

/// An empty collection produces a zero report and never invokes a check.
#[tokio::test]
async fn test_empty_collection_launches_no_workers() {
    let invocations = Arc::new(AtomicUsize::new(0));

    let probe = Arc::clone(&invocations);
    let outcomes = WorkerPool::new(6)
        .run_all(Vec::new(), move |_, profile| {
            let probe = Arc::clone(&probe);
            async move {
                probe.fetch_add(1, Ordering::SeqCst);
                DetectionOutcome::failed(profile, DetectionError::WorkerFault("unreachable".into()))
            }
        })
        .await;

    let report = SearchReport::new(Uuid::new_v4(), "nobody".to_string(), Utc::now(), outcomes);

    assert_eq!(report.profiles_checked(), 0);
    assert_eq!(report.resumes_found(), 0);
    assert!(report.rows().is_empty());
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

/// The same input through pool sizes 1 and 6 yields order-identical rows.
#[tokio::test]
async fn test_serial_and_parallel_reports_are_identical() {
    const PAGES: [&str; 6] = [
        r#"<a href="/cv.pdf">cv</a>"#,
        r#"<p>none</p>"#,
        r#"<a href="/resume.doc">resume</a>"#,
        r#"<p>none</p>"#,
        r#"<a href="/portfolio">My CV</a>"#,
        r#"<p>none</p>"#,
    ];

    let input = references(6);
    let run = |concurrency: usize| {
        let input = input.clone();
        async move {
            let outcomes = WorkerPool::new(concurrency)
                .run_all(input, |index, profile| async move {
                    // Uneven delays shuffle completion order in the parallel run
                    tokio::time::sleep(std::time::Duration::from_millis(
                        ((index * 7) % 4) as u64 * 10,
                    ))
                    .await;
                    DetectionOutcome::detected(profile, detect_resume_signals(PAGES[index]))
                })
                .await;
            SearchReport::new(Uuid::new_v4(), "q".to_string(), Utc::now(), outcomes).rows()
        }
    };

    let serial = run(1).await;
    let parallel = run(6).await;
    assert_eq!(serial, parallel);
}
