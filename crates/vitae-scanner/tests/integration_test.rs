use vitae_core::{AppConfig, Credentials, PacingConfig};
use vitae_scanner::{ScanError, SearchOrchestrator};

#[tokio::test]
#[ignore = "Requires Chrome browser - run with --ignored"]
async fn test_full_search_flow() {
    let config = AppConfig::load_with_env().expect("load config");
    let credentials = Credentials::from_env().expect("VITAE_EMAIL and VITAE_PASSWORD must be set");

    let orchestrator = SearchOrchestrator::new(config, credentials);
    let report = orchestrator
        .run_search("site reliability engineer", 3)
        .await
        .expect("search run");

    assert!(report.profiles_checked() <= 3);
    assert!(report.resumes_found() <= report.profiles_checked());
    for row in report.rows() {
        assert!(row.profile_url.starts_with("http"));
        assert_eq!(row.resume_found, !row.resume_links.is_empty());
    }

    println!(
        "Integration test completed - {} profiles checked, {} resumes found",
        report.profiles_checked(),
        report.resumes_found()
    );
}

#[tokio::test]
#[ignore = "Requires Chrome browser - run with --ignored"]
async fn test_rejected_login_fails_before_any_check() {
    let mut config = AppConfig::load_with_env().expect("load config");
    config.pacing = PacingConfig::zero();

    let credentials =
        Credentials::new("nobody@example.test", "definitely-wrong").expect("credentials");
    let orchestrator = SearchOrchestrator::new(config, credentials);

    let err = orchestrator
        .run_search("anyone", 1)
        .await
        .expect_err("bogus credentials must not produce a report");
    assert!(matches!(err, ScanError::Auth(_)));
}
