use std::collections::BTreeSet;
use std::time::Duration;
use vitae_browser::{AuthState, SessionFactory};
use vitae_core::config::BrowserConfig as BrowserSettings;

fn test_settings() -> BrowserSettings {
    BrowserSettings {
        headless: true,
        ..BrowserSettings::default()
    }
}

fn leftover_profile_dirs() -> BTreeSet<String> {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .filter(|name| name.starts_with("vitae-session-"))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_failed_launch_leaves_no_profile_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let fake_chrome = tmp.path().join("not-chrome");
    // Exists but is not executable, so the launch fails after the profile
    // directory has been created
    std::fs::write(&fake_chrome, "definitely not a browser").unwrap();

    let settings = BrowserSettings {
        chrome_executable: Some(fake_chrome),
        ..test_settings()
    };

    let before = leftover_profile_dirs();
    let result = SessionFactory::new(settings).open_session().await;

    assert!(result.is_err());
    assert_eq!(leftover_profile_dirs(), before);
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_open_and_close_session() {
    let factory = SessionFactory::new(test_settings());
    let session = factory.open_session().await.unwrap();
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    session.close().await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigate_and_read_content() {
    let factory = SessionFactory::new(test_settings());
    let session = factory.open_session().await.unwrap();
    session.navigate("https://example.com").await.unwrap();
    let html = session.content().await.unwrap();
    assert!(html.contains("Example Domain"));
    session.close().await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_wait_for_missing_selector_times_out() {
    let factory = SessionFactory::new(test_settings());
    let session = factory.open_session().await.unwrap();
    session.navigate("https://example.com").await.unwrap();
    let result = session
        .wait_for_selector("#does-not-exist", Duration::from_secs(1))
        .await;
    assert!(result.is_err());
    session.close().await;
}
