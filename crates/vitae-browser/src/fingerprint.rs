use rand::Rng;

/// Script installed on every new document to mask automation markers.
pub const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined, configurable: true });
delete navigator.__proto__.webdriver;
if (!window.chrome) { window.chrome = { runtime: {} }; }
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'], configurable: true });
delete window.domAutomation;
delete window.domAutomationController;
"#;

/// A browser identity whose parts agree with each other.
///
/// The user agent, platform string and viewport are drawn as one unit; a
/// macOS user agent paired with a 1366x768 laptop viewport is exactly the
/// kind of contradiction bot checks look for.
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub platform: String,
    pub accept_language: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub timezone: String,
}

struct DeviceProfile {
    user_agent: &'static str,
    platform: &'static str,
    viewports: &'static [(u32, u32)],
}

const DESKTOP_PROFILES: &[DeviceProfile] = &[
    DeviceProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        platform: "Win32",
        viewports: &[(1920, 1080), (1536, 864), (1366, 768)],
    },
    DeviceProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        platform: "MacIntel",
        viewports: &[(1440, 900), (1680, 1050), (2560, 1440)],
    },
    DeviceProfile {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        platform: "Linux x86_64",
        viewports: &[(1920, 1080), (2560, 1440)],
    },
];

const TIMEZONES: &[&str] = &["America/New_York", "America/Chicago", "America/Los_Angeles"];

impl FingerprintConfig {
    /// Draw a randomized identity from the device profile table.
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();

        let profile = &DESKTOP_PROFILES[rng.gen_range(0..DESKTOP_PROFILES.len())];
        let (width, height) = profile.viewports[rng.gen_range(0..profile.viewports.len())];
        let timezone = TIMEZONES[rng.gen_range(0..TIMEZONES.len())];

        Self {
            user_agent: profile.user_agent.to_string(),
            platform: profile.platform.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            viewport_width: width,
            viewport_height: height,
            timezone: timezone.to_string(),
        }
    }
}
