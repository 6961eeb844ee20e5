//! Scroll-driven collection of profile references from search results.

use crate::error::{Result, ScanError};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use vitae_browser::Session;
use vitae_core::config::SearchConfig;
use vitae_core::{PacingConfig, ProfileUrl};

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Collects unique profile references from search results.
///
/// Drives one authenticated session: submits the query through the site's
/// search input, then alternates between harvesting profile links from the
/// rendered results and scrolling to force more content to load.
pub struct ProfileCollector {
    config: SearchConfig,
    pacing: PacingConfig,
    base_url: String,
}

impl ProfileCollector {
    /// Create a collector over the given settings.
    #[must_use]
    pub fn new(config: SearchConfig, pacing: PacingConfig, base_url: String) -> Self {
        Self {
            config,
            pacing,
            base_url,
        }
    }

    /// Collect up to `max_count` unique profile references.
    ///
    /// The session must already be authenticated; the search input is located
    /// on whatever page the session currently shows. Returns fewer than
    /// `max_count` references when the results are exhausted, which is not an
    /// error. Fails with [`ScanError::SearchUiUnavailable`] only when none of
    /// the configured search-input selectors can be found.
    pub async fn collect(
        &self,
        session: &Session,
        query: &str,
        max_count: usize,
    ) -> Result<Vec<ProfileUrl>> {
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let wait = Duration::from_secs(self.config.wait_timeout_secs);
        let input = session
            .first_present(&self.config.input_selectors, wait)
            .await
            .map_err(|e| ScanError::SearchUiUnavailable(e.to_string()))?;

        session.type_into(&input, query).await?;
        session.press_enter(&input).await?;

        // Zero results is tolerated; only the missing input is fatal
        if let Err(e) = session
            .wait_for_selector(&self.config.results_selector, wait)
            .await
        {
            tracing::warn!("results list did not appear: {e}");
        }

        let mut collected: Vec<ProfileUrl> = Vec::new();
        let mut seen: HashSet<ProfileUrl> = HashSet::new();
        let mut stalls: u32 = 0;
        let mut last_height = session.scroll_height().await?;

        loop {
            let html = session.content().await?;
            absorb_profile_links(
                &html,
                &self.config,
                &self.base_url,
                &mut seen,
                &mut collected,
                max_count,
            )?;
            if collected.len() >= max_count {
                break;
            }

            session.scroll_by_viewport().await?;
            tokio::time::sleep(self.pacing.scroll.sample()).await;

            let height = session.scroll_height().await?;
            if height > last_height {
                stalls = 0;
                last_height = height;
            } else {
                stalls += 1;
                if stalls >= self.config.max_scroll_stalls {
                    tracing::debug!(
                        collected = collected.len(),
                        "scroll height stopped growing, stopping collection"
                    );
                    break;
                }
            }
        }

        tracing::info!(query, collected = collected.len(), "collection finished");
        Ok(collected)
    }
}

/// Fold one page snapshot into the collected set.
///
/// New references are appended in first-seen order; references already seen
/// (by canonical URL, so tracking-parameter variants collapse) are skipped,
/// and nothing is appended past `max_count`.
fn absorb_profile_links(
    html: &str,
    config: &SearchConfig,
    base_url: &str,
    seen: &mut HashSet<ProfileUrl>,
    collected: &mut Vec<ProfileUrl>,
    max_count: usize,
) -> Result<()> {
    for href in extract_profile_links(html, config, base_url)? {
        if collected.len() >= max_count {
            break;
        }
        let url = match ProfileUrl::new(&href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("skipping unparseable link {href}: {e}");
                continue;
            }
        };
        if seen.insert(url.clone()) {
            collected.push(url);
        }
    }
    Ok(())
}

/// Pull candidate profile hrefs out of rendered search results.
///
/// Result items are the direct `li` children of the configured results list;
/// `li` elements of sub-lists nested inside a card (insight chips, shared
/// connections) are part of their card, not items of their own. Within each
/// item the first anchor whose href matches the configured profile-link
/// pattern wins; items without such an anchor fall back to their first anchor
/// with any href. Relative hrefs are resolved against the base URL.
/// Deduplication happens later, at canonical-URL level.
fn extract_profile_links(
    html: &str,
    config: &SearchConfig,
    base_url: &str,
) -> Result<Vec<String>> {
    let items = Selector::parse(&format!("{} > li", config.results_selector)).map_err(|e| {
        ScanError::SelectorInvalid {
            selector: config.results_selector.clone(),
            reason: e.to_string(),
        }
    })?;

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for item in document.select(&items) {
        let preferred = item.select(&ANCHOR).find(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.contains(&config.profile_link_pattern))
        });
        let anchor = preferred.or_else(|| item.select(&ANCHOR).next());
        if let Some(href) = anchor.and_then(|a| a.value().attr("href")) {
            links.push(absolutize(base_url, href));
        }
    }
    Ok(links)
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}
