//! Pattern heuristic for spotting resume-like links on a profile page.

use crate::report::ResumeSignals;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

static DOCUMENT_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(pdf|docx|doc)").expect("valid extension pattern"));

static RESUME_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)resume|cv").expect("valid keyword pattern"));

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// True if the text carries a document-extension or resume/CV signal.
pub fn matches_resume_signal(text: &str) -> bool {
    DOCUMENT_EXTENSION.is_match(text) || RESUME_KEYWORD.is_match(text)
}

/// Scan one profile page for resume-like links.
///
/// The raw HTML acts as a cheap gate: if neither pattern matches anywhere in
/// it, no anchor can match either, so anchor enumeration is skipped. Anchors
/// are retained when their href or visible text matches; anchors without an
/// href are never retained (there is no link to report). Retained hrefs are
/// deduplicated by exact value, first occurrence wins.
pub fn detect_resume_signals(html: &str) -> ResumeSignals {
    if !matches_resume_signal(html) {
        return ResumeSignals::none();
    }

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>();
        if (matches_resume_signal(href) || matches_resume_signal(&text))
            && seen.insert(href.to_string())
        {
            links.push(href.to_string());
        }
    }
    ResumeSignals::new(links)
}
