use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::extractors::youtube::watch_url;
use crate::fetch::PageFetcher;
use crate::transcribe::Transcript;

pub const DEFAULT_TITLE: &str = "YouTube Video";
const SITE_SUFFIX: &str = " - YouTube";

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
    })
}

/// Pull the page title, without the site-name suffix
pub fn extract_title(page: &str) -> Option<String> {
    let raw = title_pattern().captures(page)?.get(1)?.as_str();
    let decoded = html_escape::decode_html_entities(raw);
    let title = decoded.trim();
    let title = title.strip_suffix(SITE_SUFFIX).unwrap_or(title).trim();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Human readable notice used as the single fallback segment
pub fn fallback_notice(title: &str) -> String {
    format!(
        "Captions are not available for \"{}\". This video has no public caption track, so only limited information can be shown.",
        title
    )
}

/// Builds a degraded transcript when no caption track could be retrieved
pub struct FallbackResolver {
    fetcher: Arc<dyn PageFetcher>,
}

impl FallbackResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Page title of the video, or [`DEFAULT_TITLE`] when it cannot be resolved
    pub async fn title(&self, video_id: &str) -> String {
        match self.fetcher.fetch_text(&watch_url(video_id)).await {
            Ok(page) => extract_title(&page),
            Err(e) => {
                tracing::warn!("Title page fetch for {} failed: {}", video_id, e);
                None
            }
        }
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Resolve the video title and return a fallback transcript. Never fails.
    pub async fn resolve(&self, video_id: &str) -> Transcript {
        let title = self.title(video_id).await;

        tracing::info!("Returning fallback transcript for {} ({})", video_id, title);
        Transcript::fallback(fallback_notice(&title), title)
    }
}
