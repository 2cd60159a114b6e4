use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use url::Url;

use super::timedtext::parse_timed_text;
use super::tracks::{default_locators, select_track, TrackLocator};
use super::{CaptionSource, Platform};
use crate::fetch::PageFetcher;
use crate::transcribe::{Transcript, TranscriptSegment};
use crate::utils::normalize_language_code;
use crate::TranscriptorError;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const VIDEO_ID_LEN: usize = 11;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^.*((youtu.be/)|(v/)|(/u/\w/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*")
            .expect("YouTube video id pattern is valid")
    })
}

/// Extract the 11-character video id from short-link, embed, watch or `/v/` URLs
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(7))
        .map(|m| m.as_str())
        .filter(|id| id.len() == VIDEO_ID_LEN)
        .map(str::to_string)
}

/// Canonical watch page for `video_id`
pub fn watch_url(video_id: &str) -> String {
    Url::parse_with_params(WATCH_URL, &[("v", video_id)])
        .map(String::from)
        .unwrap_or_else(|_| format!("{}?v={}", WATCH_URL, video_id))
}

/// YouTube caption extractor working from the public watch page
pub struct YoutubeCaptionSource {
    fetcher: Arc<dyn PageFetcher>,
    locators: Vec<Box<dyn TrackLocator>>,
}

impl YoutubeCaptionSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            locators: default_locators(),
        }
    }

    /// Run one strategy end to end: locate tracks, pick one, fetch and parse it
    async fn attempt(
        &self,
        locator: &dyn TrackLocator,
        page: &str,
        language: &str,
    ) -> Option<Transcript> {
        let tracks = locator.locate(page)?;
        tracing::debug!("{} found {} caption track(s)", locator.name(), tracks.len());

        let track = select_track(&tracks, language)?;
        tracing::debug!(
            "Selected caption track lang={} vss_id={}",
            track.language_code,
            track.vss_id
        );

        let document = self
            .fetcher
            .fetch_text(&track.track_url)
            .await
            .map_err(|e| tracing::warn!("{}: caption track fetch failed: {}", locator.name(), e))
            .ok()?;

        let cues = parse_timed_text(&document);
        if cues.is_empty() {
            tracing::warn!("{}: caption track contained no text", locator.name());
            return None;
        }

        let segments = cues
            .into_iter()
            .map(|cue| TranscriptSegment {
                start: cue.start,
                end: cue.start + cue.duration,
                text: cue.text,
            })
            .collect();

        let language = if track.language_code.is_empty() {
            "en"
        } else {
            track.language_code.as_str()
        };

        Some(Transcript::from_segments(segments, language, None))
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionSource {
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Transcript, TranscriptorError> {
        let language = normalize_language_code(language);
        tracing::info!("Fetching YouTube captions for {} (language: {})", video_id, language);

        let page = match self.fetcher.fetch_text(&watch_url(video_id)).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Watch page for {} unavailable: {}", video_id, e);
                return Err(TranscriptorError::extraction(
                    video_id,
                    format!("watch page unavailable ({})", e),
                ));
            }
        };

        for locator in &self.locators {
            if let Some(transcript) = self.attempt(locator.as_ref(), &page, &language).await {
                tracing::info!(
                    "Retrieved {} caption segments via {}",
                    transcript.segments.len(),
                    locator.name()
                );
                return Ok(transcript);
            }
            tracing::debug!("Strategy '{}' produced no captions", locator.name());
        }

        Err(TranscriptorError::extraction(
            video_id,
            "no caption track could be retrieved for this video",
        ))
    }

    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn url_shapes(&self) -> &'static [&'static str] {
        &[
            "youtube.com/watch?v=<id>",
            "youtu.be/<id>",
            "youtube.com/embed/<id>",
            "youtube.com/v/<id>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockPageFetcher;

    const VIDEO_ID: &str = "dQw4w9WgXcQ";

    const TRACK_XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.5">Never gonna</text><text start="1.5" dur="2">give you &amp;amp; up</text><text start="3.5" dur="1.25">never gonna let you down</text></transcript>"#;

    fn player_page(tracks_json: &str) -> String {
        format!(
            r#"<html><head><title>Song - YouTube</title></head><body><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{}}}}}}};</script></body></html>"#,
            tracks_json
        )
    }

    #[test]
    fn test_extract_video_id_supported_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ#comments",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some(VIDEO_ID), "{}", url);
        }
    }

    #[test]
    fn test_extract_video_id_rejects_malformed() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQextra"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url(VIDEO_ID), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_fetch_captions_builds_segments_in_document_order() {
        let page = player_page(
            r#"[{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en","languageCode":"en","vssId":".en"}]"#,
        );

        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_text()
            .withf(|url| url == "https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .times(1)
            .returning(move |_| Ok(page.clone()));
        fetcher
            .expect_fetch_text()
            .withf(|url| url == "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en")
            .times(1)
            .returning(|_| Ok(TRACK_XML.to_string()));

        let source = YoutubeCaptionSource::new(Arc::new(fetcher));
        let transcript = source.fetch_captions(VIDEO_ID, "auto").await.unwrap();

        assert_eq!(transcript.segments.len(), 3);
        assert_eq!(transcript.segments[1].start, 1.5);
        assert_eq!(transcript.segments[1].end, 3.5);
        assert_eq!(transcript.segments[2].end, 4.75);
        assert_eq!(transcript.segments[1].text, "give you & up");
        assert_eq!(
            transcript.text,
            "Never gonna give you & up never gonna let you down"
        );
        assert_eq!(transcript.language, "en");
        assert!(!transcript.is_fallback);
        assert_eq!(transcript.video_title, None);
    }

    #[tokio::test]
    async fn test_second_strategy_used_when_first_track_fails() {
        // The bare array advertises a broken track; the player response is spaced so only
        // the second strategy can read it.
        let page = r#"<script>{"captionTracks":[{"baseUrl":"https://t.example/broken","languageCode":"en"}]}</script>
<script>var ytInitialPlayerResponse = {"captions": {"playerCaptionsTracklistRenderer": {"captionTracks" : [{"baseUrl": "https://t.example/good", "languageCode": "de", "vssId": ".de"}]}}};</script>"#;

        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_text()
            .withf(|url| url.contains("/watch"))
            .times(1)
            .returning(move |_| Ok(page.to_string()));
        fetcher
            .expect_fetch_text()
            .withf(|url| url == "https://t.example/broken")
            .times(1)
            .returning(|_| Err(TranscriptorError::Http("connection reset".to_string())));
        fetcher
            .expect_fetch_text()
            .withf(|url| url == "https://t.example/good")
            .times(1)
            .returning(|_| Ok(r#"<transcript><text start="2" dur="3">Hallo</text></transcript>"#.to_string()));

        let source = YoutubeCaptionSource::new(Arc::new(fetcher));
        let transcript = source.fetch_captions(VIDEO_ID, "auto").await.unwrap();

        assert_eq!(transcript.language, "de");
        assert_eq!(transcript.text, "Hallo");
        assert_eq!(transcript.segments[0].end, 5.0);
    }

    #[tokio::test]
    async fn test_page_without_tracks_is_extraction_error() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_text()
            .times(1)
            .returning(|_| Ok("<html><title>No captions - YouTube</title></html>".to_string()));

        let source = YoutubeCaptionSource::new(Arc::new(fetcher));
        let err = source.fetch_captions(VIDEO_ID, "auto").await.unwrap_err();
        assert!(matches!(err, TranscriptorError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_page_fetch_failure_is_extraction_error() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_text()
            .times(1)
            .returning(|_| Err(TranscriptorError::Http("timed out".to_string())));

        let source = YoutubeCaptionSource::new(Arc::new(fetcher));
        let err = source.fetch_captions(VIDEO_ID, "en").await.unwrap_err();
        match err {
            TranscriptorError::Extraction { video_id, .. } => assert_eq!(video_id, VIDEO_ID),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_track_document_exhausts_both_strategies() {
        let page = player_page(r#"[{"baseUrl":"https://t.example/empty","languageCode":"en"}]"#);

        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_text()
            .withf(|url| url.contains("/watch"))
            .times(1)
            .returning(move |_| Ok(page.clone()));
        fetcher
            .expect_fetch_text()
            .withf(|url| url == "https://t.example/empty")
            .times(2)
            .returning(|_| Ok("<transcript></transcript>".to_string()));

        let source = YoutubeCaptionSource::new(Arc::new(fetcher));
        let err = source.fetch_captions(VIDEO_ID, "auto").await.unwrap_err();
        assert!(matches!(err, TranscriptorError::Extraction { .. }));
    }
}
