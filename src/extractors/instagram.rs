use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use super::{placeholder_transcript, CaptionSource, Platform};
use crate::transcribe::Transcript;
use crate::TranscriptorError;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i:instagram\.com)/p/([a-zA-Z0-9_-]+)")
            .expect("Instagram post id pattern is valid")
    })
}

/// Extract the post shortcode from an `instagram.com/p/<code>` URL
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Instagram has no public caption tracks; serves a labelled placeholder
pub struct InstagramCaptionSource;

impl InstagramCaptionSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptionSource for InstagramCaptionSource {
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Transcript, TranscriptorError> {
        tracing::info!("Instagram post {} has no public captions, returning placeholder", video_id);
        Ok(placeholder_transcript(Platform::Instagram, language))
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn url_shapes(&self) -> &'static [&'static str] {
        &["instagram.com/p/<code>"]
    }
}

impl Default for InstagramCaptionSource {
    fn default() -> Self {
        Self::new()
    }
}
