use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use super::{placeholder_transcript, CaptionSource, Platform};
use crate::transcribe::Transcript;
use crate::TranscriptorError;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i:tiktok\.com)/.*/video/(\d+)").expect("TikTok video id pattern is valid")
    })
}

/// Extract the numeric video id from a `tiktok.com/@user/video/<id>` URL
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// TikTok has no public caption tracks; serves a labelled placeholder
pub struct TiktokCaptionSource;

impl TiktokCaptionSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptionSource for TiktokCaptionSource {
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Transcript, TranscriptorError> {
        tracing::info!("TikTok video {} has no public captions, returning placeholder", video_id);
        Ok(placeholder_transcript(Platform::Tiktok, language))
    }

    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn url_shapes(&self) -> &'static [&'static str] {
        &["tiktok.com/@user/video/<id>"]
    }
}

impl Default for TiktokCaptionSource {
    fn default() -> Self {
        Self::new()
    }
}
