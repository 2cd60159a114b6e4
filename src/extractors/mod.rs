use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod instagram;
pub mod tiktok;
pub mod timedtext;
mod tracks;
pub mod youtube;

use crate::fetch::PageFetcher;
use crate::transcribe::{Transcript, TranscriptSegment};
use crate::utils::normalize_language_code;
use crate::TranscriptorError;

/// Supported video platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Unknown => "unknown",
        }
    }

    /// Human readable platform name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Unknown => "Unknown",
        }
    }

    /// Extract the platform-native video identifier from `url`.
    ///
    /// Returns `None` when the URL matches none of the platform's known shapes.
    pub fn extract_id(&self, url: &str) -> Option<String> {
        match self {
            Platform::Youtube => youtube::extract_video_id(url),
            Platform::Tiktok => tiktok::extract_video_id(url),
            Platform::Instagram => instagram::extract_video_id(url),
            Platform::Unknown => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classify a raw URL string by its domain tokens. First match wins.
pub fn detect_platform(url: &str) -> Platform {
    let url_lower = url.to_lowercase();

    if url_lower.contains("youtube.com") || url_lower.contains("youtu.be") {
        Platform::Youtube
    } else if url_lower.contains("tiktok.com") {
        Platform::Tiktok
    } else if url_lower.contains("instagram.com") {
        Platform::Instagram
    } else {
        Platform::Unknown
    }
}

/// A URL resolved to its platform and (when recognisable) its video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    pub platform: Platform,
    pub video_id: Option<String>,
    pub raw_url: String,
}

impl VideoReference {
    pub fn parse(url: &str) -> Self {
        let platform = detect_platform(url);
        Self {
            platform,
            video_id: platform.extract_id(url),
            raw_url: url.to_string(),
        }
    }
}

/// Trait for retrieving captions from a platform
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Retrieve the caption track for `video_id` in `language` ("auto" or a language code)
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Transcript, TranscriptorError>;

    /// The platform this source serves
    fn platform(&self) -> Platform;

    /// URL shapes accepted for this platform, for display
    fn url_shapes(&self) -> &'static [&'static str];
}

/// Registry mapping each platform to its caption source
pub struct ExtractorRegistry {
    sources: Vec<Box<dyn CaptionSource>>,
}

impl ExtractorRegistry {
    /// Create a new registry with the default sources
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        registry.register(Box::new(youtube::YoutubeCaptionSource::new(fetcher)));
        registry.register(Box::new(tiktok::TiktokCaptionSource::new()));
        registry.register(Box::new(instagram::InstagramCaptionSource::new()));

        registry
    }

    /// Register a new source
    pub fn register(&mut self, source: Box<dyn CaptionSource>) {
        self.sources.push(source);
    }

    /// Find the source serving `platform`
    pub fn find_source(&self, platform: Platform) -> Option<&dyn CaptionSource> {
        self.sources
            .iter()
            .find(|source| source.platform() == platform)
            .map(|boxed| boxed.as_ref())
    }

    /// List all supported platforms
    pub fn list_platforms(&self) -> Vec<(Platform, &'static [&'static str])> {
        self.sources
            .iter()
            .map(|source| (source.platform(), source.url_shapes()))
            .collect()
    }
}

/// Fixed transcript for platforms without public caption access.
///
/// The text makes clear that no real captions were retrieved.
pub(crate) fn placeholder_transcript(platform: Platform, language: &str) -> Transcript {
    let lines = [
        (0.0, 5.0, "This is a placeholder transcript.".to_string()),
        (
            5.0,
            10.0,
            format!(
                "{} does not publish caption tracks, so no captions could be retrieved.",
                platform.display_name()
            ),
        ),
        (
            10.0,
            15.0,
            "Use a YouTube video with captions for a full transcript.".to_string(),
        ),
    ];

    let segments = lines
        .into_iter()
        .map(|(start, end, text)| TranscriptSegment { start, end, text })
        .collect();

    let language = match normalize_language_code(language).as_str() {
        "auto" => "en".to_string(),
        code => code.to_string(),
    };

    Transcript::from_segments(segments, &language, None)
}
