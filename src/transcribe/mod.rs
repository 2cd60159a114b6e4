use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::extractors::{ExtractorRegistry, Platform, VideoReference};
use crate::fallback::FallbackResolver;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::metadata::{default_title, VideoMetadata};
use crate::utils::normalize_language_code;
use crate::TranscriptorError;

pub mod normalize;
pub mod progress;

pub use progress::ProgressObserver;

use progress::ProgressTicker;

/// Canonical transcript, independent of the source that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Segment texts joined by single spaces
    pub text: String,

    /// Timed segments in non-decreasing start order
    #[serde(rename = "timestamps", alias = "segments")]
    pub segments: Vec<TranscriptSegment>,

    /// Best-effort language code, "en" when unknown
    pub language: String,

    /// True when no caption track was found and the single segment is a notice
    #[serde(default)]
    pub is_fallback: bool,

    /// Video title, when it was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
}

/// Individual transcript segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Segment text
    pub text: String,
}

/// Main transcription pipeline
pub struct TranscriptionPipeline {
    config: Config,
    extractor_registry: ExtractorRegistry,
    fallback: FallbackResolver,
}

impl TranscriptionPipeline {
    /// Create a pipeline that fetches over HTTP
    pub fn new(config: Config) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a pipeline on top of an arbitrary fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            extractor_registry: ExtractorRegistry::new(Arc::clone(&fetcher)),
            fallback: FallbackResolver::new(fetcher),
        }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.extractor_registry
    }

    /// Resolve a URL to a platform and video id, without any network access
    pub fn resolve(&self, url: &str) -> Result<(Platform, String), TranscriptorError> {
        let reference = VideoReference::parse(url);

        if reference.platform == Platform::Unknown {
            return Err(TranscriptorError::UnsupportedPlatform(url.to_string()));
        }

        let video_id = reference.video_id.ok_or_else(|| TranscriptorError::InvalidUrl {
            platform: reference.platform,
            url: url.to_string(),
        })?;

        Ok((reference.platform, video_id))
    }

    /// Transcribe the video behind `url`.
    ///
    /// Caption extraction failures on YouTube are answered with a fallback transcript;
    /// only unsupported platforms and unrecognised URLs are errors.
    pub async fn transcribe(&self, url: &str, language: &str) -> Result<Transcript, TranscriptorError> {
        let (platform, video_id) = self.resolve(url)?;

        let language = if language.trim().is_empty() {
            normalize_language_code(&self.config.app.default_language)
        } else {
            normalize_language_code(language)
        };

        tracing::info!("Transcribing {} video {} (language: {})", platform, video_id, language);

        let source = self
            .extractor_registry
            .find_source(platform)
            .ok_or_else(|| TranscriptorError::UnsupportedPlatform(url.to_string()))?;

        match source.fetch_captions(&video_id, &language).await {
            Ok(transcript) => Ok(transcript),
            Err(TranscriptorError::Extraction { video_id, reason }) if platform == Platform::Youtube => {
                tracing::warn!("Caption extraction failed for {}: {}; using fallback", video_id, reason);
                Ok(self.fallback.resolve(&video_id).await)
            }
            Err(e) => Err(e),
        }
    }

    /// [`transcribe`](Self::transcribe) while feeding estimated progress to `observer`
    pub async fn transcribe_with_progress(
        &self,
        url: &str,
        language: &str,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<Transcript, TranscriptorError> {
        let ticker = ProgressTicker::start(observer);
        let result = self.transcribe(url, language).await;

        match &result {
            Ok(_) => ticker.finish(),
            Err(_) => ticker.cancel(),
        }

        result
    }

    /// Fallback transcript for a YouTube video id
    pub async fn fallback(&self, video_id: &str) -> Transcript {
        self.fallback.resolve(video_id).await
    }

    /// Platform, id, thumbnail and title for `url`.
    ///
    /// Only YouTube titles are looked up; a failed lookup yields the platform's default title.
    pub async fn metadata(&self, url: &str) -> Result<VideoMetadata, TranscriptorError> {
        let (platform, video_id) = self.resolve(url)?;

        let title = match platform {
            Platform::Youtube => self.fallback.title(&video_id).await,
            _ => default_title(platform),
        };

        Ok(VideoMetadata::new(platform, &video_id, title, url))
    }
}
