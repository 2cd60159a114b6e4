//! Caption Transcriptor - fetch and render platform caption tracks
//!
//! This library detects the platform behind a video URL, extracts the video identifier,
//! retrieves the platform's caption track (falling back to a clearly marked notice when
//! none exists) and renders the canonical transcript as text, paragraphs, timestamps or
//! SubRip subtitles.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod fallback;
pub mod fetch;
pub mod metadata;
pub mod output;
pub mod server;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{detect_platform, CaptionSource, Platform, VideoReference};
pub use fetch::{HttpFetcher, PageFetcher};
pub use metadata::VideoMetadata;
pub use transcribe::{ProgressObserver, Transcript, TranscriptSegment, TranscriptionPipeline};

/// Result type used by the application layers
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcriptor
#[derive(thiserror::Error, Debug)]
pub enum TranscriptorError {
    #[error("Unsupported video platform: {0}. Please use YouTube, TikTok, or Instagram URLs.")]
    UnsupportedPlatform(String),

    #[error("Invalid {platform} URL: {url}")]
    InvalidUrl { platform: Platform, url: String },

    #[error("Captions are not available for video {video_id}: {reason}")]
    Extraction { video_id: String, reason: String },

    #[error("Subtitle encoding failed: {0}")]
    Encoding(String),

    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl TranscriptorError {
    pub(crate) fn extraction(video_id: &str, reason: impl Into<String>) -> Self {
        TranscriptorError::Extraction {
            video_id: video_id.to_string(),
            reason: reason.into(),
        }
    }
}
