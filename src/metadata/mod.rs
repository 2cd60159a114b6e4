//! Display metadata for a video: platform, id, thumbnail and title.

use serde::{Deserialize, Serialize};

use crate::extractors::Platform;

const TIKTOK_THUMBNAIL: &str =
    "https://via.placeholder.com/480x852/3A0CA3/FFFFFF?text=TikTok+Video";
const INSTAGRAM_THUMBNAIL: &str =
    "https://via.placeholder.com/600x600/F72585/FFFFFF?text=Instagram+Video";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub platform: Platform,
    pub video_id: String,
    pub thumbnail: String,
    pub title: String,
    pub url: String,
}

/// Thumbnail image URL for a video
pub fn thumbnail_url(platform: Platform, video_id: &str) -> String {
    match platform {
        Platform::Youtube => format!("https://img.youtube.com/vi/{}/0.jpg", video_id),
        Platform::Tiktok => TIKTOK_THUMBNAIL.to_string(),
        Platform::Instagram => INSTAGRAM_THUMBNAIL.to_string(),
        Platform::Unknown => String::new(),
    }
}

/// Title used when the real one is unknown, e.g. "TikTok Video"
pub fn default_title(platform: Platform) -> String {
    format!("{} Video", platform.display_name())
}

impl VideoMetadata {
    pub fn new(platform: Platform, video_id: &str, title: String, url: &str) -> Self {
        Self {
            platform,
            video_id: video_id.to_string(),
            thumbnail: thumbnail_url(platform, video_id),
            title,
            url: url.to_string(),
        }
    }

    pub fn display(&self) {
        println!("Platform:  {}", self.platform.display_name());
        println!("Video ID:  {}", self.video_id);
        println!("Title:     {}", self.title);
        println!("Thumbnail: {}", self.thumbnail);
        println!("URL:       {}", self.url);
    }
}
