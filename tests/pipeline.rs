use async_trait::async_trait;
use caption_transcriptor::{
    output, Config, OutputFormat, PageFetcher, TranscriptionPipeline, TranscriptorError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves canned documents by URL and records every request
#[derive(Default)]
struct StubFetcher {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, TranscriptorError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| TranscriptorError::Http(format!("404 for {}", url)))
    }
}

const WATCH: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn watch_page(tracks: &str) -> String {
    format!(
        r#"<html><head><title>Lecture &amp; Notes - YouTube</title></head><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{}}}}}}};</script></html>"#,
        tracks
    )
}

fn pipeline(fetcher: Arc<StubFetcher>) -> TranscriptionPipeline {
    TranscriptionPipeline::with_fetcher(Config::default(), fetcher)
}

#[tokio::test]
async fn youtube_captions_become_one_segment_per_cue() {
    let tracks = r#"[{"baseUrl":"https://captions.example/de","languageCode":"de","vssId":".de"},{"baseUrl":"https://captions.example/en","languageCode":"en","vssId":".en"}]"#;
    let fetcher = Arc::new(
        StubFetcher::default()
            .with(WATCH, &watch_page(tracks))
            .with(
                "https://captions.example/en",
                r#"<transcript><text start="0" dur="2.5">Welcome</text><text start="2.5" dur="2">to the &amp;lt;b&amp;gt;course&amp;lt;/b&amp;gt;</text><text start="6" dur="3">Let&amp;#39;s begin.</text></transcript>"#,
            ),
    );

    let transcript = pipeline(fetcher.clone())
        .transcribe("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42", "auto")
        .await
        .unwrap();

    assert!(!transcript.is_fallback);
    assert_eq!(transcript.segments.len(), 3);
    assert_eq!(transcript.text, "Welcome to the course Let's begin.");
    assert_eq!(transcript.segments[1].start, 2.5);
    assert_eq!(transcript.segments[1].end, 4.5);
    assert!(transcript
        .segments
        .windows(2)
        .all(|pair| pair[0].start <= pair[1].start));
    assert_eq!(
        fetcher.requests(),
        vec![WATCH.to_string(), "https://captions.example/en".to_string()]
    );

    let srt = output::render(&transcript, &OutputFormat::Srt).unwrap();
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,500\nWelcome\n\n"));
    assert!(srt.contains("3\n00:00:06,000 --> 00:00:09,000\nLet's begin.\n\n"));
}

#[tokio::test]
async fn explicit_language_selects_matching_track() {
    let tracks = r#"[{"baseUrl":"https://captions.example/en","languageCode":"en"},{"baseUrl":"https://captions.example/de","languageCode":"de"}]"#;
    let fetcher = Arc::new(
        StubFetcher::default()
            .with(WATCH, &watch_page(tracks))
            .with(
                "https://captions.example/de",
                r#"<transcript><text start="1" dur="1">Hallo</text></transcript>"#,
            ),
    );

    let transcript = pipeline(fetcher)
        .transcribe("https://youtu.be/dQw4w9WgXcQ", "de")
        .await
        .unwrap();

    assert_eq!(transcript.text, "Hallo");
    assert_eq!(transcript.language, "de");
}

#[tokio::test]
async fn missing_captions_fall_back_to_titled_notice() {
    let fetcher = Arc::new(StubFetcher::default().with(WATCH, "<html><title>Lecture &amp; Notes - YouTube</title></html>"));

    let transcript = pipeline(fetcher)
        .transcribe("https://www.youtube.com/embed/dQw4w9WgXcQ", "auto")
        .await
        .unwrap();

    assert!(transcript.is_fallback);
    assert_eq!(transcript.video_title.as_deref(), Some("Lecture & Notes"));
    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].start, 0.0);
    assert!(transcript.text.contains("Lecture & Notes"));
}

#[tokio::test]
async fn unreachable_youtube_still_answers_with_fallback() {
    let fetcher = Arc::new(StubFetcher::default());

    let transcript = pipeline(fetcher)
        .transcribe("https://youtu.be/dQw4w9WgXcQ", "auto")
        .await
        .unwrap();

    assert!(transcript.is_fallback);
    assert_eq!(transcript.video_title.as_deref(), Some("YouTube Video"));
}

#[tokio::test]
async fn unsupported_url_makes_no_requests() {
    let fetcher = Arc::new(StubFetcher::default());

    let err = pipeline(fetcher.clone())
        .transcribe("https://vimeo.com/12345", "auto")
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptorError::UnsupportedPlatform(_)));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn tiktok_gets_labelled_placeholder() {
    let fetcher = Arc::new(StubFetcher::default());

    let transcript = pipeline(fetcher.clone())
        .transcribe("https://www.tiktok.com/@someone/video/7234567890123456789", "auto")
        .await
        .unwrap();

    assert!(!transcript.is_fallback);
    assert!(transcript.text.contains("placeholder"));
    assert!(transcript.text.contains("TikTok"));
    assert!(fetcher.requests().is_empty());
}
