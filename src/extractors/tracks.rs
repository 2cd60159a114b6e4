//! Caption-track discovery inside a watch page.
//!
//! Each strategy looks for an embedded JSON fragment behind a marker token and maps it
//! straight into [`CaptionTrackDescriptor`]s. A strategy that finds nothing, or finds
//! something that does not validate, reports `None`.

use serde::Deserialize;

/// One caption stream advertised by the page, before its content is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrackDescriptor {
    pub language_code: String,
    pub track_url: String,
    pub vss_id: String,
}

#[derive(Debug, Deserialize)]
struct RawCaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode", default)]
    language_code: String,
    #[serde(rename = "vssId", default)]
    vss_id: String,
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<RawCaptionTrack>>,
}

/// A way of locating caption tracks in page content
pub trait TrackLocator: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, page: &str) -> Option<Vec<CaptionTrackDescriptor>>;
}

/// Strategy 1: the bare `"captionTracks":[...]` array
pub struct CaptionTracksArray;

/// Strategy 2: the full `ytInitialPlayerResponse = {...}` object
pub struct InitialPlayerResponse;

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

impl TrackLocator for CaptionTracksArray {
    fn name(&self) -> &'static str {
        "captionTracks array"
    }

    fn locate(&self, page: &str) -> Option<Vec<CaptionTrackDescriptor>> {
        let fragment = embedded_json(page, CAPTION_TRACKS_MARKER, '[')?;
        let raw: Vec<RawCaptionTrack> = serde_json::from_str(fragment)
            .map_err(|e| tracing::debug!("captionTracks array did not parse: {}", e))
            .ok()?;
        into_descriptors(raw)
    }
}

impl TrackLocator for InitialPlayerResponse {
    fn name(&self) -> &'static str {
        "initial player response"
    }

    fn locate(&self, page: &str) -> Option<Vec<CaptionTrackDescriptor>> {
        let fragment = embedded_json(page, PLAYER_RESPONSE_MARKER, '{')?;
        let response: PlayerResponse = serde_json::from_str(fragment)
            .map_err(|e| tracing::debug!("player response did not parse: {}", e))
            .ok()?;

        let raw = response
            .captions?
            .player_captions_tracklist_renderer?
            .caption_tracks?;
        into_descriptors(raw)
    }
}

/// Strategies in the order they are tried
pub fn default_locators() -> Vec<Box<dyn TrackLocator>> {
    vec![Box::new(CaptionTracksArray), Box::new(InitialPlayerResponse)]
}

fn into_descriptors(raw: Vec<RawCaptionTrack>) -> Option<Vec<CaptionTrackDescriptor>> {
    let tracks: Vec<CaptionTrackDescriptor> = raw
        .into_iter()
        .filter(|track| !track.base_url.trim().is_empty())
        .map(|track| CaptionTrackDescriptor {
            language_code: track.language_code,
            track_url: track.base_url,
            vss_id: track.vss_id,
        })
        .collect();

    if tracks.is_empty() {
        None
    } else {
        Some(tracks)
    }
}

/// Choose the track to fetch.
///
/// `"auto"` prefers English, matching either the language code or a `.en` variant-stream
/// id; any other language prefers an exact code match. Otherwise the first track wins.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrackDescriptor],
    language: &str,
) -> Option<&'a CaptionTrackDescriptor> {
    let preferred = if language == "auto" {
        tracks
            .iter()
            .find(|track| track.language_code == "en" || track.vss_id.contains(".en"))
    } else {
        tracks.iter().find(|track| track.language_code == language)
    };

    preferred.or_else(|| tracks.first())
}

/// Return the balanced JSON value opened by `open` that follows some occurrence of
/// `marker` (after optional whitespace and `=`).
fn embedded_json<'a>(page: &'a str, marker: &str, open: char) -> Option<&'a str> {
    let close = match open {
        '[' => ']',
        '{' => '}',
        _ => return None,
    };

    page.match_indices(marker).find_map(|(index, _)| {
        let rest = page[index + marker.len()..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == '=');
        if !rest.starts_with(open) {
            return None;
        }
        balanced_prefix(rest, open, close)
    })
}

fn balanced_prefix(text: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(&text[..index + c.len_utf8()]);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language_code: &str, vss_id: &str) -> CaptionTrackDescriptor {
        CaptionTrackDescriptor {
            language_code: language_code.to_string(),
            track_url: format!("https://www.youtube.com/api/timedtext?lang={}", language_code),
            vss_id: vss_id.to_string(),
        }
    }

    const PAGE: &str = r#"<script>var ytInitialPlayerResponse = {"videoDetails":{"title":"a [tricky] \"title\""},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=de","languageCode":"de","vssId":".de"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=en","languageCode":"en","vssId":"a.en"}]}}};</script>"#;

    #[test]
    fn test_caption_tracks_array_strategy() {
        let tracks = CaptionTracksArray.locate(PAGE).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "de");
        assert_eq!(tracks[0].track_url, "https://www.youtube.com/api/timedtext?v=x&lang=de");
        assert_eq!(tracks[1].vss_id, "a.en");
    }

    #[test]
    fn test_player_response_strategy() {
        let tracks = InitialPlayerResponse.locate(PAGE).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].language_code, "en");
    }

    #[test]
    fn test_player_response_without_captions() {
        let page = r#"var ytInitialPlayerResponse = {"videoDetails":{"title":"x"}};"#;
        assert!(InitialPlayerResponse.locate(page).is_none());
        assert!(CaptionTracksArray.locate(page).is_none());
    }

    #[test]
    fn test_player_response_skips_non_object_occurrences() {
        let page = r#"window["ytInitialPlayerResponse"] = null; var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://t/1","languageCode":"fr"}]}}};"#;
        let tracks = InitialPlayerResponse.locate(page).unwrap();
        assert_eq!(tracks[0].language_code, "fr");
        assert_eq!(tracks[0].vss_id, "");
    }

    #[test]
    fn test_invalid_tracks_yield_nothing() {
        assert!(CaptionTracksArray.locate(r#""captionTracks":[{"languageCode":"en"}]"#).is_none());
        assert!(CaptionTracksArray.locate(r#""captionTracks":[]"#).is_none());
        assert!(CaptionTracksArray.locate(r#""captionTracks":[{"baseUrl":"#).is_none());
    }

    #[test]
    fn test_select_auto_prefers_english_code() {
        let tracks = vec![track("de", ".de"), track("en", ".en")];
        assert_eq!(select_track(&tracks, "auto").unwrap().language_code, "en");
    }

    #[test]
    fn test_select_auto_matches_variant_stream_id() {
        let tracks = vec![track("de", ".de"), track("en-GB", "a.en-GB")];
        assert_eq!(select_track(&tracks, "auto").unwrap().language_code, "en-GB");
    }

    #[test]
    fn test_select_exact_language() {
        let tracks = vec![track("en", ".en"), track("fr", ".fr")];
        assert_eq!(select_track(&tracks, "fr").unwrap().language_code, "fr");
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let tracks = vec![track("de", ".de"), track("fr", ".fr")];
        assert_eq!(select_track(&tracks, "auto").unwrap().language_code, "de");
        assert_eq!(select_track(&tracks, "ja").unwrap().language_code, "de");
        assert!(select_track(&[], "auto").is_none());
    }

    #[test]
    fn test_balanced_prefix_ignores_brackets_in_strings() {
        let text = r#"["a]", {"b": "[\"]"}] trailing ]"#;
        assert_eq!(balanced_prefix(text, '[', ']'), Some(r#"["a]", {"b": "[\"]"}]"#));
    }
}
