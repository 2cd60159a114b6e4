//! Transcript normalization.
//!
//! Whatever produced the segments, the canonical transcript has trimmed non-empty
//! segment texts, non-negative times with `end >= start`, segments in non-decreasing
//! start order, and a full text that is the segment texts joined by single spaces.

use super::{Transcript, TranscriptSegment};

/// Used when a source reports no language
pub const DEFAULT_LANGUAGE: &str = "en";

const FALLBACK_NOTICE_SECS: f64 = 10.0;

/// Normalize `segments` and rebuild the full text.
///
/// With `is_fallback` the result is collapsed to at most one segment spanning all input.
/// Total: an empty input gives an empty text and no segments.
pub fn normalize(segments: Vec<TranscriptSegment>, is_fallback: bool) -> (String, Vec<TranscriptSegment>) {
    let mut segments: Vec<TranscriptSegment> = segments
        .into_iter()
        .filter_map(clean_segment)
        .collect();

    // sort_by is stable, so equal starts keep source order
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    if is_fallback && segments.len() > 1 {
        let start = segments[0].start;
        let end = segments.iter().map(|s| s.end).fold(start, f64::max);
        let text = join_text(&segments);
        segments = vec![TranscriptSegment { start, end, text }];
    }

    (join_text(&segments), segments)
}

/// Segment texts joined by single spaces
pub fn join_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_segment(segment: TranscriptSegment) -> Option<TranscriptSegment> {
    let text = segment.text.trim();
    if text.is_empty() {
        return None;
    }

    let start = non_negative(segment.start);
    let end = non_negative(segment.end).max(start);

    Some(TranscriptSegment {
        start,
        end,
        text: text.to_string(),
    })
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

impl Transcript {
    /// Build a caption transcript from raw segments
    pub fn from_segments(
        segments: Vec<TranscriptSegment>,
        language: &str,
        video_title: Option<String>,
    ) -> Self {
        let (text, segments) = normalize(segments, false);
        let language = language.trim();

        Self {
            text,
            segments,
            language: if language.is_empty() {
                DEFAULT_LANGUAGE.to_string()
            } else {
                language.to_string()
            },
            is_fallback: false,
            video_title,
        }
    }

    /// Build a fallback transcript holding a single notice segment
    pub fn fallback(notice: String, video_title: String) -> Self {
        let notice_segment = TranscriptSegment {
            start: 0.0,
            end: FALLBACK_NOTICE_SECS,
            text: notice,
        };
        let (text, segments) = normalize(vec![notice_segment], true);

        Self {
            text,
            segments,
            language: DEFAULT_LANGUAGE.to_string(),
            is_fallback: true,
            video_title: Some(video_title),
        }
    }
}
