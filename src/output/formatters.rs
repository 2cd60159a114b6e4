//! Renderers for the canonical transcript.

use crate::transcribe::{Transcript, TranscriptSegment};
use crate::utils::format_clock;
use crate::TranscriptorError;

/// A pause longer than this starts a new paragraph
const PARAGRAPH_PAUSE_SECS: f64 = 2.0;

/// A sentence end starts a new paragraph once the paragraph spans this long
const PARAGRAPH_MIN_SPAN_SECS: f64 = 15.0;

/// Plain text export: the transcript text unchanged
pub fn to_plain_text(transcript: &Transcript) -> String {
    transcript.text.clone()
}

/// SubRip export.
///
/// Each segment becomes an index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` line, the text
/// and a blank line. Fails when there are no segments.
pub fn to_srt(transcript: &Transcript) -> Result<String, TranscriptorError> {
    if transcript.segments.is_empty() {
        return Err(TranscriptorError::Encoding(
            "transcript has no segments to encode as subtitles".to_string(),
        ));
    }

    let mut srt = String::new();
    for (index, segment) in transcript.segments.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_srt_time(segment.start),
            format_srt_time(segment.end),
            segment.text
        ));
    }

    Ok(srt)
}

/// Format seconds as `HH:MM:SS,mmm`, truncating sub-millisecond precision
pub fn format_srt_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };

    let total_millis = (seconds * 1000.0).trunc() as u64;

    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// One `[M:SS] text` line per segment
pub fn format_as_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|segment| format!("[{}] {}", format_clock(segment.start), segment.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Paragraphs separated by a blank line.
///
/// Text that already carries blank-line paragraphs is kept as is; otherwise segments are
/// grouped at long pauses, or at sentence ends once a paragraph is long enough.
pub fn format_as_paragraphs(transcript: &Transcript) -> String {
    if transcript.text.contains("\n\n") || transcript.segments.is_empty() {
        return transcript.text.clone();
    }

    group_paragraphs(&transcript.segments)
        .iter()
        .map(|paragraph| {
            paragraph
                .iter()
                .map(|segment| segment.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn group_paragraphs(segments: &[TranscriptSegment]) -> Vec<Vec<&TranscriptSegment>> {
    let mut paragraphs: Vec<Vec<&TranscriptSegment>> = Vec::new();
    let mut current: Vec<&TranscriptSegment> = Vec::new();

    for segment in segments {
        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let pause = segment.start - last.end > PARAGRAPH_PAUSE_SECS;
            let sentence_end = last.text.ends_with(|c: char| matches!(c, '.' | '!' | '?'));
            let long_enough = last.end - first.start >= PARAGRAPH_MIN_SPAN_SECS;

            if pause || (sentence_end && long_enough) {
                paragraphs.push(std::mem::take(&mut current));
            }
        }
        current.push(segment);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Pretty-printed JSON in the wire shape
pub fn format_as_json(transcript: &Transcript) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}
