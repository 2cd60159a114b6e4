//! Parser for the timed-text caption document.
//!
//! The document is a flat list of `<text start=".." dur="..">content</text>` elements.
//! Element content is XML-escaped HTML, so entities are decoded in two passes.

use regex::Regex;
use std::sync::OnceLock;

/// One caption fragment in document order
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTextCue {
    /// Offset in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Entity-decoded, whitespace-collapsed text
    pub text: String,
}

fn open_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<text\b([^>]*)>").expect("open tag pattern is valid"))
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#)
            .expect("attribute pattern is valid")
    })
}

fn inline_markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)</?(?:font|b|i|u)\b[^<>]*>").expect("markup pattern is valid")
    })
}

/// Parse every timed-text element of `document`.
///
/// Missing or unparseable `start`/`dur` attributes read as `0`. Elements whose decoded
/// text is empty are skipped.
pub fn parse_timed_text(document: &str) -> Vec<TimedTextCue> {
    let mut cues = Vec::new();
    let mut cursor = 0;

    while let Some(tag) = open_tag_pattern().captures_at(document, cursor) {
        let (Some(whole), Some(attrs)) = (tag.get(0), tag.get(1)) else {
            break;
        };
        cursor = whole.end();

        // <text ... /> carries no content
        if attrs.as_str().trim_end().ends_with('/') {
            continue;
        }

        let Some(close) = document[cursor..].find("</text>") else {
            break;
        };
        let raw = &document[cursor..cursor + close];
        cursor += close + "</text>".len();

        let text = decode_content(raw);
        if text.is_empty() {
            continue;
        }

        cues.push(TimedTextCue {
            start: numeric_attribute(attrs.as_str(), "start"),
            duration: numeric_attribute(attrs.as_str(), "dur"),
            text,
        });
    }

    tracing::debug!("Parsed {} timed-text cues", cues.len());
    cues
}

fn numeric_attribute(attrs: &str, name: &str) -> f64 {
    attribute_pattern()
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps[2].trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn decode_content(raw: &str) -> String {
    let unescaped = html_escape::decode_html_entities(raw);
    let decoded = html_escape::decode_html_entities(&unescaped);
    let stripped = inline_markup_pattern().replace_all(&decoded, "");

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
