/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format an offset as `M:SS` (whole seconds, minutes unpadded)
pub fn format_clock(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Parse language code and return normalized version.
///
/// Empty input means `auto`; common language names map to their two-letter codes.
/// Codes pass through with their case intact, since track matching is exact.
pub fn normalize_language_code(lang: &str) -> String {
    let trimmed = lang.trim();

    let normalized = match trimmed.to_lowercase().as_str() {
        "" | "auto" => "auto",
        "english" => "en",
        "spanish" => "es",
        "french" => "fr",
        "german" => "de",
        "italian" => "it",
        "portuguese" => "pt",
        "japanese" => "ja",
        "korean" => "ko",
        "chinese" => "zh",
        "arabic" => "ar",
        "hindi" => "hi",
        "russian" => "ru",
        _ => trimmed, // Return as-is if no mapping found
    };

    normalized.to_string()
}
