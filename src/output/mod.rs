use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcribe::Transcript;

pub mod formatters;

pub use formatters::*;

/// Render a transcript in the requested format
pub fn render(transcript: &Transcript, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => to_plain_text(transcript),
        OutputFormat::Paragraphs => format_as_paragraphs(transcript),
        OutputFormat::Timestamps => format_as_timestamps(transcript),
        OutputFormat::Srt => to_srt(transcript)?,
        OutputFormat::Json => format_as_json(transcript)?,
    };

    Ok(content)
}

/// Save transcript to file
pub fn save_to_file(transcript: &Transcript, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(transcript, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print transcript to console
pub fn print_to_console(transcript: &Transcript, format: &OutputFormat) -> Result<()> {
    let content = render(transcript, format)?;
    println!("{}", content);
    Ok(())
}
