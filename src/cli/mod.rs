use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcriptor",
    about = "Caption Transcriptor - Turn YouTube, TikTok and Instagram captions into readable transcripts",
    version,
    long_about = "Fetches a video's platform-provided caption track and renders it as plain text, paragraphs, timestamped lines, SubRip subtitles or JSON. Videos without captions get a clearly marked fallback notice instead of a transcript."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to ./config.yaml, then the user config directory)
    #[arg(long, global = true, value_name = "FILE", env = "TRANSCRIPTOR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and render the captions of a video
    Transcribe {
        /// Video URL (YouTube, TikTok or Instagram)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (defaults to app.default_output_format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Caption language code, or "auto" to prefer English
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,
    },

    /// Show platform, id, thumbnail and title of a video
    Info {
        /// Video URL (YouTube, TikTok or Instagram)
        #[arg(value_name = "URL")]
        url: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the transcript HTTP API
    Serve {
        /// Address to bind (defaults to server.bind)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Show or initialise the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration to the user config directory
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },

    /// List supported platforms
    Platforms,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Text grouped into paragraphs
    Paragraphs,
    /// One [M:SS] line per caption
    Timestamps,
    /// SRT subtitle format
    Srt,
    /// JSON with timestamps
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Paragraphs => write!(f, "paragraphs"),
            OutputFormat::Timestamps => write!(f, "timestamps"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format: {}", s))
    }
}
