use anyhow::{Context, Result};
use caption_transcriptor::{
    output, server, Cli, Commands, Config, OutputFormat, ProgressObserver, TranscriptionPipeline,
};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "caption_transcriptor=debug,tower_http=debug"
    } else {
        "caption_transcriptor=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            cli.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Transcribe {
            url,
            output,
            format,
            language,
        } => {
            let format = match format {
                Some(format) => format,
                None => config.app.default_output_format.parse::<OutputFormat>()?,
            };
            let language = language.unwrap_or_default();
            let pipeline = TranscriptionPipeline::new(config)?;

            tracing::info!("Starting transcription for URL: {}", url);

            let result = if cli.quiet {
                pipeline.transcribe(&url, &language).await?
            } else {
                let bar = Arc::new(ProgressBar::new(100));
                bar.set_style(
                    ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
                        .context("Invalid progress template")?
                        .progress_chars("#>-"),
                );
                bar.set_message("Fetching captions");

                let observer: Arc<dyn ProgressObserver> = bar.clone();
                let result = pipeline.transcribe_with_progress(&url, &language, observer).await;
                bar.finish_and_clear();
                result?
            };

            if result.is_fallback {
                eprintln!(
                    "{} No caption track found; showing a notice instead of a transcript",
                    style("!").yellow().bold()
                );
            }

            match output {
                Some(path) => {
                    output::save_to_file(&result, &path, &format)?;
                    println!("Transcription saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&result, &format)?;
                }
            }

            let duration = result.segments.last().map(|s| s.end).unwrap_or(0.0);
            if !cli.quiet {
                eprintln!(
                    "{} {} segments, {} of captions, language {}",
                    style("Done:").green().bold(),
                    result.segments.len(),
                    caption_transcriptor::utils::format_duration(duration),
                    result.language
                );
            }
        }
        Commands::Info { url, json } => {
            let pipeline = TranscriptionPipeline::new(config)?;
            let metadata = pipeline.metadata(&url).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                metadata.display();
            }
        }
        Commands::Serve { bind } => {
            server::serve(config, bind).await?;
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::user_config_path()
                    .context("Could not determine the user configuration directory")?;
                Config::default().save(&path)?;
                println!("Default configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Use --show to display the configuration or --init to create one");
            }
        }
        Commands::Platforms => {
            let pipeline = TranscriptionPipeline::new(config)?;
            println!("Supported platforms:");
            for (platform, shapes) in pipeline.registry().list_platforms() {
                println!("  • {} ({})", platform.display_name(), shapes.join(", "));
            }
        }
    }

    Ok(())
}
