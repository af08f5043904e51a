use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use extractors::FieldExtractionPipeline;
use shared_types::{CaptionSource, EventRecord, RecordField, RecordSink, SourceContext};

mod config;
mod source;
mod store;

use crate::config::AppConfig;
use crate::source::{CaptionFile, ManualCaption, PostPageFile};
use crate::store::CsvSheetStore;

#[derive(Parser, Debug)]
#[command(name = "eventcap", author, version, about = "Extract event details from post captions")]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one event record from a caption
    Extract(ExtractArgs),
    /// Print the resolved configuration
    ShowConfig,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["caption", "caption_file", "page_file"]),
))]
struct ExtractArgs {
    /// URL of the post the caption belongs to
    #[arg(long)]
    url: String,

    /// Account that authored the post
    #[arg(long)]
    owner: Option<String>,

    /// Caption text, entered by hand
    #[arg(long)]
    caption: Option<String>,

    /// Plain-text file holding the caption
    #[arg(long, value_name = "PATH")]
    caption_file: Option<PathBuf>,

    /// Saved post page to read the caption from
    #[arg(long, value_name = "PATH")]
    page_file: Option<PathBuf>,

    /// Year for dates written without one (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Append the record to the configured sheet
    #[arg(long)]
    save: bool,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file_path.as_deref());

    let (config, config_path) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load eventcap config")?;
    tracing::debug!("Loaded config from {:?}", config_path);

    match cli.command {
        Command::Extract(args) => run_extract(&config, args),
        Command::ShowConfig => {
            println!("# {}", config_path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_extract(config: &AppConfig, args: ExtractArgs) -> Result<()> {
    let source: Box<dyn CaptionSource> = match (args.caption, args.caption_file, args.page_file) {
        (Some(text), None, None) => Box::new(ManualCaption { text }),
        (None, Some(path), None) => Box::new(CaptionFile { path }),
        (None, None, Some(path)) => Box::new(PostPageFile::new(path)),
        _ => unreachable!("clap enforces exactly one input"),
    };

    let Some(fetched) = source.fetch(&args.url) else {
        tracing::warn!("No caption available for {}", args.url);
        anyhow::bail!(
            "No caption found for {}; pass the caption text with --caption instead",
            args.url
        );
    };

    let mut context = SourceContext::new(args.url.clone());
    if let Some(owner) = args.owner.or(fetched.owner_handle) {
        context = context.with_owner(owner);
    }

    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
    let pipeline = build_pipeline(config, year)?;
    let record = pipeline.process(&fetched.caption, &context);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }

    if args.save {
        let store = CsvSheetStore::new(&config.store.directory, &config.store.sheet_name);
        store.append(&record)?;
        tracing::info!("Appended record to {} ({:?})", store.range(), store.path());
    }

    Ok(())
}

fn build_pipeline(config: &AppConfig, year: i32) -> Result<FieldExtractionPipeline> {
    let mut pipeline = FieldExtractionPipeline::new(year, &config.extraction.policy());

    for (field, rule) in config.extraction.disabled_rules()? {
        pipeline
            .disable_rule(field, &rule)
            .with_context(|| format!("Cannot disable {}.{}", field.key(), rule))?;
    }

    Ok(pipeline)
}

fn print_record(record: &EventRecord) {
    let width = RecordField::ALL
        .iter()
        .map(|field| field.header().len())
        .max()
        .unwrap_or(0);

    for field in RecordField::ALL {
        println!("{:width$}  {}", field.header(), record.get(field), width = width);
    }
}

fn init_tracing(log_file_path: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(log_path) = log_file_path else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    };

    let log_path = std::path::Path::new(log_path);
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("eventcap.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_requires_one_input() {
        let missing = Cli::try_parse_from(["eventcap", "extract", "--url", "https://x.test/p/1"]);
        assert!(missing.is_err());

        let both = Cli::try_parse_from([
            "eventcap",
            "extract",
            "--url",
            "https://x.test/p/1",
            "--caption",
            "a",
            "--caption-file",
            "b.txt",
        ]);
        assert!(both.is_err());

        let ok = Cli::try_parse_from([
            "eventcap",
            "extract",
            "--url",
            "https://x.test/p/1",
            "--caption",
            "event on 5 dec",
            "--year",
            "2025",
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_build_pipeline_applies_disabled_rules() {
        let mut config = AppConfig::default();
        config.extraction.disabled_rules = vec!["title.label-line".to_string()];

        let pipeline = build_pipeline(&config, 2025).unwrap();
        let record = pipeline.process(
            "Tema: Kopi Pagi\n**Bold**",
            &SourceContext::new("https://x.test/p/1"),
        );
        assert_eq!(record.title(), "Bold");
    }

    #[test]
    fn test_build_pipeline_rejects_unknown_rule() {
        let mut config = AppConfig::default();
        config.extraction.disabled_rules = vec!["title.no-such-rule".to_string()];

        assert!(build_pipeline(&config, 2025).is_err());
    }
}
