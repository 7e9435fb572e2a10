//! xlsxbatch command-line front end
//!
//! Usage:
//!     xlsxbatch <ROOT> [--check-divisible] [--convert-time] [--suffix S]... [--config FILE]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xlsxbatch::{BatchError, BatchProcessorBuilder, ProcessingConfig, TracingSink};

#[derive(Parser, Debug)]
#[command(
    name = "xlsxbatch",
    version,
    about = "Validate and annotate StartTime columns in every workbook under a folder"
)]
struct Args {
    /// Root folder to scan recursively for .xlsx files
    root: PathBuf,

    /// Append `{column}_is_divisible_by_40` columns and prefix failing outputs with FALSE_
    #[arg(long)]
    check_divisible: bool,

    /// Append `{column}_time_format` columns (milliseconds as HH:MM:SS:mmm)
    #[arg(long)]
    convert_time: bool,

    /// Output name suffix (repeatable, up to 10)
    #[arg(long = "suffix", value_name = "SUFFIX")]
    suffixes: Vec<String>,

    /// JSON run configuration; command-line flags take precedence
    #[arg(long, env = "XLSXBATCH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "xlsxbatch=debug"
    } else {
        "xlsxbatch=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // フォルダが無効な場合のエラーは走査側でログ出力済み
            if !e.is_run_fatal() {
                tracing::error!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), BatchError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProcessingConfig::default(),
    };

    let mut builder = BatchProcessorBuilder::from_config(config);
    if args.check_divisible {
        builder = builder.check_divisible(true);
    }
    if args.convert_time {
        builder = builder.convert_time(true);
    }
    if !args.suffixes.is_empty() {
        builder = builder.with_custom_suffixes(&args.suffixes);
    }
    let processor = builder.build()?;
    tracing::debug!(config = ?processor.config(), "configuration resolved");

    processor.run(&args.root, &TracingSink)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<ProcessingConfig, BatchError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        BatchError::Config(format!("Invalid config file {}: {}", path.display(), e))
    })
}
