//! The `thumbgen run` command.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use thumbgen_core::{Config, RunReport, ThumbGenerator, WalkOutcome};

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory to scan for images (defaults to the configured working directory)
    pub working_dir: Option<PathBuf>,

    /// Directory receiving thumbnails (defaults to <WORKING_DIR>/thumbs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only thumbnail files directly inside the working directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Thumbnail width as a percentage of the original
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Thumbnail height as a percentage of the original (defaults to --width)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Image stamped onto every thumbnail
    #[arg(long)]
    pub watermark: Option<PathBuf>,

    /// Watermark offset from the right edge (centered when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub margin_right: Option<i64>,

    /// Watermark offset from the bottom edge (centered when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub margin_bottom: Option<i64>,

    /// Write the run log to a timestamped file
    #[arg(long)]
    pub dump_log: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Report printed with `--json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a WalkOutcome,
    log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_file: Option<PathBuf>,
}

/// Fold command-line overrides into the loaded configuration.
pub fn apply_overrides(mut config: Config, args: &RunArgs) -> anyhow::Result<Config> {
    if let Some(dir) = &args.working_dir {
        config.directories.working_dir = dir.clone();
    }
    if let Some(dir) = &args.output {
        config.directories.output_dir = dir.clone();
    }
    if args.no_recursive {
        config.traversal.recursive = false;
    }
    if let Some(width) = args.width {
        config.resize.width_percent = width;
        config.resize.height_percent = args.height;
    } else if let Some(height) = args.height {
        config.resize.height_percent = Some(height);
    }
    if let Some(path) = &args.watermark {
        config.watermark.path = Some(path.clone());
    }
    if args.margin_right.is_some() {
        config.watermark.margin_right = args.margin_right;
    }
    if args.margin_bottom.is_some() {
        config.watermark.margin_bottom = args.margin_bottom;
    }
    if args.dump_log {
        config.logging.dump = true;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the run command.
pub async fn execute(args: RunArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;
    let generator = ThumbGenerator::from_config(&config);
    tracing::info!(
        "Thumbnailing {:?} into {:?}",
        generator.working_dir(),
        generator.output_dir()
    );

    let report = tokio::task::spawn_blocking(move || generator.run()).await??;

    let log_file = if config.logging.dump {
        let dir = config.dump_dir();
        std::fs::create_dir_all(&dir)?;
        let path = report.log.dump(&dir)?;
        tracing::info!("Run log written to {}", path.display());
        Some(path)
    } else {
        None
    };

    if args.json {
        print_json(&report, log_file)?;
    } else {
        print_human(&report);
    }
    Ok(())
}

fn print_json(report: &RunReport, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let json = JsonReport {
        outcome: &report.outcome,
        log: report.log.lines(),
        log_file,
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_human(report: &RunReport) {
    for line in report.log.lines() {
        println!("{line}");
    }
    match &report.outcome {
        WalkOutcome::Completed(summary) => println!(
            "{} thumbnail(s) written, {} file(s) skipped, {} director{} scanned",
            summary.processed,
            summary.skipped,
            summary.directories,
            if summary.directories == 1 { "y" } else { "ies" }
        ),
        WalkOutcome::Refused => {
            println!("Working and output directory are the same, nothing to do")
        }
    }
}
