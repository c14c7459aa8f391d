//! thumbgen CLI - write thumbnail copies of every image in a directory tree.
//!
//! Images are scaled by a percentage, rotated to match their EXIF
//! orientation, optionally watermarked, and written in their original format
//! into an output tree that mirrors the source tree.
//!
//! # Usage
//!
//! ```bash
//! # Thumbnail ./photos into ./photos/thumbs at 50%
//! thumbgen run ./photos
//!
//! # Quarter width, third height, no subdirectories, with a watermark
//! thumbgen run ./photos -o ./thumbs --width 25 --height 33 --no-recursive \
//!     --watermark ./stamp.png
//!
//! # View configuration
//! thumbgen config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// thumbgen - write resized, watermarked thumbnail copies of a directory tree.
#[derive(Parser, Debug)]
#[command(name = "thumbgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "THUMBGEN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate thumbnails for a working directory
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let loaded = match &cli.config {
        Some(path) => thumbgen_core::Config::load_from(path),
        None => thumbgen_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `thumbgen config path`."
            );
            thumbgen_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("thumbgen v{}", thumbgen_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config).await,
    }
}
