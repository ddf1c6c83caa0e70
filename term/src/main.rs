use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use pairs_core::TileCount;

use crate::config::{Overrides, Settings};

mod app;
mod config;
mod input;
mod render;
mod terminal;

/// Find every pair of tiles before you run out of mistakes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// TOML file with default settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the board layout, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// How long all tiles are shown at the start
    #[arg(long, value_name = "MS")]
    preview_ms: Option<u64>,

    /// How long a mismatched pair stays visible
    #[arg(long, value_name = "MS")]
    mismatch_delay_ms: Option<u64>,

    /// Mistakes allowed before the game is lost
    #[arg(long)]
    mistakes: Option<TileCount>,

    /// Skip the start preview
    #[arg(long)]
    no_preview: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            preview_ms: self.preview_ms,
            mismatch_delay_ms: self.mismatch_delay_ms,
            mistakes: self.mistakes,
            no_preview: self.no_preview,
        }
    }
}

fn init_logger(cli: &Cli) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.verbose.log_level_filter());
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("initialising logger")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(&cli)?;
    log::info!("Application started");

    let settings = Settings::load(cli.config.as_deref(), &cli.overrides())?;
    log::debug!("{:?}", settings);

    if let Some(summary) = app::run(&settings)? {
        println!("{summary}");
    }
    Ok(())
}
