//! Replace `<<KEY>>` placeholders in the sketch with values from the .env
//! file, writing a new sketch instead of modifying the original.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use sketch_tools::config::{Config, ProjectLayout};
use sketch_tools::sketch;

/// Fill sketch placeholders from the project's .env file
#[derive(Parser)]
#[command(name = "apply-env")]
#[command(version)]
#[command(about = "Replace <<KEY>> placeholders in the sketch with values from a .env file")]
struct Cli {
    /// Project root containing python/.env and sketch/sketch.ino
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file overriding the layout (default: <root>/sketch-tools.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::discover(&cli.root, cli.config.as_deref())
        .context("Failed to load configuration")?;
    let layout = ProjectLayout::resolve(&cli.root, &config.layout);

    let applied = sketch::apply(&layout)?;

    println!(
        "{} Processed sketch written to '{}'.",
        "[OK]".green().bold(),
        applied.output_path.display()
    );

    Ok(())
}
