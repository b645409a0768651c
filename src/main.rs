//! bordermark - hide text in images, keyed by the image's own border.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use bordermark::config::Settings;
use commands::{CapacityCommand, CommandExecutor, EmbedCommand, ExtractCommand};

/// Border-hash based text watermarking
///
/// Hides a message in the blue-channel LSBs of pseudo-randomly chosen interior
/// pixels. The pixel order is derived from a SHA-256 hash of the image border,
/// so no key is needed to extract it. Images must be kept in a lossless format.
#[derive(Parser)]
#[command(name = "bordermark")]
#[command(version)]
#[command(about = "Border-hash based text watermarking for images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: ~/.bordermark/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a text message into an image
    Embed(EmbedCommand),

    /// Extract a hidden message from an image
    Extract(ExtractCommand),

    /// Show how much text an image can carry
    Capacity(CapacityCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_logging(cli.verbose, &settings)?;

    let command: &dyn CommandExecutor = match &cli.command {
        Commands::Embed(cmd) => cmd,
        Commands::Extract(cmd) => cmd,
        Commands::Capacity(cmd) => cmd,
    };
    command.execute(&settings)
}

/// Installs the stderr subscriber.
///
/// `RUST_LOG` takes precedence, then `--verbose`, then the settings file.
fn init_logging(verbose: bool, settings: &Settings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = if verbose { "debug" } else { settings.log_level.as_str() };
            EnvFilter::try_new(directive)
                .with_context(|| format!("Invalid log level '{directive}'"))?
        }
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}
