//! Embed command - hide a text message in an image.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{debug, info};

use bordermark::carrier::{output_format, OutputPolicy};
use bordermark::config::Settings;
use bordermark::Carrier;

use super::{load_carrier, CommandExecutor, Timing};

/// Embed a text message into an image.
///
/// The output must be a lossless format (PNG, BMP, TIFF, TGA, PNM, QOI)
/// unless `allow_lossy_output` is set in the settings file.
/// The watermark does not survive JPEG recompression, resizing or cropping,
/// and any change to the border pixels makes it unrecoverable.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Path to the input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to save the watermarked image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Text message to embed (reads from stdin if not provided)
    #[arg(short, long)]
    pub message: Option<String>,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let total_start = Instant::now();
        let policy = OutputPolicy::from_allow_lossy(settings.allow_lossy_output);

        // Fail on a lossy destination before doing any work.
        output_format(&self.output, policy)
            .with_context(|| format!("Cannot write {}", self.output.display()))?;

        let mut carrier = load_carrier(&self.input)?;
        let message = self.resolve_message()?;

        let process_start = Instant::now();
        let summary = carrier
            .embed(&message)
            .context("Failed to embed message")?;
        let process = process_start.elapsed();

        carrier
            .save_with_policy(&self.output, policy)
            .with_context(|| format!("Failed to save image to {}", self.output.display()))?;

        let timing = Timing {
            process,
            total: total_start.elapsed(),
        };
        info!(
            seed = %summary.seed,
            bits = summary.total_bits,
            process_ms = timing.process.as_secs_f64() * 1000.0,
            total_ms = timing.total.as_secs_f64() * 1000.0,
            "message embedded"
        );

        if settings.verify_after_embed {
            self.verify(&message)?;
        }

        println!("Success: Message embedded into '{}'", self.output.display());
        println!(
            "Message length: {} characters ({} bits)",
            message.chars().count(),
            summary.payload_bits
        );
        println!("{timing}");
        Ok(())
    }
}

impl EmbedCommand {
    fn resolve_message(&self) -> Result<String> {
        if let Some(m) = &self.message {
            return Ok(m.clone());
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            eprintln!("Reading message from stdin (Ctrl+D to finish):");
        }
        let mut buffer = String::new();
        stdin
            .lock()
            .read_to_string(&mut buffer)
            .context("Failed to read message from stdin")?;
        Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Reloads the written file and checks the message comes back intact.
    fn verify(&self, message: &str) -> Result<()> {
        let written = Carrier::from_file(&self.output)
            .with_context(|| format!("Failed to reload {}", self.output.display()))?;
        let recovered = written
            .extract()
            .context("Verification failed: written image does not carry the message")?;

        if recovered != message {
            bail!("Verification failed: written image carries a different message");
        }
        debug!(path = %self.output.display(), "watermark verified");
        Ok(())
    }
}
