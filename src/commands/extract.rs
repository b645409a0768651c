//! Extract command - recover a hidden message from an image.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use bordermark::config::Settings;

use super::{load_carrier, CommandExecutor, Timing};

/// Extract a hidden message from a watermarked image.
///
/// Fails if the image was recompressed, resized, cropped, or if its border
/// was modified after embedding.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Path to the watermarked image
    #[arg(short, long)]
    pub input: PathBuf,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, _settings: &Settings) -> Result<()> {
        let total_start = Instant::now();
        let carrier = load_carrier(&self.input)?;

        let process_start = Instant::now();
        let message = carrier.extract().context("Failed to extract message")?;
        let timing = Timing {
            process: process_start.elapsed(),
            total: total_start.elapsed(),
        };

        info!(
            bytes = message.len(),
            process_ms = timing.process.as_secs_f64() * 1000.0,
            total_ms = timing.total.as_secs_f64() * 1000.0,
            "message extracted"
        );
        println!("Extracted message: {message}");
        println!("{timing}");
        Ok(())
    }
}
