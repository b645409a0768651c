//! Capacity command - report how much text an image can carry.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bordermark::config::Settings;
use bordermark::SEQUENCE_VERSION;

use super::{load_carrier, CommandExecutor};

/// Show the embedding capacity and border seed of an image.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the image
    #[arg(short, long)]
    pub input: PathBuf,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, _settings: &Settings) -> Result<()> {
        let carrier = load_carrier(&self.input)?;
        let capacity = carrier.capacity().context("Failed to compute capacity")?;
        let seed = carrier.seed().context("Failed to hash border")?;
        let (width, height) = carrier.dimensions();

        println!("Image: {}x{}{}", width, height, if carrier.has_alpha() { " (RGBA)" } else { "" });
        println!("Interior pixels: {}", capacity.interior_pixels);
        println!("Max message size: {} bytes", capacity.max_message_bytes);
        println!("Border seed: {seed}");
        println!("Sequence version: v{SEQUENCE_VERSION}");
        Ok(())
    }
}
