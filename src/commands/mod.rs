//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod embed;
mod extract;

pub use capacity::CapacityCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use bordermark::config::Settings;
use bordermark::Carrier;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, settings: &Settings) -> Result<()>;
}

/// Wall-clock timings of one embed or extract run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    /// Time spent in the codec call itself.
    pub process: Duration,
    /// Time for the whole command, including image I/O.
    pub total: Duration,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timing Information:")?;
        writeln!(f, "  Process execution time: {:.2} ms", millis(self.process))?;
        write!(f, "  Total execution time:   {:.2} ms", millis(self.total))
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Loads an input image, reporting a missing file before decoding.
fn load_carrier(path: &Path) -> Result<Carrier> {
    if !path.exists() {
        bail!("Input file '{}' does not exist", path.display());
    }
    Carrier::from_file(path).with_context(|| format!("Failed to read image {}", path.display()))
}
