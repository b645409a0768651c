//! Border hashing: derives the watermark seed from the image's outer ring.
//!
//! The border is walked clockwise starting at the top-left corner, and every
//! border pixel is visited exactly once:
//!
//! 1. top row, left to right (`x = 0..width`, `y = 0`)
//! 2. right column, top to bottom (`x = width-1`, `y = 1..height`)
//! 3. bottom row, right to left (`x = width-2..=0`, `y = height-1`)
//! 4. left column, bottom to top (`x = 0`, `y = height-2..=1`)
//!
//! Each visited pixel contributes all of its channel bytes in storage order
//! (R, G, B, then A for RGBA images). The SHA-256 digest of that byte stream
//! is the [`Seed`]. Changing the walk order or the channel order changes every
//! seed, so both are frozen.

use std::fmt;

use sha2::{Digest, Sha256};

use super::error::{Result, WatermarkError};
use super::grid::{Coordinate, PixelGrid};

/// Seed length in bytes.
pub const SEED_LEN: usize = 32;

/// 256-bit digest of an image border, used to key the pixel sequencer.
///
/// Not secret: anyone holding the image can recompute it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fails with [`WatermarkError::InvalidGeometry`] unless both sides are >= 3.
pub fn check_geometry(width: u32, height: u32) -> Result<()> {
    if width < 3 || height < 3 {
        return Err(WatermarkError::InvalidGeometry { width, height });
    }
    Ok(())
}

/// Returns the border coordinates in hashing order.
///
/// The list has `2 * width + 2 * height - 4` entries.
pub fn border_pixels(width: u32, height: u32) -> Result<Vec<Coordinate>> {
    check_geometry(width, height)?;

    let (last_x, last_y) = (width - 1, height - 1);
    let mut ring = Vec::with_capacity(2 * (width as usize + height as usize) - 4);

    ring.extend((0..width).map(|x| Coordinate::new(0, x)));
    ring.extend((1..height).map(|y| Coordinate::new(y, last_x)));
    ring.extend((0..last_x).rev().map(|x| Coordinate::new(last_y, x)));
    ring.extend((1..last_y).rev().map(|y| Coordinate::new(y, 0)));

    Ok(ring)
}

/// Computes the seed of an image from its border pixels.
///
/// The image is only read. Fails with [`WatermarkError::InvalidGeometry`]
/// for images smaller than 3×3.
pub fn border_hash<G: PixelGrid + ?Sized>(image: &G) -> Result<Seed> {
    let (width, height) = image.dimensions();

    let mut hasher = Sha256::new();
    for at in border_pixels(width, height)? {
        hasher.update(image.channels(at));
    }

    Ok(Seed(hasher.finalize().into()))
}
