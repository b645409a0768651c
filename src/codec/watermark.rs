//! Embedding and extraction drivers.
//!
//! Both directions run the same pipeline: hash the border, key the
//! sequencer with the seed, then walk the coordinate sequence writing or
//! reading the least significant bit of the blue channel. The border is
//! never written, so the extractor recomputes the exact seed the embedder
//! used.
//!
//! The image must travel between embed and extract in a lossless format.
//! Any recompression, resize or crop destroys the watermark.

use tracing::debug;

use super::bits::{self, HEADER_BITS, MAX_MESSAGE_BYTES};
use super::border::{border_hash, Seed};
use super::error::{Result, WatermarkError};
use super::grid::PixelGrid;
use super::sequence::{interior_size, PixelSequencer};

/// Outcome of a successful [`embed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedSummary {
    /// Seed derived from the border.
    pub seed: Seed,
    /// Message length in UTF-8 bytes.
    pub message_bytes: usize,
    /// Payload bits written (excluding the header).
    pub payload_bits: usize,
    /// Header and payload bits written.
    pub total_bits: usize,
}

/// Embedding capacity of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Pixels strictly inside the border.
    pub interior_pixels: u64,
    /// Longest message, in UTF-8 bytes, that fits.
    pub max_message_bytes: usize,
}

/// Hides `message` in `image`, in place.
///
/// Capacity is checked before any pixel is written: on error the image is
/// left untouched.
///
/// # Errors
/// - [`WatermarkError::InvalidGeometry`] if the image is smaller than 3×3.
/// - [`WatermarkError::MessageTooLarge`] above 65535 UTF-8 bytes.
/// - [`WatermarkError::InsufficientCapacity`] if the interior is too small.
pub fn embed<G: PixelGrid + ?Sized>(image: &mut G, message: &str) -> Result<EmbedSummary> {
    let (width, height) = image.dimensions();
    let seed = border_hash(image)?;
    let stream = bits::encode(message)?;

    let mut sequencer = PixelSequencer::new(&seed, width, height)?;
    let coords = sequencer.take_coords(stream.len() as u64)?;

    debug!(
        seed = %seed,
        width,
        height,
        bits = stream.len(),
        interior = sequencer.interior_size(),
        "embedding watermark"
    );

    for (at, bit) in coords.into_iter().zip(&stream) {
        let blue = image.blue(at);
        image.set_blue(at, (blue & 0xFE) | bit);
    }

    Ok(EmbedSummary {
        seed,
        message_bytes: message.len(),
        payload_bits: stream.len() - HEADER_BITS,
        total_bits: stream.len(),
    })
}

/// Recovers the message hidden in `image`.
///
/// # Errors
/// - [`WatermarkError::InvalidGeometry`] if the image is smaller than 3×3.
/// - [`WatermarkError::InsufficientCapacity`] if the interior cannot hold the
///   header, or the declared length overruns the interior.
/// - [`WatermarkError::InvalidEncoding`] if the payload is not UTF-8.
pub fn extract<G: PixelGrid + ?Sized>(image: &G) -> Result<String> {
    let (width, height) = image.dimensions();
    let seed = border_hash(image)?;
    let mut sequencer = PixelSequencer::new(&seed, width, height)?;

    let mut stream: Vec<u8> = sequencer
        .take_coords(HEADER_BITS as u64)?
        .into_iter()
        .map(|at| image.blue(at) & 1)
        .collect();

    let len = bits::declared_len(&stream)?;
    let payload_bits = 8 * len as u64;

    debug!(
        seed = %seed,
        declared_bytes = len,
        remaining = sequencer.remaining(),
        "extracting watermark"
    );

    let available = sequencer.remaining();
    if payload_bits > available {
        return Err(WatermarkError::InsufficientCapacity {
            needed: payload_bits,
            available,
        });
    }

    stream.extend(
        sequencer
            .take_coords(payload_bits)?
            .into_iter()
            .map(|at| image.blue(at) & 1),
    );

    bits::decode(&stream)
}

/// Reports how much text `image` can carry.
///
/// Fails with [`WatermarkError::InvalidGeometry`] for images smaller than 3×3.
pub fn capacity<G: PixelGrid + ?Sized>(image: &G) -> Result<Capacity> {
    let (width, height) = image.dimensions();
    super::border::check_geometry(width, height)?;

    let interior_pixels = interior_size(width, height);
    let payload_bits = interior_pixels.saturating_sub(HEADER_BITS as u64);
    let max_message_bytes = usize::try_from(payload_bits / 8)
        .unwrap_or(usize::MAX)
        .min(MAX_MESSAGE_BYTES);

    Ok(Capacity {
        interior_pixels,
        max_message_bytes,
    })
}
