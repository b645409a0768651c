//! # bordermark - border-hash text watermarking
//!
//! Hides a text message in the pixels of an image so it can be recovered
//! later without any shared key: the image's own border seeds the choice of
//! carrier pixels.
//!
//! ## How it works
//!
//! 1. The outermost ring of pixels is hashed with SHA-256 into a 32-byte seed.
//! 2. The seed keys a ChaCha20 generator that drives a lazy Fisher-Yates
//!    shuffle of the interior pixels.
//! 3. The message becomes a bitstream: a 16-bit big-endian byte count, then
//!    the UTF-8 bytes, most significant bit first.
//! 4. Each bit overwrites the least significant bit of the blue channel of
//!    the next pixel in the sequence.
//!
//! Extraction repeats steps 1 and 2 on the watermarked image (the border is
//! never written), reads the header, then the payload.
//!
//! ## Limits
//!
//! - No encryption: anyone with this tool can read the message.
//! - No robustness: lossy recompression, resizing, cropping, or any change to
//!   the border destroys the message. Store watermarked images losslessly.
//! - No error correction.
//!
//! ## Example
//!
//! ```rust
//! use bordermark::{embed, extract};
//! use image::{ImageBuffer, Rgb, RgbImage};
//!
//! let mut img: RgbImage = ImageBuffer::from_fn(64, 64, |x, y| {
//!     Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
//! });
//!
//! embed(&mut img, "hello").unwrap();
//! assert_eq!(extract(&img).unwrap(), "hello");
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: border hash, pixel sequencer, bitstream, embed/extract
//! - [`carrier`]: image file loading and lossless saving
//! - [`config`]: settings file

pub mod carrier;
pub mod codec;
pub mod config;

pub use carrier::{Carrier, CarrierError};
pub use codec::{
    border_hash, capacity, embed, extract, Capacity, Coordinate, EmbedSummary, PixelGrid,
    PixelSequencer, Seed, WatermarkError, SEQUENCE_VERSION,
};
