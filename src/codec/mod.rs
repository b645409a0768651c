//! Border-hash watermark codec.
//!
//! - [`border`]: SHA-256 seed from the image border
//! - [`sequence`]: ChaCha20-driven selection of interior pixels
//! - [`bits`]: length-prefixed message bitstream
//! - [`watermark`]: embed/extract drivers
//! - [`grid`]: pixel access trait implemented for `image` buffers

pub mod bits;
pub mod border;
pub mod error;
pub mod grid;
pub mod sequence;
pub mod watermark;

pub use border::{border_hash, border_pixels, Seed};
pub use error::WatermarkError;
pub use grid::{Coordinate, PixelGrid};
pub use sequence::{interior_size, PixelSequencer, SEQUENCE_VERSION};
pub use watermark::{capacity, embed, extract, Capacity, EmbedSummary};
