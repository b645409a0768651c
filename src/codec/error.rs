//! Error types for the watermark codec.

use thiserror::Error;

/// Errors that can occur while embedding or extracting a watermark.
///
/// Every variant is deterministic: retrying the same call on the same image
/// yields the same error.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// The image has no interior (it is smaller than 3×3).
    #[error("Image is {width}x{height}; at least 3x3 is required to have an interior")]
    InvalidGeometry {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The interior has fewer pixels than the bitstream needs.
    #[error("Image too small for the message: need {needed} interior pixels, have {available}")]
    InsufficientCapacity {
        /// Bits (interior pixels) required.
        needed: u64,
        /// Interior pixels still available.
        available: u64,
    },

    /// The UTF-8 message does not fit the 16-bit length header.
    #[error("Message is {len} bytes; the maximum is 65535")]
    MessageTooLarge {
        /// Message length in UTF-8 bytes.
        len: usize,
    },

    /// The bitstream ended before the declared payload did.
    #[error("Bitstream truncated: need {needed} bits, have {available}")]
    MalformedBitstream {
        /// Bits required by the header.
        needed: usize,
        /// Bits actually present.
        available: usize,
    },

    /// The payload bytes are not valid UTF-8.
    #[error("Extracted bytes are not valid UTF-8 (wrong image or corrupted watermark)")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, WatermarkError>;
