//! Image file I/O around the watermark codec.
//!
//! Decodes any format the `image` crate reads into an 8-bit RGB grid (RGBA
//! when the source has an alpha channel), and writes watermarked grids back
//! out in lossless formats only. Images with 16-bit channels are reduced to
//! 8 bits on load.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::{self, Capacity, EmbedSummary, PixelGrid, Seed, WatermarkError};

/// Output formats that preserve every pixel bit.
pub const LOSSLESS_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Tga,
    ImageFormat::Pnm,
    ImageFormat::Qoi,
];

/// Errors that can occur while loading, watermarking or saving a carrier.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Image load error: {0}")]
    Load(String),

    #[error("Image save error: {0}")]
    Save(String),

    #[error("Cannot determine image format for {0}")]
    UnsupportedFormat(String),

    #[error("{format} is lossy and would destroy the watermark; use PNG, BMP, TIFF, TGA, PNM or QOI")]
    LossyFormat { format: String },

    #[error(transparent)]
    Watermark(#[from] WatermarkError),
}

#[derive(Debug, Clone, PartialEq)]
enum Pixels {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

/// An image held in memory as a watermarkable pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    pixels: Pixels,
}

impl Carrier {
    /// Loads a carrier from an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CarrierError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| CarrierError::Load(e.to_string()))?;
        debug!(path = %path.display(), color = ?image.color(), "loaded carrier");
        Ok(Self::from_image(image))
    }

    /// Loads a carrier from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CarrierError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| CarrierError::Load(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Wraps a decoded image, keeping alpha when present.
    pub fn from_image(image: DynamicImage) -> Self {
        let pixels = if image.color().has_alpha() {
            Pixels::Rgba(image.to_rgba8())
        } else {
            Pixels::Rgb(image.to_rgb8())
        };
        Self { pixels }
    }

    /// Returns `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.grid().dimensions()
    }

    /// Returns true if the carrier keeps an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self.pixels, Pixels::Rgba(_))
    }

    /// Computes the border seed.
    pub fn seed(&self) -> Result<Seed, CarrierError> {
        Ok(codec::border_hash(self.grid())?)
    }

    /// Reports the embedding capacity.
    pub fn capacity(&self) -> Result<Capacity, CarrierError> {
        Ok(codec::capacity(self.grid())?)
    }

    /// Hides `message` in the carrier's pixels.
    pub fn embed(&mut self, message: &str) -> Result<EmbedSummary, CarrierError> {
        Ok(codec::embed(self.grid_mut(), message)?)
    }

    /// Recovers the hidden message.
    pub fn extract(&self) -> Result<String, CarrierError> {
        Ok(codec::extract(self.grid())?)
    }

    /// Saves the carrier, inferring the format from the file extension.
    ///
    /// Refuses lossy formats such as JPEG, since they would destroy the
    /// watermark.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CarrierError> {
        self.save_with_policy(path, OutputPolicy::LosslessOnly)
    }

    /// Saves the carrier under an explicit output policy.
    ///
    /// With [`OutputPolicy::AllowLossy`], JPEG and other lossy formats are
    /// written (alpha is dropped when the format has none), and the
    /// watermark will most likely not survive.
    pub fn save_with_policy<P: AsRef<Path>>(
        &self,
        path: P,
        policy: OutputPolicy,
    ) -> Result<(), CarrierError> {
        let path = path.as_ref();
        let format = output_format(path, policy)?;

        let result = match &self.pixels {
            Pixels::Rgb(img) => img.save_with_format(path, format),
            Pixels::Rgba(img) if format == ImageFormat::Jpeg => {
                DynamicImage::ImageRgba8(img.clone())
                    .to_rgb8()
                    .save_with_format(path, format)
            }
            Pixels::Rgba(img) => img.save_with_format(path, format),
        };
        result.map_err(|e| CarrierError::Save(e.to_string()))?;

        debug!(path = %path.display(), ?format, "saved carrier");
        Ok(())
    }

    /// Returns the carrier encoded as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, CarrierError> {
        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        let result = match &self.pixels {
            Pixels::Rgb(img) => img.write_to(&mut cursor, ImageFormat::Png),
            Pixels::Rgba(img) => img.write_to(&mut cursor, ImageFormat::Png),
        };
        result.map_err(|e| CarrierError::Save(e.to_string()))?;
        Ok(bytes)
    }

    /// Consumes the carrier and returns a `DynamicImage`.
    pub fn into_image(self) -> DynamicImage {
        match self.pixels {
            Pixels::Rgb(img) => DynamicImage::ImageRgb8(img),
            Pixels::Rgba(img) => DynamicImage::ImageRgba8(img),
        }
    }

    fn grid(&self) -> &dyn PixelGrid {
        match &self.pixels {
            Pixels::Rgb(img) => img,
            Pixels::Rgba(img) => img,
        }
    }

    fn grid_mut(&mut self) -> &mut dyn PixelGrid {
        match &mut self.pixels {
            Pixels::Rgb(img) => img,
            Pixels::Rgba(img) => img,
        }
    }
}

/// Whether [`Carrier::save_with_policy`] may write lossy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputPolicy {
    /// Only formats in [`LOSSLESS_FORMATS`].
    #[default]
    LosslessOnly,
    /// Any format the `image` crate can encode.
    AllowLossy,
}

impl OutputPolicy {
    /// Maps the `allow_lossy_output` setting to a policy.
    pub fn from_allow_lossy(allow_lossy: bool) -> Self {
        if allow_lossy {
            Self::AllowLossy
        } else {
            Self::LosslessOnly
        }
    }
}

/// Resolves the output format of `path` under `policy`.
///
/// Lossy formats are rejected with [`CarrierError::LossyFormat`] unless the
/// policy is [`OutputPolicy::AllowLossy`].
pub fn output_format(path: &Path, policy: OutputPolicy) -> Result<ImageFormat, CarrierError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| CarrierError::UnsupportedFormat(path.display().to_string()))?;

    if !LOSSLESS_FORMATS.contains(&format) {
        if policy == OutputPolicy::LosslessOnly {
            return Err(CarrierError::LossyFormat {
                format: format!("{format:?}"),
            });
        }
        warn!(?format, "writing a lossy format; the watermark will likely be lost");
    }
    Ok(format)
}
