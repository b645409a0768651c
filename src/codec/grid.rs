//! Pixel access seam between the codec and in-memory images.
//!
//! The codec never decodes or encodes files. It works on anything that
//! implements [`PixelGrid`], which is provided for 8-bit RGB and RGBA
//! [`ImageBuffer`]s from the `image` crate.

use std::ops::{Deref, DerefMut};

use image::{ImageBuffer, Pixel, Rgb, Rgba};

/// Index of the blue channel inside an RGB/RGBA pixel.
pub const BLUE_CHANNEL: usize = 2;

/// A pixel position as `(row, col)`, i.e. `(y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Row (y), counted from the top.
    pub row: u32,
    /// Column (x), counted from the left.
    pub col: u32,
}

impl Coordinate {
    /// Creates a coordinate from a row and a column.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A mutable 2D grid of pixels with at least red, green and blue channels.
pub trait PixelGrid {
    /// Returns `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Returns all channel bytes of one pixel in storage order.
    fn channels(&self, at: Coordinate) -> &[u8];

    /// Overwrites the blue channel of one pixel.
    fn set_blue(&mut self, at: Coordinate, value: u8);

    /// Returns the blue channel of one pixel.
    fn blue(&self, at: Coordinate) -> u8 {
        self.channels(at)[BLUE_CHANNEL]
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for image::Rgb<u8> {}
    impl Sealed for image::Rgba<u8> {}
}

/// 8-bit pixel types that carry a blue channel at [`BLUE_CHANNEL`].
pub trait ColorPixel: Pixel<Subpixel = u8> + sealed::Sealed {}

impl ColorPixel for Rgb<u8> {}
impl ColorPixel for Rgba<u8> {}

impl<P, C> PixelGrid for ImageBuffer<P, C>
where
    P: ColorPixel,
    C: Deref<Target = [P::Subpixel]> + DerefMut,
{
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn channels(&self, at: Coordinate) -> &[u8] {
        self.get_pixel(at.col, at.row).channels()
    }

    fn set_blue(&mut self, at: Coordinate, value: u8) {
        self.get_pixel_mut(at.col, at.row).channels_mut()[BLUE_CHANNEL] = value;
    }
}
