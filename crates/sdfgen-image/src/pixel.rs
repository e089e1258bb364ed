use num_traits::Zero;

use crate::error::ImageError;
use crate::image::Image;

/// Binary classification of a pixel.
///
/// A pixel is [`PixelClass::Background`] when every channel is exactly zero
/// and [`PixelClass::Foreground`] otherwise. This is the boundary predicate
/// the distance field search runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelClass {
    /// The pixel belongs to the shape (any non-zero channel).
    Foreground,
    /// The pixel is empty (all channels exactly zero).
    Background,
}

/// Read-only access to a classified pixel grid.
///
/// Coordinates follow the container convention: `(0, 0)` is the bottom-left
/// corner, `x` increases to the right and `y` increases upwards.
pub trait PixelSource {
    /// The width of the grid in pixels.
    fn width(&self) -> usize;

    /// The height of the grid in pixels.
    fn height(&self) -> usize;

    /// The binary classification of the pixel at `(x, y)`.
    ///
    /// Callers must pass in-bounds coordinates; implementations are free to
    /// panic otherwise.
    fn classify(&self, x: usize, y: usize) -> PixelClass;
}

/// Write access to an 8-bit grayscale pixel grid.
pub trait PixelSink {
    /// The width of the grid in pixels.
    fn width(&self) -> usize;

    /// The height of the grid in pixels.
    fn height(&self) -> usize;

    /// Write a gray intensity to the pixel at `(x, y)`.
    ///
    /// Out-of-range coordinates are rejected with a recoverable error and
    /// nothing is written.
    fn set_gray(&mut self, x: usize, y: usize, value: u8) -> Result<(), ImageError>;
}

impl<T, const CHANNELS: usize> PixelSource for Image<T, CHANNELS>
where
    T: Zero + PartialEq,
{
    fn width(&self) -> usize {
        self.size().width
    }

    fn height(&self) -> usize {
        self.size().height
    }

    fn classify(&self, x: usize, y: usize) -> PixelClass {
        let idx = (y * self.size().width + x) * CHANNELS;
        let pixel = &self.as_slice()[idx..idx + CHANNELS];
        if pixel.iter().all(|c| *c == T::zero()) {
            PixelClass::Background
        } else {
            PixelClass::Foreground
        }
    }
}

impl PixelSink for Image<u8, 3> {
    fn width(&self) -> usize {
        self.size().width
    }

    fn height(&self) -> usize {
        self.size().height
    }

    fn set_gray(&mut self, x: usize, y: usize, value: u8) -> Result<(), ImageError> {
        let size = self.size();
        match self.get_mut(x, y) {
            Some(pixel) => {
                pixel.fill(value);
                Ok(())
            }
            None => {
                log::warn!(
                    "rejected out-of-range write at ({}, {}) on a {}x{} sink",
                    x,
                    y,
                    size.width,
                    size.height
                );
                Err(ImageError::PixelOutOfBounds(
                    x,
                    y,
                    size.width,
                    size.height,
                ))
            }
        }
    }
}
