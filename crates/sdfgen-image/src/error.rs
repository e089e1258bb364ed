/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image shape.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when one of the image dimensions is zero.
    #[error("Image dimensions must be non-zero, got {0}x{1}")]
    ZeroSizedImage(usize, usize),

    /// Error when a pixel coordinate falls outside the image bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for a {2}x{3} image")]
    PixelOutOfBounds(usize, usize, usize, usize),
}
