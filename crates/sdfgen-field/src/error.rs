use crate::parallel::ParallelError;
use sdfgen_image::ImageError;

/// An error type for the distance field module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SdfError {
    /// Error when the output image is larger than the source image.
    #[error("Output size ({0}x{1}) exceeds the source size ({2}x{3})")]
    OutputExceedsSource(usize, usize, usize, usize),

    /// Error when an output axis is too small for the coordinate mapping.
    #[error("Output dimensions must be at least 2x2, got {0}x{1}")]
    DegenerateOutputSize(usize, usize),

    /// Error when the search ratio is not a positive number.
    #[error("Search ratio must be a positive number, got {0}")]
    InvalidRatio(f32),

    /// Error when writing to the output sink fails.
    #[error("Failed to write to the output sink. {0}")]
    Sink(#[from] ImageError),

    /// Error when the pixel loop fails to execute.
    #[error("Failed to execute the pixel loop. {0}")]
    Parallel(#[from] ParallelError),
}
