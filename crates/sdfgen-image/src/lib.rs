#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image container types.
pub mod image;

/// Error types for the image module.
pub mod error;

/// pixel classification and the source/sink capability traits.
pub mod pixel;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::pixel::{PixelClass, PixelSink, PixelSource};
