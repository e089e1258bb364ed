use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use sdfgen_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored row-major in a flat buffer with `CHANNELS`
/// interleaved values per pixel. Row 0 is the **bottom** row of the image:
/// `(0, 0)` is the bottom-left corner and coordinates increase up and to the
/// right. This matches the row order of uncompressed bottom-up bitmap files,
/// so decoded buffers map onto the container without reshuffling.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, row-major, bottom row first.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, or one
    /// of the dimensions is zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdfgen_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::ZeroSizedImage(size.width, size.height));
        }

        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Errors
    ///
    /// If one of the dimensions is zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdfgen_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u8,
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The pixel data as a flat slice, row-major, bottom row first.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixel data as a mutable flat slice, row-major, bottom row first.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the underlying pixel buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The channel values of the pixel at `(x, y)`, or `None` if out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdfgen_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new(
    ///     ImageSize { width: 2, height: 2 },
    ///     vec![1, 2, 3, 4],
    /// ).unwrap();
    ///
    /// // row 0 is the bottom row
    /// assert_eq!(image.get(0, 0), Some([1].as_slice()));
    /// assert_eq!(image.get(1, 1), Some([4].as_slice()));
    /// assert_eq!(image.get(2, 0), None);
    /// ```
    pub fn get(&self, x: usize, y: usize) -> Option<&[T]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y * self.size.width + x) * CHANNELS;
        Some(&self.data[idx..idx + CHANNELS])
    }

    /// The channel values of the pixel at `(x, y)` as a mutable slice, or
    /// `None` if out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut [T]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y * self.size.width + x) * CHANNELS;
        Some(&mut self.data[idx..idx + CHANNELS])
    }
}
