use std::{fs, path::Path};

use sdfgen_image::{Image, ImageSize};

use crate::error::IoError;

const HEADER_LEN: usize = 18;

// uncompressed true-color image
const IMAGE_TYPE_TRUE_COLOR: u8 = 2;

// descriptor bit 5: rows are stored top-to-bottom
const DESCRIPTOR_TOP_ORIGIN: u8 = 0x20;

// descriptor bit 4: pixels are stored right-to-left
const DESCRIPTOR_RIGHT_ORIGIN: u8 = 0x10;

/// Read an uncompressed true-color TGA image as rgb8.
///
/// Accepts both 24 and 32 bits per pixel; the alpha channel of 32-bit files
/// is dropped. Rows are returned bottom-up regardless of the origin bit in
/// the file descriptor, matching the container convention.
///
/// # Arguments
///
/// * `file_path` - The path to the TGA file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_tga_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let raw = read_tga_impl(file_path)?;
    let mut buf = Vec::with_capacity(raw.size.width * raw.size.height * 3);
    for pixel in raw.data.chunks_exact(raw.bytes_per_pixel) {
        // file stores BGR(A)
        buf.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
    }
    Ok(Image::new(raw.size, buf)?)
}

/// Read an uncompressed true-color 32-bit TGA image as rgba8.
///
/// # Arguments
///
/// * `file_path` - The path to the TGA file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_tga_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let raw = read_tga_impl(file_path)?;
    if raw.bytes_per_pixel != 4 {
        return Err(IoError::TgaDecodeError(format!(
            "expected 32 bits per pixel, got {}",
            raw.bytes_per_pixel * 8
        )));
    }
    let mut buf = Vec::with_capacity(raw.size.width * raw.size.height * 4);
    for pixel in raw.data.chunks_exact(4) {
        buf.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
    }
    Ok(Image::new(raw.size, buf)?)
}

/// Write an image as an uncompressed 24-bit true-color TGA file.
///
/// Rows are written bottom-up with a zero descriptor, the format's native
/// orientation.
///
/// # Arguments
///
/// * `file_path` - The path to the TGA file.
/// * `image` - The image containing the pixel data to write.
pub fn write_image_tga_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let size = image.size();
    if size.width > u16::MAX as usize || size.height > u16::MAX as usize {
        return Err(IoError::TgaEncodeError(format!(
            "image size {}x{} exceeds the format limit of 65535",
            size.width, size.height
        )));
    }

    let mut out = Vec::with_capacity(HEADER_LEN + size.width * size.height * 3);
    out.extend_from_slice(&[0, 0, IMAGE_TYPE_TRUE_COLOR, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(size.width as u16).to_le_bytes());
    out.extend_from_slice(&(size.height as u16).to_le_bytes());
    out.extend_from_slice(&[24, 0]);

    for pixel in image.as_slice().chunks_exact(3) {
        out.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
    }

    fs::write(file_path, out)?;

    Ok(())
}

struct RawTga {
    size: ImageSize,
    bytes_per_pixel: usize,
    // bottom-up BGR(A) pixel data
    data: Vec<u8>,
}

// utility function to read and validate the tga file
fn read_tga_impl(file_path: impl AsRef<Path>) -> Result<RawTga, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if file_path
        .extension()
        .map_or(true, |ext| ext.to_ascii_lowercase() != "tga")
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    if bytes.len() < HEADER_LEN {
        return Err(IoError::TgaDecodeError(format!(
            "file is too short to hold a header ({} bytes)",
            bytes.len()
        )));
    }

    let id_length = bytes[0] as usize;
    let color_map_type = bytes[1];
    let image_type = bytes[2];
    let width = u16::from_le_bytes([bytes[12], bytes[13]]) as usize;
    let height = u16::from_le_bytes([bytes[14], bytes[15]]) as usize;
    let bits_per_pixel = bytes[16];
    let descriptor = bytes[17];

    if color_map_type != 0 {
        return Err(IoError::TgaDecodeError(format!(
            "color-mapped files are not supported (color map type {color_map_type})"
        )));
    }
    if image_type != IMAGE_TYPE_TRUE_COLOR {
        return Err(IoError::TgaDecodeError(format!(
            "only uncompressed true-color files are supported (image type {image_type})"
        )));
    }
    let bytes_per_pixel = match bits_per_pixel {
        24 => 3,
        32 => 4,
        other => {
            return Err(IoError::TgaDecodeError(format!(
                "unsupported pixel depth {other}"
            )))
        }
    };
    if descriptor & DESCRIPTOR_RIGHT_ORIGIN != 0 {
        return Err(IoError::TgaDecodeError(
            "right-to-left pixel order is not supported".to_string(),
        ));
    }

    let row_len = width * bytes_per_pixel;
    let data_start = HEADER_LEN + id_length;
    let data_len = row_len * height;
    if bytes.len() < data_start + data_len {
        return Err(IoError::TgaDecodeError(format!(
            "pixel data is truncated ({} of {} bytes)",
            bytes.len().saturating_sub(data_start),
            data_len
        )));
    }

    let pixels = &bytes[data_start..data_start + data_len];
    let data = if descriptor & DESCRIPTOR_TOP_ORIGIN != 0 {
        // stored top-down, flip into the bottom-up container order
        let mut flipped = Vec::with_capacity(data_len);
        for row in pixels.chunks_exact(row_len).rev() {
            flipped.extend_from_slice(row);
        }
        flipped
    } else {
        pixels.to_vec()
    };

    Ok(RawTga {
        size: ImageSize { width, height },
        bytes_per_pixel,
        data,
    })
}
