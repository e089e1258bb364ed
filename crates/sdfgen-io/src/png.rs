use std::{fs::File, io::BufWriter, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use sdfgen_image::{Image, ImageSize};

use crate::error::IoError;

/// Read a PNG image with three channels (rgb8).
///
/// PNG stores rows top-down; the returned image follows the container
/// convention with row 0 at the bottom.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Rgb)?;
    Ok(Image::new(size, flipped_rows(&buf, size.width * 3))?)
}

/// Read a PNG image with four channels (rgba8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_png_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Rgba)?;
    Ok(Image::new(size, flipped_rows(&buf, size.width * 4))?)
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the pixel data to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let size = image.size();
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);

    let mut encoder = Encoder::new(writer, size.width as u32, size.height as u32);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    // back to the format's top-down row order
    writer
        .write_image_data(&flipped_rows(image.as_slice(), size.width * 3))
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(())
}

// reverse the row order of a packed pixel buffer
fn flipped_rows(data: &[u8], row_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for row in data.chunks_exact(row_len).rev() {
        out.extend_from_slice(row);
    }
    out
}

// utility function to read the png file
fn read_png_impl(
    file_path: impl AsRef<Path>,
    expected_color: ColorType,
) -> Result<(Vec<u8>, ImageSize), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if file_path
        .extension()
        .map_or(true, |ext| ext.to_ascii_lowercase() != "png")
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let mut reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != expected_color || info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "expected {expected_color:?} with 8-bit depth, got {:?} with {:?}",
            info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());

    Ok((
        buf,
        ImageSize {
            width: info.width as usize,
            height: info.height as usize,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_round_trip() -> Result<(), IoError> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("img.png");

        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            (0..36).collect(),
        )?;
        write_image_png_rgb8(&path, &image)?;

        let image_back = read_image_png_rgb8(&path)?;
        assert_eq!(image_back, image);
        Ok(())
    }

    #[test]
    fn rejects_missing_file() {
        let res = read_image_png_rgb8("no/such/file.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn rejects_wrong_extension() -> Result<(), IoError> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("img.bmp");
        std::fs::write(&path, [0u8; 8])?;

        let res = read_image_png_rgb8(&path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }
}
