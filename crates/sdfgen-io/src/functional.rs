use std::path::Path;

use sdfgen_image::Image;

use crate::error::IoError;
use crate::{png, tga};

/// Reads an image from the given file path as rgb8.
///
/// The format is selected by the file extension; `tga` and `png` are
/// supported.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data, rows bottom-up.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    match extension_of(file_path).as_deref() {
        Some("tga") => tga::read_image_tga_rgb8(file_path),
        Some("png") => png::read_image_png_rgb8(file_path),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Writes an rgb8 image to the given file path.
///
/// The format is selected by the file extension; `tga` and `png` are
/// supported.
///
/// # Arguments
///
/// * `file_path` - The path to write the image to.
/// * `image` - The image containing the pixel data to write.
pub fn write_image_any_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    match extension_of(file_path).as_deref() {
        Some("tga") => tga::write_image_tga_rgb8(file_path, image),
        Some("png") => png::write_image_png_rgb8(file_path, image),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

fn extension_of(file_path: &Path) -> Option<String> {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfgen_image::ImageSize;

    #[test]
    fn dispatch_round_trip() -> Result<(), IoError> {
        let tmp = tempfile::tempdir()?;

        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            (0..12).collect(),
        )?;

        for name in ["img.tga", "img.png", "upper.TGA"] {
            let path = tmp.path().join(name);
            write_image_any_rgb8(&path, &image)?;
            let image_back = read_image_any_rgb8(&path)?;
            assert_eq!(image_back, image, "round trip through {name}");
        }
        Ok(())
    }

    #[test]
    fn rejects_unknown_extension() -> Result<(), IoError> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("img.webp");
        std::fs::write(&path, [0u8; 8])?;

        assert!(matches!(
            read_image_any_rgb8(&path),
            Err(IoError::InvalidFileExtension(_))
        ));

        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0; 12],
        )?;
        assert!(matches!(
            write_image_any_rgb8(&path, &image),
            Err(IoError::InvalidFileExtension(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_missing_file() {
        let res = read_image_any_rgb8("no/such/file.tga");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
