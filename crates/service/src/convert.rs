//! WebP re-encoding of stored originals.
//!
//! The served artifact always lives next to the original with the same
//! base name and a `webp` extension, so the serving path can be derived
//! from metadata alone.

use std::io;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};

/// Output path for a stored original: same base name, webp extension.
pub fn webp_output_path(input: &Path) -> PathBuf {
    input.with_extension("webp")
}

/// Decode `input` and write it back out as WebP next to the original.
/// Overwrites any previous artifact for the same input, so reruns are
/// idempotent.
pub fn convert_to_webp(input: &Path) -> Result<PathBuf, ConvertError> {
    let output = webp_output_path(input);

    let decoded = ImageReader::open(input)?
        .with_guessed_format()?
        .decode()?;

    // the lossless webp encoder only takes 8-bit RGB/RGBA input
    let rgba = decoded.to_rgba8();
    rgba.save_with_format(&output, ImageFormat::WebP)?;

    Ok(output)
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unable to read the stored original: {0}")]
    Io(#[from] io::Error),

    #[error("image decode or encode failed: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_test_png(path: &Path) {
        RgbaImage::from_pixel(4, 4, Rgba([180, 40, 40, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_output_path_is_pure() {
        assert_eq!(
            webp_output_path(Path::new("/data/cat.png")),
            PathBuf::from("/data/cat.webp")
        );
        assert_eq!(
            webp_output_path(Path::new("/data/archive.tar.gz")),
            PathBuf::from("/data/archive.tar.webp")
        );
    }

    #[test]
    fn test_convert_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("cat.png");
        write_test_png(&input);

        let output = convert_to_webp(&input).unwrap();
        assert_eq!(output, temp.path().join("cat.webp"));

        let decoded = ImageReader::open(&output)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("cat.png");
        write_test_png(&input);

        let first = convert_to_webp(&input).unwrap();
        let first_bytes = std::fs::read(&first).unwrap();

        let second = convert_to_webp(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_bytes, std::fs::read(&second).unwrap());
    }

    #[test]
    fn test_corrupt_input_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("junk.png");
        std::fs::write(&input, b"not an image").unwrap();

        assert!(convert_to_webp(&input).is_err());
        assert!(!temp.path().join("junk.webp").exists());
    }

    #[test]
    fn test_missing_input_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            convert_to_webp(&temp.path().join("ghost.png")),
            Err(ConvertError::Io(_))
        ));
    }
}
