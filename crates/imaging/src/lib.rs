//! Screenshot post-processing: Gaussian blur + JPEG re-encode.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use tracing::info;

use pagesnap_core::SnapError;

/// Blur `input` and write it as a JPEG at `output`. Pure transform: any
/// decode or encode failure stops the caller's pipeline.
pub fn blur_to_jpeg(
    input: &Path,
    output: &Path,
    sigma: f32,
    quality: u8,
) -> Result<(), SnapError> {
    let img = image::open(input)
        .map_err(|e| SnapError::Image(format!("{}: {}", input.display(), e)))?;
    let blurred = img.blur(sigma);

    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    blurred
        .write_with_encoder(encoder)
        .map_err(|e| SnapError::Image(format!("{}: {}", output.display(), e)))?;

    info!(path = %output.display(), "blurred image written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn checkerboard(dir: &Path) -> std::path::PathBuf {
        let img = RgbImage::from_fn(64, 48, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        });
        let path = dir.join("input.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_blur_produces_decodable_jpeg_with_same_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = checkerboard(dir.path());
        let output = dir.path().join("blurred.jpg");

        blur_to_jpeg(&input, &output, 15.0, 80).unwrap();

        let result = image::open(&output).unwrap();
        assert_eq!(result.dimensions(), (64, 48));
    }

    #[test]
    fn test_blur_softens_hard_edges() {
        let dir = tempfile::tempdir().unwrap();
        let input = checkerboard(dir.path());
        let output = dir.path().join("blurred.jpg");

        blur_to_jpeg(&input, &output, 15.0, 80).unwrap();

        // A strong blur pulls the checkerboard toward uniform gray, so no
        // pixel stays near pure black or pure white.
        let result = image::open(&output).unwrap().to_rgb8();
        for pixel in result.pixels() {
            assert!(pixel.0[0] > 40 && pixel.0[0] < 215);
        }
    }

    #[test]
    fn test_missing_input_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = blur_to_jpeg(
            &dir.path().join("nope.png"),
            &dir.path().join("out.jpg"),
            15.0,
            80,
        )
        .unwrap_err();
        assert!(matches!(err, SnapError::Image(_)));
    }
}
