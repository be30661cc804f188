// SPDX-License-Identifier: GPL-3.0-only

//! Bounded preview decoding
//!
//! The preview only has to fill the view it is shown in, so the captured file
//! is reduced by an integral factor derived from the view size. The header is
//! probed first so the factor is known without touching pixel data, and JPEG
//! captures are then decoded straight at reduced size.

use super::processing::PostProcessor;
use crate::errors::PhotoError;
use image::{ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// SOI marker followed by the start of the next marker
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Reductions the JPEG decoder's scaled IDCT produces directly
const JPEG_IDCT_SCALES: [u32; 3] = [8, 4, 2];

/// Decoded preview with the information needed to relate it to the original
#[derive(Clone)]
pub struct PreviewImage {
    /// Downsampled pixels, never shown with a filter baked in
    pub image: RgbaImage,
    /// Native width of the file
    pub source_width: u32,
    /// Native height of the file
    pub source_height: u32,
    /// Integral factor the file was actually reduced by
    pub sample_factor: u32,
}

impl std::fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewImage")
            .field("dimensions", &self.image.dimensions())
            .field("source_width", &self.source_width)
            .field("source_height", &self.source_height)
            .field("sample_factor", &self.sample_factor)
            .finish()
    }
}

/// Integral downsample factor for showing `native` in a `view`
///
/// `floor(min(native_w / view_w, native_h / view_h))`, at least 1. A zero
/// view dimension means "no bound" and yields 1.
pub fn sample_factor(native: (u32, u32), view: (u32, u32)) -> u32 {
    let (native_w, native_h) = native;
    let (view_w, view_h) = view;

    if view_w == 0 || view_h == 0 {
        return 1;
    }

    (native_w / view_w).min(native_h / view_h).max(1)
}

/// Read the image dimensions from the file header
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), PhotoError> {
    ImageReader::open(path)
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))?
        .into_dimensions()
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))
}

/// Reduce an image by averaging `factor x factor` blocks
///
/// Partial blocks at the right and bottom edges are dropped.
pub fn downsample(image: &RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image.clone();
    }

    let width = (image.width() / factor).max(1);
    let height = (image.height() / factor).max(1);
    let block_w = factor.min(image.width());
    let block_h = factor.min(image.height());
    // u64 sums: a block of 4096 x 4096 white pixels already exceeds u32
    let area = u64::from(block_w) * u64::from(block_h);

    RgbaImage::from_fn(width, height, |x, y| {
        let mut sum = [0u64; 4];
        for dy in 0..block_h {
            for dx in 0..block_w {
                let pixel = image.get_pixel(x * factor + dx, y * factor + dy);
                for (acc, value) in sum.iter_mut().zip(pixel.0) {
                    *acc += u64::from(value);
                }
            }
        }
        Rgba(sum.map(|acc| ((acc + area / 2) / area) as u8))
    })
}

/// Split `factor` into a JPEG IDCT scale and the box factor left over
///
/// A scale dividing `factor` keeps the reduction exact. Otherwise the largest
/// scale below `factor` is used and the rest is rounded down, which leaves
/// the preview at most twice the requested size on each axis.
pub fn split_factor(factor: u32) -> (u32, u32) {
    let scale = JPEG_IDCT_SCALES
        .into_iter()
        .find(|&scale| factor % scale == 0)
        .or_else(|| JPEG_IDCT_SCALES.into_iter().find(|&scale| scale <= factor))
        .unwrap_or(1);

    (scale, (factor / scale).max(1))
}

fn reduce(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        image
    } else {
        downsample(&image, factor)
    }
}

/// Decode a JPEG at reduced size through a scaled IDCT
///
/// The decoder never materialises the full-resolution bitmap; the part of
/// `factor` the IDCT cannot cover is box-averaged afterwards. Returns the
/// preview and the factor actually applied, or `Ok(None)` when the file is
/// not a JPEG.
fn decode_jpeg_reduced(
    path: &Path,
    source: (u32, u32),
    factor: u32,
) -> Result<Option<(RgbaImage, u32)>, PhotoError> {
    let failed = |e: &dyn std::fmt::Display| {
        PhotoError::DecodeFailed(format!("{}: {}", path.display(), e))
    };

    let mut reader = BufReader::new(File::open(path).map_err(|e| failed(&e))?);
    let mut signature = [0u8; 3];
    if reader.read_exact(&mut signature).is_err() || signature != JPEG_SIGNATURE {
        return Ok(None);
    }
    reader.rewind().map_err(|e| failed(&e))?;

    let (scale, rest) = split_factor(factor);
    let requested = (source.0.div_ceil(scale), source.1.div_ceil(scale));

    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let (width, height) = decoder
        .scale(
            u16::try_from(requested.0).unwrap_or(u16::MAX),
            u16::try_from(requested.1).unwrap_or(u16::MAX),
        )
        .map_err(|e| failed(&e))?;
    let pixels = decoder.decode().map_err(|e| failed(&e))?;
    let info = decoder.info().ok_or_else(|| failed(&"missing JPEG header"))?;

    debug!(scale, width, height, rest, "Scaled JPEG decode");

    let scaled = jpeg_to_rgba(u32::from(width), u32::from(height), info.pixel_format, &pixels)
        .ok_or_else(|| failed(&"unexpected JPEG pixel buffer size"))?;
    drop(pixels);

    Ok(Some((reduce(scaled, rest), scale * rest)))
}

/// Expand decoded JPEG samples to RGBA
fn jpeg_to_rgba(
    width: u32,
    height: u32,
    format: jpeg_decoder::PixelFormat,
    pixels: &[u8],
) -> Option<RgbaImage> {
    use jpeg_decoder::PixelFormat;

    let rgba: Vec<u8> = match format {
        PixelFormat::L8 => pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        // Big-endian samples, the high byte is enough for display
        PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l| [l[0], l[0], l[0], 255])
            .collect(),
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|p| {
                let k = 255 - u32::from(p[3]);
                let channel = |v: u8| ((255 - u32::from(v)) * k / 255) as u8;
                [channel(p[0]), channel(p[1]), channel(p[2]), 255]
            })
            .collect(),
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    RgbaImage::from_raw(width, height, rgba)
}

/// Decode at full size and reduce (formats without a scaled decoder)
fn decode_full_reduced(path: &Path, factor: u32) -> Result<(RgbaImage, u32), PhotoError> {
    let decoded = PostProcessor::decode_full(path)?;
    Ok((reduce(decoded, factor), factor))
}

/// Decode `path` for a view of `view` size (blocking)
///
/// JPEG files are decoded directly at reduced size. Other formats are
/// decoded once at full size and reduced immediately, only the reduced copy
/// is kept. Returns `None` when the file cannot be read or decoded.
pub fn decode_preview(path: &Path, view: (u32, u32)) -> Option<PreviewImage> {
    let (source_width, source_height) = match probe_dimensions(path) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            warn!(error = %e, "Cannot probe captured image");
            return None;
        }
    };

    let factor = sample_factor((source_width, source_height), view);
    debug!(
        source_width,
        source_height,
        view_width = view.0,
        view_height = view.1,
        factor,
        "Decoding preview"
    );

    let decoded = match decode_jpeg_reduced(path, (source_width, source_height), factor) {
        Ok(Some(reduced)) => Ok(reduced),
        Ok(None) => decode_full_reduced(path, factor),
        Err(e) => {
            warn!(error = %e, "Scaled JPEG decode failed, decoding at full size");
            decode_full_reduced(path, factor)
        }
    };

    let (image, applied) = match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(error = %e, "Cannot decode captured image");
            return None;
        }
    };

    info!(
        width = image.width(),
        height = image.height(),
        factor = applied,
        "Preview decoded"
    );

    Some(PreviewImage {
        image,
        source_width,
        source_height,
        sample_factor: applied,
    })
}

/// Decode a preview on a blocking worker
pub async fn load_preview(path: PathBuf, view: (u32, u32)) -> Option<PreviewImage> {
    match tokio::task::spawn_blocking(move || decode_preview(&path, view)).await {
        Ok(preview) => preview,
        Err(e) => {
            warn!(error = %e, "Preview task failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_sample_factor_uses_smaller_ratio() {
        assert_eq!(sample_factor((4000, 3000), (1000, 1000)), 3);
        assert_eq!(sample_factor((4000, 3000), (500, 1000)), 3);
        assert_eq!(sample_factor((4000, 3000), (1000, 500)), 4);
    }

    #[test]
    fn test_sample_factor_never_upsamples() {
        assert_eq!(sample_factor((100, 100), (1080, 1440)), 1);
        assert_eq!(sample_factor((100, 100), (0, 0)), 1);
        for native_w in [1u32, 7, 640, 4032] {
            for view_w in [1u32, 3, 320, 1080] {
                let factor = sample_factor((native_w, native_w), (view_w, view_w));
                assert!(factor >= 1);
                assert!(factor == 1 || factor <= native_w / view_w);
            }
        }
    }

    #[test]
    fn test_downsample_averages_blocks() {
        let mut image = RgbaImage::new(4, 2);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            let v = if x % 2 == 0 { 0 } else { 200 };
            *pixel = Rgba([v, v, v, 255]);
        }

        let reduced = downsample(&image, 2);
        assert_eq!(reduced.dimensions(), (2, 1));
        assert_eq!(reduced.get_pixel(0, 0), &Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_downsample_with_huge_factor() {
        let image = RgbaImage::from_pixel(4200, 4200, Rgba([255, 255, 255, 255]));
        let factor = sample_factor((4200, 4200), (1, 1));
        assert_eq!(factor, 4200);

        let reduced = downsample(&image, factor);
        assert_eq!(reduced.dimensions(), (1, 1));
        assert_eq!(reduced.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_split_factor() {
        assert_eq!(split_factor(1), (1, 1));
        assert_eq!(split_factor(2), (2, 1));
        assert_eq!(split_factor(3), (2, 1));
        assert_eq!(split_factor(6), (2, 3));
        assert_eq!(split_factor(8), (8, 1));
        assert_eq!(split_factor(12), (4, 3));
        assert_eq!(split_factor(17), (8, 2));
        assert_eq!(split_factor(4200), (8, 525));
    }

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 120, 40]))
            .save(path)
            .unwrap();
    }

    fn assert_close(pixel: &Rgba<u8>, expected: [u8; 3]) {
        for (actual, expected) in pixel.0.iter().zip(expected) {
            assert!(actual.abs_diff(expected) <= 4, "{:?} != {:?}", pixel, expected);
        }
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_jpeg_preview_decodes_at_idct_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        write_jpeg(&path, 64, 48);

        let preview = decode_preview(&path, (8, 6)).unwrap();
        assert_eq!(preview.sample_factor, 8);
        assert_eq!((preview.source_width, preview.source_height), (64, 48));
        assert_eq!(preview.image.dimensions(), (8, 6));
        assert_close(preview.image.get_pixel(4, 3), [200, 120, 40]);
    }

    #[test]
    fn test_jpeg_preview_box_averages_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        write_jpeg(&path, 64, 48);

        // factor 6 = IDCT 1/2, then 3 x 3 blocks of the 32 x 24 decode
        let preview = decode_preview(&path, (8, 8)).unwrap();
        assert_eq!(preview.sample_factor, 6);
        assert_eq!(preview.image.dimensions(), (10, 8));
        assert_close(preview.image.get_pixel(5, 4), [200, 120, 40]);
    }

    #[test]
    fn test_png_in_jpeg_named_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo_20250101_120000.jpg");
        let mut encoded = Vec::new();
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
            .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, encoded).unwrap();

        let preview = decode_preview(&path, (4, 4)).unwrap();
        assert_eq!(preview.sample_factor, 2);
        assert_eq!(preview.image.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_decode_preview_of_missing_file_is_none() {
        assert!(decode_preview(Path::new("/nonexistent/photo.jpg"), (10, 10)).is_none());
    }

    #[test]
    fn test_decode_preview_of_corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(decode_preview(&path, (10, 10)).is_none());
    }

    #[test]
    fn test_decode_preview_bounds_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        RgbaImage::from_pixel(64, 48, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let preview = decode_preview(&path, (16, 16)).unwrap();
        assert_eq!(preview.sample_factor, 3);
        assert_eq!((preview.source_width, preview.source_height), (64, 48));
        assert_eq!(preview.image.dimensions(), (21, 16));
        assert_eq!(preview.image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }
}
