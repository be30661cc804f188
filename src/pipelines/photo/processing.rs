// SPDX-License-Identifier: MPL-2.0

//! Async post-processing for saved photos
//!
//! The original capture is decoded at full resolution and composited through
//! the lighting filter into a new buffer. The result is converted to RGB for
//! encoding (JPEG has no alpha channel).

use crate::color::LightingFilter;
use crate::errors::PhotoError;
use image::{ImageReader, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Post-processing configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessingConfig {
    /// Lighting filter baked into the saved pixels
    pub filter: LightingFilter,
}

/// Processed image data
pub struct ProcessedImage {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

/// Post-processor for captured photos
pub struct PostProcessor {
    config: PostProcessingConfig,
}

impl PostProcessor {
    /// Create a new post-processor with the given configuration
    pub fn new(config: PostProcessingConfig) -> Self {
        Self { config }
    }

    /// Decode `original` at full resolution and bake the filter in
    ///
    /// Decoding and compositing run on a blocking worker.
    pub async fn process_file(&self, original: PathBuf) -> Result<ProcessedImage, PhotoError> {
        let config = self.config;

        tokio::task::spawn_blocking(move || {
            let source = Self::decode_full(&original)?;
            Ok(Self::process_blocking(&source, &config))
        })
        .await
        .map_err(|e| PhotoError::ProcessingFailed(format!("Post-processing task error: {}", e)))?
    }

    /// Decode a file at its native resolution
    ///
    /// The format is sniffed from the content, camera tools do not always
    /// honour the extension of the destination they were given.
    pub fn decode_full(path: &Path) -> Result<RgbaImage, PhotoError> {
        let failed = |e: &dyn std::fmt::Display| {
            PhotoError::DecodeFailed(format!("{}: {}", path.display(), e))
        };
        let decoded = ImageReader::open(path)
            .map_err(|e| failed(&e))?
            .with_guessed_format()
            .map_err(|e| failed(&e))?
            .decode()
            .map_err(|e| failed(&e))?;
        Ok(decoded.to_rgba8())
    }

    /// Composite `source` through the filter into a new buffer
    pub fn process_blocking(source: &RgbaImage, config: &PostProcessingConfig) -> ProcessedImage {
        let (width, height) = source.dimensions();
        info!(width, height, filter = ?config.filter, "Starting post-processing");

        let composited = config.filter.composite(source);
        let image = Self::convert_rgba_to_rgb(&composited);

        debug!("Post-processing complete");
        ProcessedImage {
            image,
            width,
            height,
        }
    }

    /// Convert RGBA to RGB (drop alpha channel)
    fn convert_rgba_to_rgb(rgba: &RgbaImage) -> RgbImage {
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            image::Rgb([r, g, b])
        })
    }
}
