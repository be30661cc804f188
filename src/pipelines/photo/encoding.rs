// SPDX-License-Identifier: GPL-3.0-only

//! Async photo encoding
//!
//! This module handles encoding processed images:
//! - JPEG (with quality control)
//! - PNG (lossless)
//!
//! and submitting the encoded bytes to the shared media catalog. All
//! operations run on blocking workers.

use super::processing::ProcessedImage;
use crate::constants::media;
use crate::errors::PhotoError;
use crate::storage::{MediaHandle, MediaMetadata, MediaStore};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingFormat {
    /// JPEG format (lossy compression)
    #[default]
    Jpeg,
    /// PNG format (lossless compression)
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }

    /// MIME type reported to the media catalog
    pub fn mime_type(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => media::MIME_JPEG,
            EncodingFormat::Png => media::MIME_PNG,
        }
    }
}

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    High,
    /// No quality reduction
    #[default]
    Maximum,
}

impl EncodingQuality {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 100,
        }
    }
}

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: EncodingFormat,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: EncodingQuality,
}

impl PhotoEncoder {
    /// Create a new encoder with JPEG format and maximum quality
    pub fn new() -> Self {
        Self {
            format: EncodingFormat::Jpeg,
            quality: EncodingQuality::Maximum,
        }
    }

    /// Set encoding format
    pub fn set_format(&mut self, format: EncodingFormat) {
        self.format = format;
    }

    /// Set encoding quality (only affects JPEG)
    pub fn set_quality(&mut self, quality: EncodingQuality) {
        self.quality = quality;
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    /// Encode a processed image on a blocking worker
    pub async fn encode(&self, processed: ProcessedImage) -> Result<EncodedImage, PhotoError> {
        info!(
            width = processed.width,
            height = processed.height,
            format = ?self.format,
            "Starting encoding"
        );

        let format = self.format;
        let quality = self.quality;

        tokio::task::spawn_blocking(move || Self::encode_blocking(processed, format, quality))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Encode synchronously
    pub fn encode_blocking(
        processed: ProcessedImage,
        format: EncodingFormat,
        quality: EncodingQuality,
    ) -> Result<EncodedImage, PhotoError> {
        let data = match format {
            EncodingFormat::Jpeg => Self::encode_jpeg(&processed.image, quality)?,
            EncodingFormat::Png => Self::encode_png(&processed.image)?,
        };

        debug!(size = data.len(), "Encoding complete");

        Ok(EncodedImage {
            data,
            format,
            width: processed.width,
            height: processed.height,
        })
    }

    /// Submit encoded bytes to the media catalog
    ///
    /// Inserts an entry named `display_name` in the Pictures collection and
    /// writes the bytes through the stream opened for it.
    pub async fn store(
        &self,
        encoded: EncodedImage,
        display_name: String,
        store: Arc<dyn MediaStore>,
    ) -> Result<MediaHandle, PhotoError> {
        let metadata = MediaMetadata {
            display_name,
            mime_type: encoded.format.mime_type().to_string(),
            relative_path: Some(media::PICTURES_RELATIVE_PATH.to_string()),
        };

        info!(
            name = %metadata.display_name,
            mime = %metadata.mime_type,
            width = encoded.width,
            height = encoded.height,
            size = encoded.data.len(),
            "Saving photo"
        );

        let handle = tokio::task::spawn_blocking(move || {
            let handle = store.insert(&metadata)?;
            let mut writer = store.open_writer(&handle)?;
            writer
                .write_all(&encoded.data)
                .and_then(|_| writer.flush())
                .map_err(|e| PhotoError::SaveFailed(format!("{}: {}", handle, e)))?;
            Ok::<_, PhotoError>(handle)
        })
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("Save task error: {}", e)))??;

        info!(location = %handle, "Photo saved successfully");
        Ok(handle)
    }

    /// Encode image as JPEG
    fn encode_jpeg(image: &RgbImage, quality: EncodingQuality) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    /// Encode image as PNG
    fn encode_png(image: &RgbImage) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();

        image
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(width: u32, height: u32) -> ProcessedImage {
        ProcessedImage {
            image: RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150])),
            width,
            height,
        }
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(EncodingFormat::Jpeg.extension(), "jpg");
        assert_eq!(EncodingFormat::Png.extension(), "png");
        assert_eq!(EncodingFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_jpeg_quality_values() {
        assert_eq!(EncodingQuality::Low.jpeg_quality(), 60);
        assert_eq!(EncodingQuality::Medium.jpeg_quality(), 80);
        assert_eq!(EncodingQuality::High.jpeg_quality(), 92);
        assert_eq!(EncodingQuality::Maximum.jpeg_quality(), 100);
        assert_eq!(EncodingQuality::default(), EncodingQuality::Maximum);
    }

    #[test]
    fn test_encode_jpeg_is_decodable() {
        let encoded = PhotoEncoder::encode_blocking(
            processed(16, 8),
            EncodingFormat::Jpeg,
            EncodingQuality::Maximum,
        )
        .unwrap();

        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let encoded =
            PhotoEncoder::encode_blocking(processed(3, 3), EncodingFormat::Png, EncodingQuality::Low)
                .unwrap();
        let decoded = image::load_from_memory(&encoded.data).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(1, 1).0, [90, 120, 150]);
    }
}
