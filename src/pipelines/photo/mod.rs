// SPDX-License-Identifier: MPL-2.0

//! Photo pipelines
//!
//! Two independent paths read the captured file:
//!
//! ```text
//! Working file ─┬─▶ Preview decode (downsampled) ─▶ display + live filter
//!               │
//!               └─▶ Full decode ─▶ Filter composite ─▶ Encoding ─▶ Media catalog
//! ```
//!
//! # Pipeline Stages (save path)
//!
//! 1. **Post-Processing**: decode at full resolution, bake the lighting filter in
//! 2. **Encoding**: convert to JPEG (quality 100 by default) or PNG
//! 3. **Catalog I/O**: insert into the shared Pictures collection and write the bytes
//!
//! Every stage runs on a blocking worker, so the caller stays responsive.

pub mod encoding;
pub mod preview;
pub mod processing;

pub use encoding::{EncodedImage, EncodingFormat, EncodingQuality, PhotoEncoder};
pub use preview::{PreviewImage, load_preview};
pub use processing::{PostProcessingConfig, PostProcessor, ProcessedImage};

use crate::errors::PhotoError;
use crate::storage::{MediaHandle, MediaStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Destructive save pipeline
///
/// Orchestrates the decode → filter → encode → store workflow.
pub struct PhotoPipeline {
    post_processor: PostProcessor,
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    /// Create a new photo pipeline with default settings (neutral filter, JPEG 100)
    pub fn new() -> Self {
        Self {
            post_processor: PostProcessor::new(PostProcessingConfig::default()),
            encoder: PhotoEncoder::new(),
        }
    }

    /// Create a new photo pipeline with custom settings
    pub fn with_config(
        processing_config: PostProcessingConfig,
        encoding_format: EncodingFormat,
        encoding_quality: EncodingQuality,
    ) -> Self {
        let mut encoder = PhotoEncoder::new();
        encoder.set_format(encoding_format);
        encoder.set_quality(encoding_quality);

        Self {
            post_processor: PostProcessor::new(processing_config),
            encoder,
        }
    }

    /// Render the original with the filter baked in and submit it to `store`
    ///
    /// The catalog entry is named after the original file, with the extension
    /// of the configured encoding format.
    pub async fn save_adjusted(
        &self,
        original: PathBuf,
        store: Arc<dyn MediaStore>,
    ) -> Result<MediaHandle, PhotoError> {
        let display_name = original
            .with_extension(self.encoder.format().extension())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PhotoError::SaveFailed(format!("{} has no file name", original.display()))
            })?;

        // Stage 1: Decode and composite (CPU-bound)
        let processed = self.post_processor.process_file(original).await?;

        // Stage 2: Encode (CPU-bound)
        let encoded = self.encoder.encode(processed).await?;

        // Stage 3: Submit to the catalog (I/O-bound)
        self.encoder.store(encoded, display_name, store).await
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new()
    }
}
