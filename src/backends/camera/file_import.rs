// SPDX-License-Identifier: GPL-3.0-only

//! Capture by importing an existing image file
//!
//! Stands in for a physical camera: "taking" a photo copies a source image to
//! the requested destination. Used by the command line front-end and tests.

use super::{CameraFacility, wrote_something};
use crate::constants::file_formats;
use crate::errors::CameraError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Camera facility that copies a fixed source image
#[derive(Debug, Clone)]
pub struct FileImportCamera {
    source: PathBuf,
}

impl FileImportCamera {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Copy `source` to `destination`
    pub async fn import(source: &Path, destination: &Path) -> Result<u64, CameraError> {
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !file_formats::is_image_extension(&extension) {
            return Err(CameraError::UnsupportedSource(source.display().to_string()));
        }

        if !tokio::fs::try_exists(source).await.unwrap_or(false) {
            return Err(CameraError::SourceNotFound(source.display().to_string()));
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = tokio::fs::copy(source, destination).await?;
        debug!(bytes, destination = %destination.display(), "Source copied");

        if !wrote_something(destination).await {
            return Err(CameraError::NothingWritten(destination.display().to_string()));
        }

        Ok(bytes)
    }
}

impl CameraFacility for FileImportCamera {
    fn request_capture(&self, destination: PathBuf) -> BoxFuture<'static, bool> {
        let source = self.source.clone();

        async move {
            match Self::import(&source, &destination).await {
                Ok(bytes) => {
                    info!(
                        source = %source.display(),
                        destination = %destination.display(),
                        bytes,
                        "Photo imported"
                    );
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Import capture failed");
                    false
                }
            }
        }
        .boxed()
    }

    fn name(&self) -> &str {
        "file import"
    }
}
