// SPDX-License-Identifier: MPL-2.0

//! Camera facility abstraction
//!
//! A camera facility is an external collaborator that takes a photo and
//! stores it at a destination chosen by the caller. Whether it succeeded is
//! the only thing it reports back; the caller decides where files live.

pub mod command;
pub mod file_import;

pub use command::CommandCamera;
pub use file_import::FileImportCamera;

use futures::future::BoxFuture;
use std::path::{Path, PathBuf};

/// External photo capture capability
pub trait CameraFacility: Send + Sync {
    /// Take a photo and write it to `destination`
    ///
    /// Resolves to `true` only when a photo was written. Failure and
    /// cancellation both resolve to `false`.
    fn request_capture(&self, destination: PathBuf) -> BoxFuture<'static, bool>;

    /// Human readable name for logs
    fn name(&self) -> &str;
}

/// True when `path` exists and holds at least one byte
pub(crate) async fn wrote_something(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
