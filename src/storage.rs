// SPDX-License-Identifier: MPL-2.0

//! Storage for working captures and the shared media catalog
//!
//! Captures are first written to a private working directory under a
//! timestamped name. Finished photos are submitted to a [`MediaStore`], which
//! hands out a content handle per inserted entry and a writer for its bytes.

use crate::constants::{APP_DIR_NAME, capture};
use crate::errors::StorageError;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on captures named within the same second
const MAX_CAPTURES_PER_SECOND: u32 = 1000;

/// Private directory for working captures (`<data dir>/photo-express/Pictures`)
pub fn private_picture_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(capture::PRIVATE_PICTURES_DIR)
}

/// Capture filename for a timestamp (`photo_yyyyMMdd_HHmmss.jpg`)
pub fn capture_file_name(timestamp: &DateTime<Local>) -> String {
    format!(
        "{}{}.{}",
        capture::FILE_PREFIX,
        timestamp.format(capture::TIMESTAMP_FORMAT),
        capture::FILE_EXTENSION
    )
}

/// Capture filename for the `attempt`-th capture within the same second
///
/// The first attempt uses the plain name, later ones get a `_<n>` suffix
/// (`photo_yyyyMMdd_HHmmss_1.jpg`).
fn numbered_capture_file_name(timestamp: &DateTime<Local>, attempt: u32) -> String {
    if attempt == 0 {
        return capture_file_name(timestamp);
    }
    format!(
        "{}{}_{}.{}",
        capture::FILE_PREFIX,
        timestamp.format(capture::TIMESTAMP_FORMAT),
        attempt,
        capture::FILE_EXTENSION
    )
}

/// Reserve a new destination for a capture in `dir`
///
/// An empty file is created so no later capture can be handed the same
/// path. The camera facility writes the photo over it.
pub fn create_image_file(dir: &Path) -> Result<PathBuf, StorageError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| StorageError::DirectoryUnavailable(format!("{}: {}", dir.display(), e)))?;

    let timestamp = Local::now();
    for attempt in 0..MAX_CAPTURES_PER_SECOND {
        let path = dir.join(numbered_capture_file_name(&timestamp, attempt));

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!(path = %path.display(), "Reserved capture destination");
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(StorageError::DirectoryUnavailable(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    Err(StorageError::DirectoryUnavailable(format!(
        "no free capture name in {}",
        dir.display()
    )))
}

/// Remove an abandoned capture destination the camera never wrote to
pub fn discard_unused_destination(path: &Path) {
    let empty = std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() == 0)
        .unwrap_or(false);

    if empty {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Removed unused capture destination"),
            Err(e) => debug!(path = %path.display(), error = %e, "Cannot remove capture destination"),
        }
    }
}

/// Metadata submitted with a new catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    /// Filename shown to the user
    pub display_name: String,
    /// MIME type of the content
    pub mime_type: String,
    /// Collection hint relative to the catalog root (e.g. `Pictures`)
    pub relative_path: Option<String>,
}

/// Handle to an inserted catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaHandle {
    /// Location of the entry's content
    pub location: PathBuf,
}

impl std::fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location.display())
    }
}

/// Shared media catalog
pub trait MediaStore: Send + Sync {
    /// Create a new entry described by `metadata`
    fn insert(&self, metadata: &MediaMetadata) -> Result<MediaHandle, StorageError>;

    /// Open a writer for the content of an inserted entry
    fn open_writer(&self, handle: &MediaHandle) -> Result<Box<dyn Write + Send>, StorageError>;
}

/// Media catalog backed by a directory tree
///
/// The relative path hint selects a sub-directory of the root. Display names
/// that already exist get a ` (n)` suffix before the extension.
#[derive(Debug, Clone)]
pub struct DirectoryMediaStore {
    root: PathBuf,
}

impl DirectoryMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Catalog rooted at the user's home directory
    pub fn user_default() -> Self {
        Self::new(dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, metadata: &MediaMetadata) -> PathBuf {
        match &metadata.relative_path {
            Some(relative) => self.root.join(relative),
            None => self.root.clone(),
        }
    }

    /// Create a new empty file for `name` in `dir`, de-duplicating the name
    fn reserve(dir: &Path, name: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(name);
        let stem = candidate
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let extension = candidate
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        for attempt in 0u32.. {
            let file_name = if attempt == 0 {
                format!("{}{}", stem, extension)
            } else {
                format!("{} ({}){}", stem, attempt, extension)
            };
            let path = dir.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::InsertFailed(format!("{}: {}", path.display(), e)));
                }
            }
        }

        Err(StorageError::InsertFailed(format!(
            "no free name for {} in {}",
            name,
            dir.display()
        )))
    }
}

impl MediaStore for DirectoryMediaStore {
    fn insert(&self, metadata: &MediaMetadata) -> Result<MediaHandle, StorageError> {
        if metadata.display_name.is_empty() {
            return Err(StorageError::InsertFailed("empty display name".to_string()));
        }

        let dir = self.collection_dir(metadata);
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::InsertFailed(format!("{}: {}", dir.display(), e)))?;

        let location = Self::reserve(&dir, &metadata.display_name)?;
        info!(
            path = %location.display(),
            mime = %metadata.mime_type,
            "Inserted catalog entry"
        );
        Ok(MediaHandle { location })
    }

    fn open_writer(&self, handle: &MediaHandle) -> Result<Box<dyn Write + Send>, StorageError> {
        let file = File::create(&handle.location)
            .map_err(|e| StorageError::OpenFailed(format!("{}: {}", handle.location.display(), e)))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
