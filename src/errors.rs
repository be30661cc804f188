// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture, adjust and save workflow

use std::fmt;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera facility errors
    Camera(CameraError),
    /// Photo decode/process/encode errors
    Photo(PhotoError),
    /// Media catalog and working-file errors
    Storage(StorageError),
    /// Configuration errors
    Config(String),
}

/// Camera facility errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// Source image for an import capture does not exist
    SourceNotFound(String),
    /// Source file is not an image format we can read
    UnsupportedSource(String),
    /// External capture command could not be run or exited unsuccessfully
    CommandFailed(String),
    /// Capture finished but left no usable file behind
    NothingWritten(String),
    /// I/O while writing the destination
    Io(String),
}

/// Photo pipeline errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// Original could not be read or decoded
    DecodeFailed(String),
    /// Filter pass failed
    ProcessingFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Writing to the media catalog failed
    SaveFailed(String),
}

/// Storage errors
#[derive(Debug, Clone)]
pub enum StorageError {
    /// The catalog refused the new entry
    InsertFailed(String),
    /// No writable stream for a catalog entry
    OpenFailed(String),
    /// Working directory could not be prepared
    DirectoryUnavailable(String),
    /// Other I/O error
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::SourceNotFound(path) => write!(f, "Source image not found: {}", path),
            CameraError::UnsupportedSource(path) => write!(f, "Unsupported source image: {}", path),
            CameraError::CommandFailed(msg) => write!(f, "Capture command failed: {}", msg),
            CameraError::NothingWritten(path) => write!(f, "Nothing written to {}", path),
            CameraError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            PhotoError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InsertFailed(msg) => write!(f, "Catalog insert failed: {}", msg),
            StorageError::OpenFailed(msg) => write!(f, "Could not open output stream: {}", msg),
            StorageError::DirectoryUnavailable(msg) => write!(f, "Directory unavailable: {}", msg),
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for StorageError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Io(err.to_string())
    }
}

impl From<StorageError> for PhotoError {
    fn from(err: StorageError) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}
