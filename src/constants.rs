// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application directory name used under the data and config directories
pub const APP_DIR_NAME: &str = "photo-express";

/// Brightness slider range
pub mod brightness {
    /// Darkest level (fully black)
    pub const LEVEL_MIN: u8 = 0;
    /// Unchanged image
    pub const LEVEL_NEUTRAL: u8 = 100;
    /// Brightest level (maximum additive whitening)
    pub const LEVEL_MAX: u8 = 200;
}

/// Naming of the private working files written by the camera
pub mod capture {
    /// Filename prefix of captured photos
    pub const FILE_PREFIX: &str = "photo_";
    /// Timestamp layout (`yyyyMMdd_HHmmss`)
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
    /// Extension of captured photos
    pub const FILE_EXTENSION: &str = "jpg";
    /// Sub-directory of the app data directory holding working files
    pub const PRIVATE_PICTURES_DIR: &str = "Pictures";
    /// Placeholder replaced by the destination path in capture commands
    pub const OUTPUT_PLACEHOLDER: &str = "{output}";
}

/// Shared media catalog
pub mod media {
    /// MIME type of saved photos
    pub const MIME_JPEG: &str = "image/jpeg";
    /// MIME type used when saving as PNG
    pub const MIME_PNG: &str = "image/png";
    /// Relative path hint for the Pictures collection
    pub const PICTURES_RELATIVE_PATH: &str = "Pictures";
}

/// Preview sizing
pub mod preview {
    /// Default preview width when no view size is configured
    pub const DEFAULT_WIDTH: u32 = 1080;
    /// Default preview height when no view size is configured
    pub const DEFAULT_HEIGHT: u32 = 1440;
}

/// Supported file formats
pub mod file_formats {
    /// Image extensions accepted as capture sources
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
