// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON at `<config dir>/photo-express/config.json`. A missing or
//! unreadable file falls back to defaults.

use crate::constants::{APP_DIR_NAME, preview};
use crate::errors::AppError;
use crate::pipelines::photo::{EncodingFormat, EncodingQuality};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format of saved photos
    pub encoding_format: EncodingFormat,
    /// Output quality of saved photos (JPEG only)
    pub encoding_quality: EncodingQuality,
    /// Width of the view the preview is decoded for
    pub preview_width: u32,
    /// Height of the view the preview is decoded for
    pub preview_height: u32,
    /// Root of the shared media catalog (defaults to the home directory)
    pub media_root: Option<PathBuf>,
    /// Directory holding the private working captures
    pub working_dir: Option<PathBuf>,
    /// Show a failure notification instead of the confirmation when saving fails
    pub report_save_failures: bool,
    /// Default command for command-driven capture, `{output}` is replaced by the destination
    pub capture_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding_format: EncodingFormat::Jpeg,
            encoding_quality: EncodingQuality::Maximum,
            preview_width: preview::DEFAULT_WIDTH,
            preview_height: preview::DEFAULT_HEIGHT,
            media_root: None,
            working_dir: None,
            report_save_failures: false,
            capture_command: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                warn!("No config directory available, using default configuration");
                Self::default()
            }
        }
    }

    /// Load from `path`, falling back to defaults when missing or malformed
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            }
        }
    }

    /// Load from `path`
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Preview view size as `(width, height)`
    pub fn preview_size(&self) -> (u32, u32) {
        (self.preview_width, self.preview_height)
    }
}
