// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::CameraFacility;
use crate::color::LightingFilter;
use crate::config::Config;
use crate::constants::brightness::LEVEL_NEUTRAL;
use crate::pipelines::photo::PreviewImage;
use crate::storage::{self, MediaStore};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Capture workflow state machine
///
/// ```text
/// Idle ──▶ Capturing ──▶ Previewing ──▶ Saving ──▶ Previewing
///              │  ▲           │
///              ▼  └───────────┘ (take another photo)
///        previous state (failure / cancellation)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    /// No photo yet
    #[default]
    Idle,
    /// Waiting for the camera facility (and then the preview decode)
    Capturing {
        /// Where the camera was asked to write the photo
        destination: PathBuf,
    },
    /// A preview is shown and can be adjusted
    Previewing,
    /// The adjusted photo is being written to the media catalog
    Saving,
}

impl WorkflowState {
    pub fn is_saving(&self) -> bool {
        matches!(self, WorkflowState::Saving)
    }

    /// Destination of the outstanding capture, if any
    pub fn pending_destination(&self) -> Option<&PathBuf> {
        match self {
            WorkflowState::Capturing { destination } => Some(destination),
            _ => None,
        }
    }
}

/// State of the user-facing controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Save trigger is clickable
    pub save_enabled: bool,
    /// Brightness slider is shown
    pub slider_visible: bool,
    /// Brightness slider position (0..=200)
    pub slider_level: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            save_enabled: false,
            slider_visible: false,
            slider_level: LEVEL_NEUTRAL,
        }
    }
}

/// Displayed preview: the decoded bitmap plus a display-layer filter
///
/// The filter is an overlay, the bitmap itself is never modified.
#[derive(Debug, Clone)]
pub struct Preview {
    pub image: Arc<PreviewImage>,
    pub filter: LightingFilter,
}

impl Preview {
    /// Pixels as they appear on screen
    pub fn displayed(&self) -> RgbaImage {
        self.filter.composite(&self.image.image)
    }
}

/// Messages for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Confirmation shown after every save request
    PhotoSaved,
    /// Failure reason, only when failure reporting is configured
    SaveFailed(String),
}

/// What actually happened during the last save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Saved to this catalog location
    Saved(String),
    /// Failed with this reason
    Failed(String),
}

/// Messages driving the workflow
#[derive(Debug, Clone)]
pub enum Message {
    /// User pressed the capture trigger
    CapturePhoto,
    /// Camera facility answered
    CaptureFinished { destination: PathBuf, success: bool },
    /// Preview decode finished (`None` if the file could not be decoded)
    PreviewLoaded {
        path: PathBuf,
        preview: Option<Arc<PreviewImage>>,
    },
    /// User moved the brightness slider
    BrightnessChanged(i32),
    /// User pressed the save trigger
    SavePhoto,
    /// Background save finished
    PhotoSaved(Result<String, String>),
}

/// Capture-adjust-save workflow controller
pub struct AppModel {
    /// User configuration
    pub config: Config,
    /// Camera facility photos are requested from
    pub(crate) camera: Arc<dyn CameraFacility>,
    /// Shared catalog adjusted photos are saved to
    pub(crate) media_store: Arc<dyn MediaStore>,
    /// Private directory for working captures
    pub(crate) working_dir: PathBuf,
    /// Current workflow state
    pub state: WorkflowState,
    /// Working file of the photo currently previewed
    pub photo_file: Option<PathBuf>,
    /// Currently displayed preview
    pub preview: Option<Preview>,
    /// Filter derived from the slider level
    pub filter: LightingFilter,
    /// User-facing controls
    pub controls: Controls,
    /// Result of the most recent save, regardless of what the user was shown
    pub last_save_outcome: Option<SaveOutcome>,
    /// Notifications not yet shown
    pub(crate) notifications: Vec<Notification>,
}

impl AppModel {
    /// Create a controller with injected camera and media catalog
    pub fn new(
        config: Config,
        camera: Arc<dyn CameraFacility>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        let working_dir = config
            .working_dir
            .clone()
            .unwrap_or_else(storage::private_picture_dir);

        Self {
            config,
            camera,
            media_store,
            working_dir,
            state: WorkflowState::Idle,
            photo_file: None,
            preview: None,
            filter: LightingFilter::NEUTRAL,
            controls: Controls::default(),
            last_save_outcome: None,
            notifications: Vec::new(),
        }
    }

    /// Notifications emitted so far, oldest first
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
