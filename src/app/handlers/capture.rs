// SPDX-License-Identifier: GPL-3.0-only

//! Capture and save handlers
//!
//! Handles capture requests, the camera result, the preview decode and the
//! save round trip.

use crate::app::state::{AppModel, Message, Notification, Preview, SaveOutcome, WorkflowState};
use crate::app::task::Task;
use crate::color::LightingFilter;
use crate::constants::brightness::LEVEL_NEUTRAL;
use crate::pipelines::photo::{PhotoPipeline, PostProcessingConfig, PreviewImage, load_preview};
use crate::storage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Capture Handlers
    // =========================================================================

    /// Allocate a destination and hand it to the camera facility
    pub(crate) fn handle_capture_photo(&mut self) -> Task<Message> {
        match &self.state {
            WorkflowState::Capturing { destination } => {
                info!(pending = %destination.display(), "Capture already in progress");
                return Task::none();
            }
            WorkflowState::Saving => {
                info!("Capture ignored while saving");
                return Task::none();
            }
            WorkflowState::Idle | WorkflowState::Previewing => {}
        }

        let destination = match storage::create_image_file(&self.working_dir) {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Cannot allocate capture destination");
                return Task::none();
            }
        };

        info!(
            camera = self.camera.name(),
            destination = %destination.display(),
            "Requesting capture"
        );

        self.state = WorkflowState::Capturing {
            destination: destination.clone(),
        };
        self.controls.save_enabled = false;

        let request = self.camera.request_capture(destination.clone());
        Task::perform(request, move |success| Message::CaptureFinished {
            destination,
            success,
        })
    }

    /// Camera facility answered
    pub(crate) fn handle_capture_finished(
        &mut self,
        destination: PathBuf,
        success: bool,
    ) -> Task<Message> {
        if self.state.pending_destination() != Some(&destination) {
            debug!(destination = %destination.display(), "Ignoring stale capture result");
            return Task::none();
        }

        if !success {
            info!(
                destination = %destination.display(),
                "Capture failed or was cancelled, destination abandoned"
            );
            storage::discard_unused_destination(&destination);
            self.return_to_rest();
            return Task::none();
        }

        let view = self.config.preview_size();
        Task::perform(load_preview(destination.clone(), view), move |preview| {
            Message::PreviewLoaded {
                path: destination,
                preview: preview.map(Arc::new),
            }
        })
    }

    /// Preview decode finished
    pub(crate) fn handle_preview_loaded(
        &mut self,
        path: PathBuf,
        preview: Option<Arc<PreviewImage>>,
    ) -> Task<Message> {
        if self.state.pending_destination() != Some(&path) {
            debug!(path = %path.display(), "Ignoring stale preview");
            return Task::none();
        }

        let Some(image) = preview else {
            warn!(path = %path.display(), "Captured photo could not be decoded");
            self.return_to_rest();
            return Task::none();
        };

        info!(
            path = %path.display(),
            width = image.image.width(),
            height = image.image.height(),
            "Showing captured photo"
        );

        self.photo_file = Some(path);
        self.preview = Some(Preview {
            image,
            filter: LightingFilter::NEUTRAL,
        });
        self.controls.slider_visible = true;
        self.apply_brightness(LEVEL_NEUTRAL);
        self.controls.save_enabled = true;
        self.state = WorkflowState::Previewing;

        Task::none()
    }

    /// Back to whatever was shown before the capture started
    fn return_to_rest(&mut self) {
        if self.preview.is_some() {
            self.state = WorkflowState::Previewing;
            self.controls.save_enabled = true;
        } else {
            self.state = WorkflowState::Idle;
            self.controls.save_enabled = false;
        }
    }

    // =========================================================================
    // Save Handlers
    // =========================================================================

    /// Bake the current filter into the original and submit it to the catalog
    pub(crate) fn handle_save_photo(&mut self) -> Task<Message> {
        if !self.controls.save_enabled {
            debug!(state = ?self.state, "Save ignored, save action disabled");
            return Task::none();
        }

        let Some(photo_file) = self.photo_file.clone() else {
            debug!("Save ignored, no photo");
            return Task::none();
        };

        // Disabled until the save completes
        self.controls.save_enabled = false;
        self.state = WorkflowState::Saving;

        info!(
            path = %photo_file.display(),
            level = self.controls.slider_level,
            multiply = %self.filter.multiply,
            add = %self.filter.add,
            "Saving adjusted photo"
        );

        let pipeline = PhotoPipeline::with_config(
            PostProcessingConfig {
                filter: self.filter,
            },
            self.config.encoding_format,
            self.config.encoding_quality,
        );
        let store = Arc::clone(&self.media_store);

        Task::perform(
            async move {
                pipeline
                    .save_adjusted(photo_file, store)
                    .await
                    .map(|handle| handle.to_string())
                    .map_err(|e| e.to_string())
            },
            Message::PhotoSaved,
        )
    }

    /// Background save finished
    ///
    /// The save action comes back and the confirmation is shown whatever the
    /// outcome, unless failure reporting is configured.
    pub(crate) fn handle_photo_saved(&mut self, result: Result<String, String>) -> Task<Message> {
        let notification = match &result {
            Ok(location) => {
                info!(location = %location, "Adjusted photo saved");
                Notification::PhotoSaved
            }
            Err(e) => {
                error!(error = %e, "Saving adjusted photo failed");
                if self.config.report_save_failures {
                    Notification::SaveFailed(e.clone())
                } else {
                    Notification::PhotoSaved
                }
            }
        };

        self.last_save_outcome = Some(match result {
            Ok(location) => SaveOutcome::Saved(location),
            Err(e) => SaveOutcome::Failed(e),
        });
        self.notifications.push(notification);

        self.controls.save_enabled = true;
        if self.state.is_saving() {
            self.state = WorkflowState::Previewing;
        }

        Task::none()
    }
}
