// SPDX-License-Identifier: GPL-3.0-only

//! Brightness handlers
//!
//! Slider changes only swap the display-layer filter on the preview; the
//! decoded bitmap is never touched or decoded again.

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::color::{LightingFilter, clamp_level};
use tracing::debug;

impl AppModel {
    /// User moved the brightness slider
    pub(crate) fn handle_brightness_changed(&mut self, level: i32) -> Task<Message> {
        if self.preview.is_none() {
            debug!(level, "No preview, ignoring brightness change");
            return Task::none();
        }

        self.apply_brightness(clamp_level(level));
        Task::none()
    }

    /// Recompute the filter for `level` and put it on the preview
    pub(crate) fn apply_brightness(&mut self, level: u8) {
        self.controls.slider_level = level;
        self.filter = LightingFilter::from_brightness(level as i32);

        if let Some(preview) = self.preview.as_mut() {
            preview.filter = self.filter;
        }

        debug!(
            level,
            multiply = %self.filter.multiply,
            add = %self.filter.add,
            "Brightness applied"
        );
    }
}
