// SPDX-License-Identifier: GPL-3.0-only

//! Message dispatch
//!
//! Routes each [`Message`] to its handler. Handlers mutate the model on the
//! calling thread and hand back a [`Task`] for whatever has to wait.

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use tracing::trace;

impl AppModel {
    /// Handle one message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        trace!(?message, state = ?self.state, "update");

        match message {
            // ===== Capture =====
            Message::CapturePhoto => self.handle_capture_photo(),
            Message::CaptureFinished {
                destination,
                success,
            } => self.handle_capture_finished(destination, success),
            Message::PreviewLoaded { path, preview } => self.handle_preview_loaded(path, preview),

            // ===== Adjust =====
            Message::BrightnessChanged(level) => self.handle_brightness_changed(level),

            // ===== Save =====
            Message::SavePhoto => self.handle_save_photo(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),
        }
    }

    /// Handle `message` and every follow-up message its tasks produce
    ///
    /// Resolves once the chain of continuations is exhausted.
    pub async fn dispatch(&mut self, message: Message) {
        let mut next = Some(message);

        while let Some(message) = next.take() {
            if let Some(future) = self.update(message).into_future() {
                next = Some(future.await);
            }
        }
    }
}
