// SPDX-License-Identifier: GPL-3.0-only

//! Capture-adjust-save workflow controller
//!
//! [`AppModel`] is a message-driven state machine. Every user action and every
//! background completion arrives as a [`Message`]; [`AppModel::update`]
//! applies it on the calling thread and returns a [`Task`] for the work that
//! has to wait (camera, preview decode, save). Feeding the task's output back
//! into `update` continues the workflow.
//!
//! ```ignore
//! let mut app = AppModel::new(config, camera, media_store);
//! app.dispatch(Message::CapturePhoto).await;
//! app.dispatch(Message::BrightnessChanged(150)).await;
//! app.dispatch(Message::SavePhoto).await;
//! ```

mod handlers;
mod state;
mod task;
mod update;

pub use state::{
    AppModel, Controls, Message, Notification, Preview, SaveOutcome, WorkflowState,
};
pub use task::Task;
