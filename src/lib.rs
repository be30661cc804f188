// SPDX-License-Identifier: MPL-2.0

//! Photo Express - capture a photo, adjust its brightness, save it
//!
//! This library provides the capture-adjust-save workflow: a camera facility
//! writes a photo to a private working file, a downsampled preview is shown
//! through a live lighting filter driven by a brightness slider, and on
//! request the filter is baked into a full-resolution copy that is submitted
//! to the shared Pictures collection.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: workflow controller (state machine, messages, handlers)
//! - [`backends`]: camera facility abstraction
//! - [`color`]: brightness mapping and the lighting filter
//! - [`pipelines`]: preview decode and the destructive save pipeline
//! - [`config`]: user configuration handling
//! - [`storage`]: working files and the shared media catalog

pub mod app;
pub mod backends;
pub mod color;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message, Notification, WorkflowState};
pub use color::{LightingFilter, Tint};
pub use config::Config;
