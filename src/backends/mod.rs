// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for photo capture
//!
//! The workflow never talks to a camera directly. It asks a camera facility
//! to write a photo to a destination it chose, and waits for a yes/no answer:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │    Workflow controller       │
//! └──────────────┬───────────────┘
//!                │ request_capture(destination) -> bool
//! ┌──────────────┴───────────────┐
//! │        CameraFacility        │
//! │  ┌────────────┐ ┌─────────┐  │
//! │  │ FileImport │ │ Command │  │
//! │  └────────────┘ └─────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: camera facility trait and implementations

pub mod camera;
