// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for captured photos
//!
//! Heavy operations (decoding, compositing, encoding, catalog writes) run on
//! blocking workers so the workflow controller never stalls on them.
//!
//! # Modules
//!
//! - [`photo`]: bounded preview decode and the destructive save path

pub mod photo;
