// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by functional domain:
//! - [`capture`]: capture requests, camera results, preview decode, saving
//! - [`color`]: brightness slider and the lighting filter

pub mod capture;
pub mod color;
