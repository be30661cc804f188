// SPDX-License-Identifier: GPL-3.0-only

//! Brightness mapping and the lighting colour filter
//!
//! A brightness level from the slider (`0..=200`, `100` = unchanged) maps to a
//! pair of packed ARGB tints that drive a lighting filter:
//!
//! ```text
//! out = in * multiply / 255 + add      (per channel, saturating, alpha kept)
//! ```
//!
//! Darkening uses the multiplicative tint only, brightening the additive tint
//! only; the other tint of the pair is always neutral.

use crate::constants::brightness::{LEVEL_MAX, LEVEL_MIN, LEVEL_NEUTRAL};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packed ARGB colour (`0xAARRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tint(u32);

impl Tint {
    /// Multiplicative tint that leaves every channel untouched
    pub const NEUTRAL_MULTIPLY: Tint = Tint(0xFFFF_FFFF);
    /// Additive tint that adds nothing
    pub const NEUTRAL_ADD: Tint = Tint(0);

    /// Pack four channels into a tint
    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Tint(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Opaque grey with the same value on all three colour channels
    pub const fn opaque_gray(value: u8) -> Self {
        Self::argb(0xFF, value, value, value)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Channels in `(r, g, b, a)` order
    pub const fn rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Clamp an arbitrary slider value into the supported brightness range
pub fn clamp_level(level: i32) -> u8 {
    level.clamp(LEVEL_MIN as i32, LEVEL_MAX as i32) as u8
}

/// `round(255 * numerator / 100)` in integer arithmetic, halves rounded up
fn scale_percent(numerator: u32) -> u8 {
    ((255 * numerator + 50) / 100).min(255) as u8
}

/// Combined colour transform (multiplicative and additive tint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightingFilter {
    pub multiply: Tint,
    pub add: Tint,
}

impl Default for LightingFilter {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl LightingFilter {
    /// Filter that leaves every pixel unchanged
    pub const NEUTRAL: LightingFilter = LightingFilter {
        multiply: Tint::NEUTRAL_MULTIPLY,
        add: Tint::NEUTRAL_ADD,
    };

    /// Map a brightness level to its filter
    ///
    /// Levels above 100 brighten through the additive tint, levels at or
    /// below 100 darken through the multiplicative tint. Values outside
    /// `0..=200` are clamped first.
    pub fn from_brightness(level: i32) -> Self {
        let level = clamp_level(level) as u32;
        let neutral = LEVEL_NEUTRAL as u32;

        if level > neutral {
            Self {
                multiply: Tint::NEUTRAL_MULTIPLY,
                add: Tint::opaque_gray(scale_percent(level - neutral)),
            }
        } else {
            Self {
                multiply: Tint::opaque_gray(scale_percent(level)),
                add: Tint::NEUTRAL_ADD,
            }
        }
    }

    /// True when applying the filter cannot change any pixel
    pub fn is_neutral(&self) -> bool {
        let [mr, mg, mb, _] = self.multiply.rgba();
        let [ar, ag, ab, _] = self.add.rgba();
        mr == 255 && mg == 255 && mb == 255 && ar == 0 && ag == 0 && ab == 0
    }

    /// Filter a single channel value
    #[inline]
    fn channel(value: u8, multiply: u8, add: u8) -> u8 {
        let scaled = value as u32 * multiply as u32 / 255;
        (scaled + add as u32).min(255) as u8
    }

    /// Filter one pixel in place, alpha is preserved
    #[inline]
    pub fn apply_pixel(&self, pixel: &mut Rgba<u8>) {
        let [mr, mg, mb, _] = self.multiply.rgba();
        let [ar, ag, ab, _] = self.add.rgba();
        pixel[0] = Self::channel(pixel[0], mr, ar);
        pixel[1] = Self::channel(pixel[1], mg, ag);
        pixel[2] = Self::channel(pixel[2], mb, ab);
    }

    /// Filter an image in place
    pub fn apply_in_place(&self, image: &mut RgbaImage) {
        if self.is_neutral() {
            return;
        }
        for pixel in image.pixels_mut() {
            self.apply_pixel(pixel);
        }
    }

    /// Composite `source` onto a freshly allocated buffer of the same size
    pub fn composite(&self, source: &RgbaImage) -> RgbaImage {
        let mut output = source.clone();
        self.apply_in_place(&mut output);
        output
    }
}
