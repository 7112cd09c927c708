// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSB color as written by the accessory protocol.

use std::fmt;

use crate::error::ValueError;

/// HSB color representation (Hue, Saturation, Brightness).
///
/// The accessory protocol writes the three channels independently, so the
/// color-debounce state keeps one of these per color service and replaces a
/// single channel on every write.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::types::HsbColor;
///
/// let red = HsbColor::new(0, 100, 100).unwrap();
/// assert_eq!(red.hue(), 0);
///
/// let dimmed = red.with_brightness(40).unwrap();
/// assert_eq!(dimmed.brightness(), 40);
/// assert_eq!(dimmed.saturation(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HsbColor {
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl HsbColor {
    /// Maximum hue value (exclusive, wraps at 360).
    pub const MAX_HUE: u16 = 360;

    /// Maximum saturation value.
    pub const MAX_SATURATION: u8 = 100;

    /// Maximum brightness value.
    pub const MAX_BRIGHTNESS: u8 = 100;

    /// Creates a new HSB color.
    ///
    /// # Errors
    ///
    /// Returns error if any value is outside its valid range.
    pub fn new(hue: u16, saturation: u8, brightness: u8) -> Result<Self, ValueError> {
        if hue > Self::MAX_HUE {
            return Err(ValueError::InvalidHue(hue));
        }
        if saturation > Self::MAX_SATURATION {
            return Err(ValueError::InvalidSaturation(saturation));
        }
        if brightness > Self::MAX_BRIGHTNESS {
            return Err(ValueError::InvalidBrightness(brightness));
        }
        Ok(Self {
            hue,
            saturation,
            brightness,
        })
    }

    /// All channels zero; the state a color service restored from the host
    /// cache starts with.
    #[must_use]
    pub const fn off() -> Self {
        Self {
            hue: 0,
            saturation: 0,
            brightness: 0,
        }
    }

    /// Initial state for a newly classified color bulb: white, full brightness.
    #[must_use]
    pub const fn white() -> Self {
        Self {
            hue: 0,
            saturation: 0,
            brightness: 100,
        }
    }

    /// Returns the hue value (0-360).
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation value (0-100).
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the brightness value (0-100).
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Creates a new color with a different hue.
    ///
    /// # Errors
    ///
    /// Returns error if hue is greater than 360.
    pub fn with_hue(&self, hue: u16) -> Result<Self, ValueError> {
        Self::new(hue, self.saturation, self.brightness)
    }

    /// Creates a new color with a different saturation.
    ///
    /// # Errors
    ///
    /// Returns error if saturation is greater than 100.
    pub fn with_saturation(&self, saturation: u8) -> Result<Self, ValueError> {
        Self::new(self.hue, saturation, self.brightness)
    }

    /// Creates a new color with a different brightness.
    ///
    /// # Errors
    ///
    /// Returns error if brightness is greater than 100.
    pub fn with_brightness(&self, brightness: u8) -> Result<Self, ValueError> {
        Self::new(self.hue, self.saturation, brightness)
    }
}

impl Default for HsbColor {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for HsbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSB({}, {}%, {}%)",
            self.hue, self.saturation, self.brightness
        )
    }
}
