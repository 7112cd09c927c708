// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with Home Center parsing and HSB conversion.
//!
//! Color controllers on the Home Center report and accept colors as a
//! comma-separated `r,g,b,w` string. The white channel is not modelled by
//! the accessory protocol and is always written as zero.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

use super::HsbColor;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use fibaro_bridge::types::{HsbColor, RgbColor};
///
/// let color: RgbColor = "255,0,0,0".parse().unwrap();
/// assert_eq!(color.red(), 255);
///
/// let hsb = color.to_hsb();
/// assert_eq!(hsb.hue(), 0);
/// assert_eq!(RgbColor::from_hsb(&hsb), color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a Home Center color string (`r,g,b` or `r,g,b,w`).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` if fewer than three channels are
    /// present or a channel is not a number in 0-255.
    pub fn from_hub_str(s: &str) -> Result<Self, ValueError> {
        let mut channels = s.split(',').map(|c| c.trim().parse::<f64>());
        let mut next = || -> Result<u8, ValueError> {
            let v = channels
                .next()
                .and_then(Result::ok)
                .ok_or_else(|| ValueError::InvalidColor(s.to_string()))?;
            if !(0.0..=255.0).contains(&v) {
                return Err(ValueError::InvalidColor(s.to_string()));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = v.round() as u8;
            Ok(byte)
        };
        let red = next()?;
        let green = next()?;
        let blue = next()?;
        Ok(Self::new(red, green, blue))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Arguments for the hub `setColor` action: red, green, blue, white.
    #[must_use]
    pub fn to_hub_args(&self) -> Vec<serde_json::Value> {
        vec![
            self.red.into(),
            self.green.into(),
            self.blue.into(),
            0u8.into(),
        ]
    }

    /// Converts this RGB color to HSB format.
    ///
    /// Rounding means RGB → HSB → RGB may not reproduce the input exactly
    /// for non-primary colors.
    #[must_use]
    pub fn to_hsb(&self) -> HsbColor {
        let (h, s, b) = rgb_to_hsb(self.red, self.green, self.blue);
        HsbColor::new(h.min(HsbColor::MAX_HUE), s, b).unwrap_or_default()
    }

    /// Creates an RGB color from an HSB color.
    #[must_use]
    pub fn from_hsb(hsb: &HsbColor) -> Self {
        let (r, g, b) = hsb_to_rgb(hsb.hue(), hsb.saturation(), hsb.brightness());
        Self::new(r, g, b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},0", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hub_str(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Converts RGB values to HSB.
///
/// Returns (hue: 0-360, saturation: 0-100, brightness: 0-100)
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn rgb_to_hsb(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let brightness = (max * 100.0).round() as u8;

    let saturation = if max == 0.0 {
        0
    } else {
        ((delta / max) * 100.0).round() as u8
    };

    let hue = if delta < f32::EPSILON {
        0.0
    } else if (max - r).abs() < f32::EPSILON {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if (max - g).abs() < f32::EPSILON {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    (hue.round() as u16 % HsbColor::MAX_HUE, saturation, brightness)
}

/// Converts HSB values to RGB.
///
/// Takes (hue: 0-360, saturation: 0-100, brightness: 0-100)
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn hsb_to_rgb(h: u16, s: u8, v: u8) -> (u8, u8, u8) {
    let s = f32::from(s) / 100.0;
    let v = f32::from(v) / 100.0;
    let h = f32::from(h % HsbColor::MAX_HUE);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
