// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-service color cache and debounce bookkeeping.
//!
//! Hue, saturation, and brightness arrive as separate writes. Each write
//! lands in [`ColorState::apply`], which bumps a generation counter; only
//! the timer armed by the latest write may flush the merged color to the hub.

use tokio::task::AbortHandle;

use crate::error::ValueError;
use crate::types::{HsbColor, RgbColor};

/// One of the three channels a color write can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    /// Hue (0-360).
    Hue,
    /// Saturation (0-100).
    Saturation,
    /// Brightness (0-100).
    Brightness,
}

/// Cached color of a color-capable service.
///
/// Clones carry the color and generation but not the pending timer.
#[derive(Debug, Default)]
pub struct ColorState {
    /// Last HSB value assembled from protocol writes.
    pub hsb: HsbColor,
    /// Last RGB value sent to (or read from) the hub.
    pub rgb: RgbColor,
    generation: u64,
    timer: Option<AbortHandle>,
}

impl Clone for ColorState {
    fn clone(&self) -> Self {
        Self {
            hsb: self.hsb,
            rgb: self.rgb,
            generation: self.generation,
            timer: None,
        }
    }
}

impl ColorState {
    /// Color state seeded for a newly classified color bulb.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Color state for a service restored from the host cache.
    #[must_use]
    pub fn restored() -> Self {
        Self {
            hsb: HsbColor::off(),
            ..Self::default()
        }
    }

    /// Merges one channel into the cached HSB value and returns the new
    /// generation.
    ///
    /// # Errors
    ///
    /// Returns a `ValueError` if the value is outside the channel's range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply(&mut self, channel: ColorChannel, value: f64) -> Result<u64, ValueError> {
        let rounded = value.round().max(0.0);
        self.hsb = match channel {
            ColorChannel::Hue => self.hsb.with_hue(rounded.min(f64::from(u16::MAX)) as u16)?,
            ColorChannel::Saturation => {
                self.hsb.with_saturation(rounded.min(f64::from(u8::MAX)) as u8)?
            }
            ColorChannel::Brightness => {
                self.hsb.with_brightness(rounded.min(f64::from(u8::MAX)) as u8)?
            }
        };
        self.generation += 1;
        Ok(self.generation)
    }

    /// Returns the generation of the latest write.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Installs the timer for the latest write, discarding the previous one.
    pub fn arm(&mut self, timer: AbortHandle) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Converts the cached HSB value to RGB if `generation` is still the
    /// latest write, clearing the timer. Returns `None` for superseded timers.
    pub fn settle(&mut self, generation: u64) -> Option<RgbColor> {
        if generation != self.generation {
            return None;
        }
        self.timer = None;
        self.rgb = RgbColor::from_hsb(&self.hsb);
        Some(self.rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_white() {
        let state = ColorState::new();
        assert_eq!(state.hsb, HsbColor::white());
        assert_eq!(ColorState::restored().hsb, HsbColor::off());
    }

    #[test]
    fn apply_merges_channels_and_bumps_generation() {
        let mut state = ColorState::new();
        assert_eq!(state.apply(ColorChannel::Hue, 120.2).unwrap(), 1);
        assert_eq!(state.apply(ColorChannel::Saturation, 100.0).unwrap(), 2);
        assert_eq!(state.apply(ColorChannel::Brightness, 100.0).unwrap(), 3);
        assert_eq!(state.hsb, HsbColor::new(120, 100, 100).unwrap());
    }

    #[test]
    fn apply_rejects_out_of_range() {
        let mut state = ColorState::new();
        assert!(state.apply(ColorChannel::Saturation, 150.0).is_err());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn only_latest_generation_settles() {
        let mut state = ColorState::new();
        let first = state.apply(ColorChannel::Hue, 0.0).unwrap();
        let second = state.apply(ColorChannel::Saturation, 100.0).unwrap();
        assert!(state.settle(first).is_none());
        assert_eq!(state.settle(second), Some(RgbColor::new(255, 0, 0)));
        assert_eq!(state.rgb, RgbColor::new(255, 0, 0));
    }
}
