// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the accessory model and the hub transforms.
//!
//! # Types
//!
//! - [`CharacteristicValue`] - Dynamically typed characteristic value
//! - [`HsbColor`] - HSB color (Hue 0-360, Saturation 0-100, Brightness 0-100)
//! - [`RgbColor`] - RGB color as exchanged with the Home Center
//! - [`SecuritySystemState`], [`HeatingCoolingState`], [`LockState`],
//!   [`ContactState`], [`PositionState`] - Enumerated characteristic states

mod color;
mod rgb_color;
mod states;
mod value;

pub use color::HsbColor;
pub use rgb_color::RgbColor;
pub use states::{ContactState, HeatingCoolingState, LockState, PositionState, SecuritySystemState};
pub use value::CharacteristicValue;
