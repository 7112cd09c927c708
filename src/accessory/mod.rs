// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory model: live accessories, their declared shape, and identity.
//!
//! - [`Accessory`], [`Service`], and [`Characteristic`] are the objects the
//!   host runtime persists and the platform mutates.
//! - [`ShadowAccessory`] and [`ServiceDeclaration`] describe what a hub
//!   device should look like.
//! - [`ServiceSubtype`] is the structured identity every service carries.

mod color;
mod kinds;
mod model;
mod shadow;
mod subtype;

pub use color::{ColorChannel, ColorState};
pub use kinds::{CharacteristicKind, ServiceKind};
pub use model::{
    Accessory, AccessoryCache, AccessoryInformation, Characteristic, CharacteristicProps, Service,
    uuid_for,
};
pub use shadow::{MANUFACTURER, MODEL, SERIAL_NUMBER, ServiceDeclaration, ShadowAccessory};
pub use subtype::{DeviceRef, ServiceSubtype};
