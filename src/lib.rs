// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fibaro Bridge - Expose Fibaro Home Center devices as smart-home accessories.
//!
//! This library maps the devices of a Fibaro Home Center to accessories of a
//! `HomeKit`-style accessory protocol and keeps both sides in sync.
//!
//! # Supported Features
//!
//! - **Classification**: lights, switches, shutters, sensors, wall plugs,
//!   locks, thermostats, virtual push-button panels, and RGBW controllers
//! - **Reconciliation**: stable accessory identity across restarts, stale
//!   service removal, new service registration, pruning of removed devices
//! - **Event routing**: characteristic reads and writes mapped to device
//!   actions, global variables, and security-system scenes
//! - **Change polling**: out-of-band hub changes pushed back to the host
//! - **Color debounce**: hue, saturation, and brightness merged into one
//!   `setColor` call
//!
//! # Quick Start
//!
//! ```no_run
//! use fibaro_bridge::accessory::{Accessory, CharacteristicKind, ServiceSubtype};
//! use fibaro_bridge::host::{HostRuntime, WriteOrigin};
//! use fibaro_bridge::platform::{Platform, PlatformConfig};
//! use fibaro_bridge::types::CharacteristicValue;
//!
//! struct LoggingHost;
//!
//! impl HostRuntime for LoggingHost {
//!     fn register_accessories(&self, accessories: &[Accessory]) {
//!         for a in accessories {
//!             println!("register {}", a.display_name);
//!         }
//!     }
//!     fn update_accessories(&self, _: &[Accessory]) {}
//!     fn unregister_accessories(&self, _: &[Accessory]) {}
//!     fn update_characteristic(
//!         &self,
//!         _: &uuid::Uuid,
//!         subtype: &ServiceSubtype,
//!         kind: CharacteristicKind,
//!         value: &CharacteristicValue,
//!         _: WriteOrigin,
//!     ) {
//!         println!("{subtype} {kind} = {value}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> fibaro_bridge::Result<()> {
//!     let config = PlatformConfig::new("192.168.1.20").with_credentials("admin", "admin");
//!     let hub = config.hub_config().into_client()?;
//!     let platform = Platform::new(hub, LoggingHost, config);
//!     platform.did_finish_launching().await?;
//!
//!     // Forward a protocol write for the accessory cached as "Lamp" in room 1
//!     if let Some(lamp) = platform.accessory("Lamp1") {
//!         platform
//!             .handle_set(
//!                 &lamp.uuid,
//!                 &ServiceSubtype::device(5),
//!                 CharacteristicKind::On,
//!                 CharacteristicValue::Bool(true),
//!                 WriteOrigin::UserInitiated,
//!             )
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod archetype;
pub mod error;
pub mod host;
pub mod hub;
pub mod platform;
pub mod types;

pub use accessory::{Accessory, CharacteristicKind, ServiceKind, ServiceSubtype};
pub use error::{Error, HubError, ParseError, Result, ValueError};
pub use host::{HostRuntime, WriteOrigin};
#[cfg(feature = "http")]
pub use hub::{HttpHubClient, HubConfig};
pub use hub::{Device, HubClient};
pub use platform::{Platform, PlatformConfig};
pub use types::{CharacteristicValue, HsbColor, RgbColor};
