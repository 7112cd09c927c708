// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Center client interface and data model.
//!
//! The bridge talks to the hub only through the [`HubClient`] trait. The
//! crate ships [`HttpHubClient`] (feature `http`), which implements it over
//! the Home Center REST API; tests substitute in-memory implementations.

mod device;
#[cfg(feature = "http")]
mod http;

pub use device::{ButtonElement, ButtonRow, Device, DeviceProperties, Scene};
#[cfg(feature = "http")]
pub use http::{HttpHubClient, HubConfig};

use std::future::Future;

use crate::error::HubError;

/// Operations the bridge needs from the Home Center.
///
/// All methods are asynchronous and return `Send` futures so the poller and
/// the color-debounce timer can run them from spawned tasks. Failures come
/// back as [`HubError`]; no retries happen at this layer.
pub trait HubClient: Send + Sync + 'static {
    /// Fetches the full device list, properties included.
    fn get_devices(&self) -> impl Future<Output = Result<Vec<Device>, HubError>> + Send;

    /// Fetches all scenes.
    fn get_scenes(&self) -> impl Future<Output = Result<Vec<Scene>, HubError>> + Send;

    /// Fetches the current properties of one device.
    fn get_device_properties(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<DeviceProperties, HubError>> + Send;

    /// Reads a global variable.
    fn get_global_variable(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, HubError>> + Send;

    /// Invokes a device action, e.g. `turnOn` or `setValue [42]`.
    fn set_device_property(
        &self,
        id: u64,
        action: &str,
        args: Vec<serde_json::Value>,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Writes a global variable.
    fn set_global_variable(
        &self,
        name: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Starts a scene.
    fn run_scene(&self, id: u64) -> impl Future<Output = Result<(), HubError>> + Send;
}
