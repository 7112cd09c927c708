// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic event routing: get and set events to hub operations.

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use super::Platform;
use super::poller::SECURITY_SYSTEM_VARIABLE;
use super::transforms::{HubCommand, read_device, read_global_variable, write_command};
use crate::accessory::{CharacteristicKind, ColorChannel, ColorState, ServiceSubtype};
use crate::error::{Error, Result};
use crate::host::{HostRuntime, WriteOrigin};
use crate::hub::HubClient;
use crate::types::{CharacteristicValue, SecuritySystemState};

/// Delay before a pressed virtual button is switched back off.
const BUTTON_RESET_DELAY: Duration = Duration::from_millis(100);

impl<H: HubClient, R: HostRuntime> Platform<H, R> {
    /// Handles a characteristic write.
    ///
    /// Internal writes and unbound characteristics only update the cached
    /// value. User writes are transformed and sent to the hub, and the cached
    /// value changes once the hub accepts them. Characteristics with no write
    /// transform accept the value without a hub call.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` or `Error::ServiceNotFound` for an
    /// unknown target, `Error::Value` for a value of the wrong shape,
    /// `Error::SceneNotFound` if the security scene is missing, and
    /// `Error::Hub` if the hub rejects the write.
    pub async fn handle_set(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
        value: CharacteristicValue,
        origin: WriteOrigin,
    ) -> Result<()> {
        let bound = self.check_target(accessory, subtype, kind)?;
        if origin.is_internal() || !bound {
            return self.store(accessory, subtype, kind, value);
        }

        tracing::debug!(
            device = %subtype.device,
            characteristic = %kind,
            value = %value,
            "Setting value to device"
        );
        let result = match write_command(kind, subtype, &value) {
            Ok(Some(command)) => self.execute(accessory, subtype, command).await,
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        match &result {
            Ok(()) => self.store_value(accessory, subtype, kind, value),
            Err(e) => tracing::warn!(
                device = %subtype.device,
                characteristic = %kind,
                error = %e,
                "Failed to set value on Home Center"
            ),
        }
        result
    }

    /// Handles a characteristic read.
    ///
    /// Push buttons read as off without contacting the hub. The security
    /// system and global-variable switches read their global variable; every
    /// other service reads its device's properties.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` or `Error::ServiceNotFound` for an
    /// unknown target, `Error::Hub` if the fetch fails, and `Error::Parse` or
    /// `Error::Value` if the hub value cannot be transformed.
    pub async fn handle_get(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
    ) -> Result<CharacteristicValue> {
        self.check_target(accessory, subtype, kind)?;

        if subtype.is_push_button() && subtype.global_variable_name().is_none() {
            return Ok(CharacteristicValue::Bool(false));
        }

        tracing::debug!(device = %subtype.device, characteristic = %kind, "Getting value from device");
        let result = self.read(subtype, kind).await;
        match &result {
            Ok(value) => {
                self.store_value(accessory, subtype, kind, value.clone());
            }
            Err(e) => tracing::warn!(
                device = %subtype.device,
                characteristic = %kind,
                error = %e,
                "There was a problem getting value from Home Center"
            ),
        }
        result
    }

    async fn read(
        &self,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
    ) -> Result<CharacteristicValue> {
        let hub = &self.shared.hub;
        if subtype.is_security_system() {
            let raw = hub.get_global_variable(SECURITY_SYSTEM_VARIABLE).await?;
            return read_global_variable(kind, subtype, &raw);
        }
        if let Some(name) = subtype.global_variable_name() {
            let raw = hub.get_global_variable(name).await?;
            return read_global_variable(kind, subtype, &raw);
        }
        let Some(id) = subtype.device_id() else {
            return Err(Error::UnsupportedCharacteristic(kind));
        };
        let properties = hub.get_device_properties(id).await?;
        let thermostats = self.shared.thermostats.lock();
        read_device(kind, subtype, &properties, &thermostats)
    }

    async fn execute(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        command: HubCommand,
    ) -> Result<()> {
        let hub = &self.shared.hub;
        match command {
            HubCommand::DeviceAction { id, action, args } => {
                hub.set_device_property(id, action, args).await?;
            }
            HubCommand::SetGlobalVariable { name, value } => {
                hub.set_global_variable(&name, &value).await?;
            }
            HubCommand::RunScene(state) => {
                let scene = self.security_scene(state)?;
                hub.run_scene(scene).await?;
            }
            HubCommand::PressButton { id, button } => {
                hub.set_device_property(id, "pressButton", vec![json!(button)])
                    .await?;
                self.schedule_button_reset(*accessory, subtype.clone());
            }
            HubCommand::Color { id, channel, value } => {
                self.debounce_color(*accessory, subtype.clone(), id, channel, value)?;
            }
            HubCommand::ThermostatMode { id, mode } => {
                self.shared.thermostats.lock().record_mode(id, mode);
            }
            HubCommand::TargetTemperature { id, target } => {
                hub.set_device_property(id, "setTargetLevel", vec![json!(target)])
                    .await?;
                if let Some(timeout) = self.shared.config.thermostat_timeout {
                    let hold = i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX);
                    let until = chrono::Utc::now().timestamp().saturating_add(hold);
                    hub.set_device_property(id, "setTime", vec![json!(until)])
                        .await?;
                }
                self.shared.thermostats.lock().record_target(id, target);
            }
        }
        Ok(())
    }

    fn security_scene(&self, state: SecuritySystemState) -> Result<u64> {
        let name = state
            .scene_name()
            .ok_or_else(|| Error::SceneNotFound(state.to_string()))?;
        self.shared
            .security_scenes
            .lock()
            .get(name)
            .copied()
            .ok_or_else(|| Error::SceneNotFound(name.to_string()))
    }

    fn schedule_button_reset(&self, accessory: Uuid, subtype: ServiceSubtype) {
        let platform = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(BUTTON_RESET_DELAY).await;
            let off = CharacteristicValue::Bool(false);
            platform.store_value(&accessory, &subtype, CharacteristicKind::On, off.clone());
            platform.shared.host.update_characteristic(
                &accessory,
                &subtype,
                CharacteristicKind::On,
                &off,
                WriteOrigin::InternalSync,
            );
        });
    }

    /// Merges a channel into the service's color and re-arms the flush timer.
    ///
    /// Only the timer of the latest write sends `setColor`; earlier timers
    /// are aborted, and any that already woke find a newer generation.
    fn debounce_color(
        &self,
        accessory: Uuid,
        subtype: ServiceSubtype,
        device_id: u64,
        channel: ColorChannel,
        value: f64,
    ) -> Result<()> {
        let window = self.shared.config.color_debounce;
        let mut cache = self.shared.cache.lock();
        let service = cache
            .by_uuid_mut(&accessory)
            .ok_or_else(|| Error::AccessoryNotFound(accessory.to_string()))?
            .service_mut(&subtype)
            .ok_or_else(|| Error::ServiceNotFound(subtype.to_string()))?;
        let color = service.color.get_or_insert_with(ColorState::new);
        let generation = color.apply(channel, value)?;

        let platform = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let rgb = {
                let mut cache = platform.shared.cache.lock();
                cache
                    .by_uuid_mut(&accessory)
                    .and_then(|a| a.service_mut(&subtype))
                    .and_then(|s| s.color.as_mut())
                    .and_then(|c| c.settle(generation))
            };
            let Some(rgb) = rgb else {
                return;
            };
            tracing::debug!(device_id, color = %rgb, "Sending merged color");
            if let Err(e) = platform
                .shared
                .hub
                .set_device_property(device_id, "setColor", rgb.to_hub_args())
                .await
            {
                tracing::warn!(device_id, error = %e, "Failed to set color on Home Center");
            }
        });
        color.arm(timer.abort_handle());
        Ok(())
    }

    /// Stores a value on a cached characteristic.
    fn store(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<()> {
        let mut cache = self.shared.cache.lock();
        let characteristic = cache
            .by_uuid_mut(accessory)
            .ok_or_else(|| Error::AccessoryNotFound(accessory.to_string()))?
            .service_mut(subtype)
            .ok_or_else(|| Error::ServiceNotFound(subtype.to_string()))?
            .characteristic_mut(kind)
            .ok_or(Error::UnsupportedCharacteristic(kind))?;
        characteristic.value = value;
        Ok(())
    }

    /// Stores a value pushed by the bridge itself, ignoring unknown targets.
    pub(super) fn store_value(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
        value: CharacteristicValue,
    ) {
        if let Err(e) = self.store(accessory, subtype, kind, value) {
            tracing::trace!(error = %e, "Value not stored");
        }
    }

    /// Looks up a cached characteristic and reports whether it is bound.
    fn check_target(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
    ) -> Result<bool> {
        let cache = self.shared.cache.lock();
        cache
            .by_uuid(accessory)
            .ok_or_else(|| Error::AccessoryNotFound(accessory.to_string()))?
            .service(subtype)
            .ok_or_else(|| Error::ServiceNotFound(subtype.to_string()))?
            .characteristic(kind)
            .map(|c| c.binding().is_some())
            .ok_or(Error::UnsupportedCharacteristic(kind))
    }
}
