// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value transform tables between hub properties and characteristics.
//!
//! Reads turn a device property snapshot (or a global variable string) into
//! a characteristic value. Writes turn a characteristic value into a
//! [`HubCommand`], which the router executes.

use serde_json::json;

use crate::accessory::{CharacteristicKind as C, ColorChannel, ServiceSubtype};
use crate::error::{Error, ParseError, Result};
use crate::hub::DeviceProperties;
use crate::platform::thermostat::ThermostatTracker;
use crate::types::{
    CharacteristicValue, ContactState, HeatingCoolingState, HsbColor, LockState, PositionState,
    RgbColor, SecuritySystemState,
};

/// Hub dimmers and shutters top out at this level.
const HUB_MAX_LEVEL: f64 = 99.0;

// ============================================================================
// Reads
// ============================================================================

fn required_f64(properties: &DeviceProperties, field: &str) -> Result<f64> {
    properties.as_f64(field).ok_or_else(|| {
        ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("missing or non-numeric: {:?}", properties.get(field)),
        }
        .into()
    })
}

fn hub_color(properties: &DeviceProperties) -> Result<HsbColor> {
    let text = properties.text("color").unwrap_or_default();
    Ok(RgbColor::from_hub_str(&text)?.to_hsb())
}

#[allow(clippy::cast_possible_truncation)]
fn level(properties: &DeviceProperties) -> Result<CharacteristicValue> {
    let raw = required_f64(properties, "value")?;
    let level = if raw >= HUB_MAX_LEVEL { 100.0 } else { raw };
    Ok(CharacteristicValue::Int(level.clamp(0.0, 100.0).round() as i64))
}

fn flag(properties: &DeviceProperties) -> bool {
    properties.as_bool("value").unwrap_or(false)
}

/// Reads a characteristic of a device-backed service from a property
/// snapshot.
///
/// # Errors
///
/// Returns `Error::Parse` if a required property is missing or malformed,
/// and `Error::UnsupportedCharacteristic` for characteristics a device
/// never carries.
pub fn read_device(
    kind: C,
    subtype: &ServiceSubtype,
    properties: &DeviceProperties,
    thermostats: &ThermostatTracker,
) -> Result<CharacteristicValue> {
    let device_id = subtype.device_id().unwrap_or_default();
    let value: CharacteristicValue = match kind {
        C::On if subtype.color => (hub_color(properties)?.brightness() > 0).into(),
        C::On => flag(properties).into(),
        C::Brightness if subtype.color => hub_color(properties)?.brightness().into(),
        C::Brightness | C::CurrentPosition | C::TargetPosition => level(properties)?,
        C::Hue => hub_color(properties)?.hue().into(),
        C::Saturation => hub_color(properties)?.saturation().into(),
        C::PositionState => PositionState::Stopped.as_num().into(),
        C::MotionDetected | C::LeakDetected | C::SmokeDetected => flag(properties).into(),
        C::OutletInUse => match properties.as_f64("power") {
            Some(power) => (power > 0.0).into(),
            None => flag(properties).into(),
        },
        C::ContactSensorState => ContactState::from_breached(flag(properties)).as_num().into(),
        C::CurrentTemperature | C::CurrentRelativeHumidity | C::CurrentAmbientLightLevel => {
            required_f64(properties, "value")?.into()
        }
        C::TargetTemperature => properties
            .as_f64("targetLevel")
            .map_or_else(|| required_f64(properties, "value"), Ok)?
            .into(),
        C::CurrentHeatingCoolingState => thermostats
            .current_state(
                device_id,
                properties.as_f64("value"),
                properties.as_f64("targetLevel"),
            )
            .as_num()
            .into(),
        C::TargetHeatingCoolingState => thermostats.target_state(device_id).as_num().into(),
        C::TemperatureDisplayUnits => CharacteristicValue::Int(0),
        C::LockCurrentState | C::LockTargetState => {
            LockState::from(flag(properties)).as_num().into()
        }
        C::SecuritySystemCurrentState | C::SecuritySystemTargetState => {
            return Err(Error::UnsupportedCharacteristic(kind));
        }
    };
    Ok(value)
}

/// Reads a characteristic of a global-variable-backed service.
///
/// # Errors
///
/// Returns `Error::Value` for an unknown security-system state string, and
/// `Error::UnsupportedCharacteristic` for characteristics the variable
/// cannot back.
pub fn read_global_variable(
    kind: C,
    subtype: &ServiceSubtype,
    raw: &str,
) -> Result<CharacteristicValue> {
    if subtype.is_security_system() {
        let state: SecuritySystemState = raw.parse()?;
        return match kind {
            C::SecuritySystemCurrentState => Ok(state.as_num().into()),
            C::SecuritySystemTargetState => Ok(state.as_target().as_num().into()),
            _ => Err(Error::UnsupportedCharacteristic(kind)),
        };
    }
    match kind {
        C::On => Ok((raw.trim() == "true").into()),
        _ => Err(Error::UnsupportedCharacteristic(kind)),
    }
}

// ============================================================================
// Writes
// ============================================================================

/// A hub operation produced by a characteristic write.
#[derive(Debug, Clone, PartialEq)]
pub enum HubCommand {
    /// Invoke a device action.
    DeviceAction {
        /// Device id.
        id: u64,
        /// Action name.
        action: &'static str,
        /// Action arguments.
        args: Vec<serde_json::Value>,
    },
    /// Write a global variable.
    SetGlobalVariable {
        /// Variable name.
        name: String,
        /// New value.
        value: String,
    },
    /// Run the scene that moves the security system into a state.
    RunScene(SecuritySystemState),
    /// Press a virtual-device button, then reset the switch.
    PressButton {
        /// Virtual device id.
        id: u64,
        /// Button element id.
        button: u64,
    },
    /// Merge a channel into the color debounce.
    Color {
        /// Color device id.
        id: u64,
        /// Channel written.
        channel: ColorChannel,
        /// Channel value.
        value: f64,
    },
    /// Remember a thermostat mode.
    ThermostatMode {
        /// Thermostat device id.
        id: u64,
        /// Selected mode.
        mode: HeatingCoolingState,
    },
    /// Set a thermostat target, with the timeout as the hold time.
    TargetTemperature {
        /// Thermostat device id.
        id: u64,
        /// Target temperature.
        target: f64,
    },
}

fn device_action(id: u64, action: &'static str, args: Vec<serde_json::Value>) -> HubCommand {
    HubCommand::DeviceAction { id, action, args }
}

/// Maps a characteristic write to the hub command that carries it out.
///
/// Returns `None` for characteristics with no write path; those writes are
/// accepted and dropped.
///
/// # Errors
///
/// Returns `Error::Value` if the value has the wrong type or range.
pub fn write_command(
    kind: C,
    subtype: &ServiceSubtype,
    value: &CharacteristicValue,
) -> Result<Option<HubCommand>> {
    if let Some(name) = subtype.global_variable_name() {
        return Ok(match kind {
            C::On => Some(HubCommand::SetGlobalVariable {
                name: name.to_string(),
                value: value.expect_bool()?.to_string(),
            }),
            _ => None,
        });
    }
    if subtype.is_security_system() {
        return Ok(match kind {
            C::SecuritySystemTargetState => Some(HubCommand::RunScene(
                SecuritySystemState::from_num(value.expect_i64()?)?,
            )),
            _ => None,
        });
    }

    let Some(id) = subtype.device_id() else {
        return Ok(None);
    };
    let command = match kind {
        C::On => match subtype.button {
            Some(button) if value.expect_bool()? => Some(HubCommand::PressButton { id, button }),
            Some(_) => None,
            None => {
                let action = if value.expect_bool()? {
                    "turnOn"
                } else {
                    "turnOff"
                };
                Some(device_action(id, action, Vec::new()))
            }
        },
        C::Brightness if subtype.color => Some(HubCommand::Color {
            id,
            channel: ColorChannel::Brightness,
            value: value.expect_f64()?,
        }),
        C::Brightness | C::TargetPosition => {
            Some(device_action(id, "setValue", vec![json!(value.expect_i64()?)]))
        }
        C::Hue | C::Saturation if subtype.color => Some(HubCommand::Color {
            id,
            channel: if kind == C::Hue {
                ColorChannel::Hue
            } else {
                ColorChannel::Saturation
            },
            value: value.expect_f64()?,
        }),
        C::TargetTemperature => Some(HubCommand::TargetTemperature {
            id,
            target: value.expect_f64()?,
        }),
        C::TargetHeatingCoolingState => Some(HubCommand::ThermostatMode {
            id,
            mode: HeatingCoolingState::from_num(value.expect_i64()?),
        }),
        C::LockTargetState => {
            let state = LockState::from(value.expect_i64()? == 1);
            Some(device_action(id, state.hub_action(), Vec::new()))
        }
        _ => None,
    };
    Ok(command)
}
