// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service and characteristic kinds of the accessory protocol.

use std::fmt;

use super::CharacteristicProps;
use crate::types::CharacteristicValue;

/// Kind of an accessory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ServiceKind {
    /// Light, optionally dimmable or colored.
    Lightbulb,
    /// On/off switch.
    Switch,
    /// Blinds, shutters, and similar.
    WindowCovering,
    /// Motion sensor.
    MotionSensor,
    /// Temperature sensor.
    TemperatureSensor,
    /// Humidity sensor.
    HumiditySensor,
    /// Door or window contact sensor.
    ContactSensor,
    /// Flood sensor.
    LeakSensor,
    /// Smoke sensor.
    SmokeSensor,
    /// Ambient light sensor.
    LightSensor,
    /// Wall plug.
    Outlet,
    /// Door lock.
    LockMechanism,
    /// Thermostat or setpoint controller.
    Thermostat,
    /// Alarm panel.
    SecuritySystem,
}

impl ServiceKind {
    /// Returns the protocol service name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lightbulb => "Lightbulb",
            Self::Switch => "Switch",
            Self::WindowCovering => "WindowCovering",
            Self::MotionSensor => "MotionSensor",
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::ContactSensor => "ContactSensor",
            Self::LeakSensor => "LeakSensor",
            Self::SmokeSensor => "SmokeSensor",
            Self::LightSensor => "LightSensor",
            Self::Outlet => "Outlet",
            Self::LockMechanism => "LockMechanism",
            Self::Thermostat => "Thermostat",
            Self::SecuritySystem => "SecuritySystem",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a characteristic, the key of the get/set transform tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CharacteristicKind {
    /// Power state of a switch, light or outlet.
    On,
    /// Light level in percent.
    Brightness,
    /// Color hue in degrees.
    Hue,
    /// Color saturation in percent.
    Saturation,
    /// Reported blind or dimmer position in percent.
    CurrentPosition,
    /// Requested blind position in percent.
    TargetPosition,
    /// Direction a blind is moving in.
    PositionState,
    /// Motion sensor tripped.
    MotionDetected,
    /// Measured temperature in degrees Celsius.
    CurrentTemperature,
    /// Thermostat setpoint in degrees Celsius.
    TargetTemperature,
    /// Measured humidity in percent.
    CurrentRelativeHumidity,
    /// Door or window contact open.
    ContactSensorState,
    /// Flood sensor tripped.
    LeakDetected,
    /// Smoke sensor tripped.
    SmokeDetected,
    /// Measured illuminance in lux.
    CurrentAmbientLightLevel,
    /// Load drawing power from an outlet.
    OutletInUse,
    /// Reported lock state.
    LockCurrentState,
    /// Requested lock state.
    LockTargetState,
    /// Mode the thermostat is running in.
    CurrentHeatingCoolingState,
    /// Mode the thermostat was asked for.
    TargetHeatingCoolingState,
    /// Celsius or Fahrenheit display.
    TemperatureDisplayUnits,
    /// Armed state reported by the alarm.
    SecuritySystemCurrentState,
    /// Armed state requested of the alarm.
    SecuritySystemTargetState,
}

impl CharacteristicKind {
    /// Returns the protocol characteristic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Brightness => "Brightness",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::CurrentPosition => "CurrentPosition",
            Self::TargetPosition => "TargetPosition",
            Self::PositionState => "PositionState",
            Self::MotionDetected => "MotionDetected",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::TargetTemperature => "TargetTemperature",
            Self::CurrentRelativeHumidity => "CurrentRelativeHumidity",
            Self::ContactSensorState => "ContactSensorState",
            Self::LeakDetected => "LeakDetected",
            Self::SmokeDetected => "SmokeDetected",
            Self::CurrentAmbientLightLevel => "CurrentAmbientLightLevel",
            Self::OutletInUse => "OutletInUse",
            Self::LockCurrentState => "LockCurrentState",
            Self::LockTargetState => "LockTargetState",
            Self::CurrentHeatingCoolingState => "CurrentHeatingCoolingState",
            Self::TargetHeatingCoolingState => "TargetHeatingCoolingState",
            Self::TemperatureDisplayUnits => "TemperatureDisplayUnits",
            Self::SecuritySystemCurrentState => "SecuritySystemCurrentState",
            Self::SecuritySystemTargetState => "SecuritySystemTargetState",
        }
    }

    /// Default numeric bounds as declared by the protocol.
    #[must_use]
    pub fn default_props(&self) -> CharacteristicProps {
        let (min, max, step) = match self {
            Self::Brightness
            | Self::Saturation
            | Self::CurrentPosition
            | Self::TargetPosition
            | Self::CurrentRelativeHumidity => (0.0, 100.0, 1.0),
            Self::Hue => (0.0, 360.0, 1.0),
            Self::CurrentTemperature => (0.0, 100.0, 0.1),
            Self::TargetTemperature => (10.0, 38.0, 0.1),
            Self::CurrentAmbientLightLevel => (0.0001, 100_000.0, 0.0001),
            _ => return CharacteristicProps::default(),
        };
        CharacteristicProps {
            min_value: Some(min),
            max_value: Some(max),
            min_step: Some(step),
            needs_binding: false,
        }
    }

    /// Value a freshly created characteristic holds before the first read.
    #[must_use]
    pub fn initial_value(&self) -> CharacteristicValue {
        match self {
            Self::On | Self::MotionDetected | Self::OutletInUse => CharacteristicValue::Bool(false),
            Self::CurrentTemperature | Self::TargetTemperature => CharacteristicValue::Float(10.0),
            Self::CurrentAmbientLightLevel => CharacteristicValue::Float(0.0001),
            Self::CurrentRelativeHumidity => CharacteristicValue::Float(0.0),
            Self::PositionState => CharacteristicValue::Int(2),
            _ => CharacteristicValue::Int(0),
        }
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_protocol() {
        assert_eq!(ServiceKind::WindowCovering.to_string(), "WindowCovering");
        assert_eq!(
            CharacteristicKind::CurrentAmbientLightLevel.to_string(),
            "CurrentAmbientLightLevel"
        );
    }

    #[test]
    fn ambient_light_defaults_are_fractional() {
        let props = CharacteristicKind::CurrentAmbientLightLevel.default_props();
        assert_eq!(props.max_value, Some(100_000.0));
        assert_eq!(props.min_step, Some(0.0001));
        assert!(!props.needs_binding);
    }

    #[test]
    fn enum_characteristics_have_no_bounds() {
        assert_eq!(
            CharacteristicKind::LockTargetState.default_props(),
            CharacteristicProps::default()
        );
    }
}
