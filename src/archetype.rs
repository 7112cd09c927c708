// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Archetype registry: which accessory shape each hub device type gets.
//!
//! Classification is an exact match of the device `type` string against
//! [`REGISTRY`]. Unknown types classify to `None` and are skipped by the
//! reconciler.
//!
//! # Examples
//!
//! ```
//! use fibaro_bridge::archetype::{Archetype, classify};
//!
//! assert_eq!(classify("com.fibaro.FGD212"), Some(Archetype::Lightbulb));
//! assert_eq!(classify("com.fibaro.unknownThing"), None);
//! ```

use crate::accessory::{
    CharacteristicKind as C, ColorState, DeviceRef, ServiceDeclaration, ServiceKind,
    ServiceSubtype, ShadowAccessory,
};
use crate::hub::Device;

/// Display name of the synthetic security-system accessory.
pub const SECURITY_SYSTEM_NAME: &str = "FibaroSecuritySystem";

/// Control types for which a binary switch is presented as a light.
const LIGHT_CONTROL_TYPES: [&str; 3] = [
    "2", // lighting
    "5", // bedside lamp
    "7", // wall lamp
];

/// Accessory shapes a hub device can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Dimmable light.
    Lightbulb,
    /// On/off switch, or a light for lighting control types.
    Switch,
    /// Roller shutter.
    WindowCovering,
    /// Motion sensor.
    MotionSensor,
    /// Temperature sensor.
    TemperatureSensor,
    /// Humidity sensor.
    HumiditySensor,
    /// Door or window sensor.
    ContactSensor,
    /// Flood sensor.
    LeakSensor,
    /// Smoke sensor.
    SmokeSensor,
    /// Light sensor.
    LightSensor,
    /// Wall plug.
    Outlet,
    /// Door lock.
    LockMechanism,
    /// Thermostat or setpoint.
    Thermostat,
    /// Virtual device with push buttons.
    VirtualDevice,
    /// RGB(W) controller.
    ColorBulb,
}

/// Device type to archetype table.
pub static REGISTRY: &[(&str, Archetype)] = &[
    ("com.fibaro.multilevelSwitch", Archetype::Lightbulb),
    ("com.fibaro.FGD212", Archetype::Lightbulb),
    ("com.fibaro.binarySwitch", Archetype::Switch),
    ("com.fibaro.developer.bxs.virtualBinarySwitch", Archetype::Switch),
    ("com.fibaro.FGR221", Archetype::WindowCovering),
    ("com.fibaro.FGRM222", Archetype::WindowCovering),
    ("com.fibaro.rollerShutter", Archetype::WindowCovering),
    ("com.fibaro.FGMS001", Archetype::MotionSensor),
    ("com.fibaro.motionSensor", Archetype::MotionSensor),
    ("com.fibaro.temperatureSensor", Archetype::TemperatureSensor),
    ("com.fibaro.humiditySensor", Archetype::HumiditySensor),
    ("com.fibaro.doorSensor", Archetype::ContactSensor),
    ("com.fibaro.windowSensor", Archetype::ContactSensor),
    ("com.fibaro.FGFS101", Archetype::LeakSensor),
    ("com.fibaro.floodSensor", Archetype::LeakSensor),
    ("com.fibaro.FGSS001", Archetype::SmokeSensor),
    ("com.fibaro.lightSensor", Archetype::LightSensor),
    ("com.fibaro.FGWP101", Archetype::Outlet),
    ("com.fibaro.FGWP102", Archetype::Outlet),
    ("com.fibaro.doorLock", Archetype::Outlet),
    ("com.fibaro.gerda", Archetype::LockMechanism),
    ("com.fibaro.setPoint", Archetype::Thermostat),
    ("com.fibaro.thermostatDanfoss", Archetype::Thermostat),
    ("com.fibaro.com.fibaro.thermostatHorstmann", Archetype::Thermostat),
    ("virtual_device", Archetype::VirtualDevice),
    ("com.fibaro.FGRGBW441M", Archetype::ColorBulb),
    ("com.fibaro.colorController", Archetype::ColorBulb),
];

/// Looks up the archetype for a device type.
#[must_use]
pub fn classify(device_type: &str) -> Option<Archetype> {
    REGISTRY
        .iter()
        .find(|(t, _)| *t == device_type)
        .map(|(_, a)| *a)
}

impl Archetype {
    /// Builds the service declarations for a device of this archetype.
    #[must_use]
    pub fn declarations(&self, device: &Device) -> Vec<ServiceDeclaration> {
        let single = |kind: ServiceKind, characteristics: &[C]| {
            vec![ServiceDeclaration::new(
                kind,
                device.name.clone(),
                ServiceSubtype::device(device.id),
                characteristics,
            )]
        };

        match self {
            Self::Lightbulb => single(ServiceKind::Lightbulb, &[C::On, C::Brightness]),
            Self::Switch => {
                let is_light = device
                    .properties
                    .control_type()
                    .is_some_and(|t| LIGHT_CONTROL_TYPES.contains(&t.as_str()));
                let kind = if is_light {
                    ServiceKind::Lightbulb
                } else {
                    ServiceKind::Switch
                };
                single(kind, &[C::On])
            }
            Self::WindowCovering => single(
                ServiceKind::WindowCovering,
                &[C::CurrentPosition, C::TargetPosition, C::PositionState],
            ),
            Self::MotionSensor => single(ServiceKind::MotionSensor, &[C::MotionDetected]),
            Self::TemperatureSensor => {
                single(ServiceKind::TemperatureSensor, &[C::CurrentTemperature])
            }
            Self::HumiditySensor => {
                single(ServiceKind::HumiditySensor, &[C::CurrentRelativeHumidity])
            }
            Self::ContactSensor => single(ServiceKind::ContactSensor, &[C::ContactSensorState]),
            Self::LeakSensor => single(ServiceKind::LeakSensor, &[C::LeakDetected]),
            Self::SmokeSensor => single(ServiceKind::SmokeSensor, &[C::SmokeDetected]),
            Self::LightSensor => single(ServiceKind::LightSensor, &[C::CurrentAmbientLightLevel]),
            Self::Outlet => single(ServiceKind::Outlet, &[C::On, C::OutletInUse]),
            Self::LockMechanism => single(
                ServiceKind::LockMechanism,
                &[C::LockCurrentState, C::LockTargetState],
            ),
            Self::Thermostat => single(
                ServiceKind::Thermostat,
                &[
                    C::CurrentTemperature,
                    C::TargetTemperature,
                    C::CurrentHeatingCoolingState,
                    C::TargetHeatingCoolingState,
                    C::TemperatureDisplayUnits,
                ],
            ),
            Self::VirtualDevice => device
                .properties
                .rows()
                .iter()
                .filter(|row| row.is_button_row())
                .flat_map(|row| row.elements.iter())
                .map(|element| {
                    ServiceDeclaration::new(
                        ServiceKind::Switch,
                        element.caption.clone(),
                        ServiceSubtype::button(device.id, element.id),
                        &[C::On],
                    )
                })
                .collect(),
            Self::ColorBulb => vec![
                ServiceDeclaration::new(
                    ServiceKind::Lightbulb,
                    device.name.clone(),
                    ServiceSubtype::color(device.id),
                    &[C::On, C::Brightness, C::Hue, C::Saturation],
                )
                .with_color(ColorState::new()),
            ],
        }
    }

    /// Builds the shadow accessory for a device of this archetype.
    #[must_use]
    pub fn shadow(&self, device: &Device) -> ShadowAccessory {
        let mut shadow =
            ShadowAccessory::new(device.name.clone(), device.room_id, DeviceRef::Device(device.id));
        shadow.services = self.declarations(device);
        shadow
    }
}

/// Classifies a device and builds its shadow accessory.
///
/// Returns `None` for unmapped device types.
#[must_use]
pub fn shadow_for(device: &Device) -> Option<ShadowAccessory> {
    classify(&device.device_type).map(|a| a.shadow(device))
}

/// Shadow of the synthetic security-system device.
#[must_use]
pub fn security_system_shadow() -> ShadowAccessory {
    ShadowAccessory::new(SECURITY_SYSTEM_NAME, 0, DeviceRef::SecuritySystem).with_service(
        ServiceDeclaration::new(
            ServiceKind::SecuritySystem,
            SECURITY_SYSTEM_NAME,
            ServiceSubtype::security_system(),
            &[C::SecuritySystemCurrentState, C::SecuritySystemTargetState],
        ),
    )
}

/// Shadow of a switch backed by the named global variable.
#[must_use]
pub fn global_variable_shadow(name: &str) -> ShadowAccessory {
    ShadowAccessory::new(name, 0, DeviceRef::GlobalVariable(name.to_string())).with_service(
        ServiceDeclaration::new(
            ServiceKind::Switch,
            name,
            ServiceSubtype::global_variable(name),
            &[C::On],
        ),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::HsbColor;

    #[test]
    fn every_registry_entry_classifies() {
        for (device_type, archetype) in REGISTRY {
            assert_eq!(classify(device_type), Some(*archetype));
        }
        assert_eq!(classify(""), None);
        assert_eq!(classify("com.fibaro.binarySwitch "), None);
    }

    #[test]
    fn binary_switch_is_a_switch() {
        let device = Device::new(5, "Lamp", 1, "com.fibaro.binarySwitch");
        let shadow = shadow_for(&device).unwrap();
        assert_eq!(shadow.identity_key(), "Lamp1");
        assert_eq!(shadow.services.len(), 1);
        let service = &shadow.services[0];
        assert_eq!(service.kind, ServiceKind::Switch);
        assert_eq!(service.subtype.to_string(), "5--");
        assert_eq!(service.characteristics, vec![C::On]);
    }

    #[test]
    fn lighting_control_type_makes_a_lightbulb() {
        for control in ["2", "5", "7"] {
            let device = Device::new(5, "Lamp", 1, "com.fibaro.binarySwitch")
                .with_property("deviceControlType", control);
            let shadow = shadow_for(&device).unwrap();
            assert_eq!(shadow.services[0].kind, ServiceKind::Lightbulb);
        }
        let device = Device::new(5, "Pump", 1, "com.fibaro.binarySwitch")
            .with_property("deviceControlType", "1");
        assert_eq!(shadow_for(&device).unwrap().services[0].kind, ServiceKind::Switch);
    }

    #[test]
    fn thermostat_has_five_characteristics() {
        let device = Device::new(12, "Heater", 3, "com.fibaro.thermostatDanfoss");
        let shadow = shadow_for(&device).unwrap();
        assert_eq!(shadow.services[0].kind, ServiceKind::Thermostat);
        assert_eq!(shadow.services[0].characteristics.len(), 5);
    }

    #[test]
    fn virtual_device_yields_one_service_per_button() {
        let device = Device::new(9, "Panel", 2, "virtual_device").with_property(
            "rows",
            json!([
                {"type": "label", "elements": [{"id": 1, "caption": "Title"}]},
                {"type": "button", "elements": [
                    {"id": 2, "caption": "Open"},
                    {"id": 3, "caption": "Close"}
                ]},
                {"type": "button", "elements": [{"id": 4, "caption": "Stop"}]}
            ]),
        );
        let shadow = shadow_for(&device).unwrap();
        let subtypes: Vec<String> = shadow
            .services
            .iter()
            .map(|s| s.subtype.to_string())
            .collect();
        assert_eq!(subtypes, vec!["9-2-", "9-3-", "9-4-"]);
        assert_eq!(shadow.services[1].display_name, "Close");
    }

    #[test]
    fn virtual_device_without_buttons_has_no_services() {
        let device = Device::new(9, "Panel", 2, "virtual_device");
        assert!(shadow_for(&device).unwrap().services.is_empty());
    }

    #[test]
    fn color_bulb_seeds_color_state() {
        let device = Device::new(7, "Strip", 1, "com.fibaro.FGRGBW441M");
        let shadow = shadow_for(&device).unwrap();
        let service = &shadow.services[0];
        assert_eq!(service.subtype.to_string(), "7--RGB");
        assert_eq!(service.characteristics.len(), 4);
        assert_eq!(service.color.as_ref().map(|c| c.hsb), Some(HsbColor::white()));
    }

    #[test]
    fn synthetic_shadows() {
        let alarm = security_system_shadow();
        assert!(alarm.is_security_system());
        assert_eq!(alarm.identity_key(), "FibaroSecuritySystem0");
        assert_eq!(alarm.services[0].subtype.to_string(), "0--");

        let vacation = global_variable_shadow("Vacation");
        assert_eq!(vacation.identity_key(), "Vacation0");
        assert_eq!(vacation.services[0].subtype.to_string(), "G-Vacation-");
        assert_eq!(vacation.services[0].kind, ServiceKind::Switch);
    }
}
