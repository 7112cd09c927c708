// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shadow accessories: the declared shape of one hub device.
//!
//! A [`ShadowAccessory`] is built from a [`Device`](crate::hub::Device) by the
//! archetype registry and then applied to a live [`Accessory`]: stale
//! services are removed, missing ones added, and new characteristics flagged
//! for event binding.

use super::{
    Accessory, CharacteristicKind, ColorState, DeviceRef, Service, ServiceKind, ServiceSubtype,
};

/// Manufacturer reported by every bridged accessory.
pub const MANUFACTURER: &str = "IlCato";
/// Model reported by every bridged accessory.
pub const MODEL: &str = "HomeCenterBridgedAccessory";
/// Serial number reported by every bridged accessory.
pub const SERIAL_NUMBER: &str = "<unknown>";

const AMBIENT_LIGHT_MAX: f64 = 10_000.0;
const CURRENT_TEMPERATURE_MIN: f64 = -50.0;

// ============================================================================
// ServiceDeclaration
// ============================================================================

/// A service the bridge wants an accessory to expose.
#[derive(Debug, Clone)]
pub struct ServiceDeclaration {
    /// Service kind.
    pub kind: ServiceKind,
    /// Display name, matched against host services when reconciling.
    pub display_name: String,
    /// Characteristics in exposure order.
    pub characteristics: Vec<CharacteristicKind>,
    /// Structured identity of the service.
    pub subtype: ServiceSubtype,
    /// Seed color state for color services.
    pub color: Option<ColorState>,
}

impl ServiceDeclaration {
    /// Creates a declaration.
    #[must_use]
    pub fn new(
        kind: ServiceKind,
        display_name: impl Into<String>,
        subtype: ServiceSubtype,
        characteristics: &[CharacteristicKind],
    ) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            characteristics: characteristics.to_vec(),
            subtype,
            color: None,
        }
    }

    /// Attaches a seed color state.
    #[must_use]
    pub fn with_color(mut self, color: ColorState) -> Self {
        self.color = Some(color);
        self
    }

    /// Builds the live service, flagging every characteristic for binding.
    fn to_service(&self) -> Service {
        let mut service = Service::new(self.kind, self.display_name.clone(), self.subtype.clone());
        for kind in &self.characteristics {
            let characteristic = service.get_or_add_characteristic(*kind);
            characteristic.props.needs_binding = true;
            match kind {
                CharacteristicKind::CurrentAmbientLightLevel => {
                    characteristic.props.min_value = Some(0.0);
                    characteristic.props.max_value = Some(AMBIENT_LIGHT_MAX);
                    characteristic.props.min_step = Some(1.0);
                }
                CharacteristicKind::CurrentTemperature => {
                    characteristic.props.min_value = Some(CURRENT_TEMPERATURE_MIN);
                }
                _ => {}
            }
        }
        service.color.clone_from(&self.color);
        service
    }
}

// ============================================================================
// ShadowAccessory
// ============================================================================

/// The declared shape of one hub device as an accessory.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::accessory::{
///     CharacteristicKind, ServiceDeclaration, ServiceKind, ServiceSubtype, ShadowAccessory,
/// };
/// use fibaro_bridge::accessory::DeviceRef;
///
/// let shadow = ShadowAccessory::new("Lamp", 1, DeviceRef::Device(5)).with_service(
///     ServiceDeclaration::new(
///         ServiceKind::Switch,
///         "Lamp",
///         ServiceSubtype::device(5),
///         &[CharacteristicKind::On],
///     ),
/// );
/// assert_eq!(shadow.identity_key(), "Lamp1");
/// ```
#[derive(Debug, Clone)]
pub struct ShadowAccessory {
    /// Device name.
    pub name: String,
    /// Room id.
    pub room_id: u64,
    /// Backing device.
    pub device: DeviceRef,
    /// Declared services.
    pub services: Vec<ServiceDeclaration>,
}

impl ShadowAccessory {
    /// Creates a shadow with no services.
    #[must_use]
    pub fn new(name: impl Into<String>, room_id: u64, device: DeviceRef) -> Self {
        Self {
            name: name.into(),
            room_id,
            device,
            services: Vec::new(),
        }
    }

    /// Appends a service declaration.
    #[must_use]
    pub fn with_service(mut self, service: ServiceDeclaration) -> Self {
        self.services.push(service);
        self
    }

    /// Returns true for the synthetic security-system shadow.
    #[must_use]
    pub fn is_security_system(&self) -> bool {
        self.device == DeviceRef::SecuritySystem
    }

    /// Cache key: name followed by room id.
    #[must_use]
    pub fn identity_key(&self) -> String {
        format!("{}{}", self.name, self.room_id)
    }

    /// Creates a fresh host accessory for this shadow.
    #[must_use]
    pub fn create_accessory(&self) -> Accessory {
        let mut accessory = Accessory::new(self.name.clone(), self.identity_key());
        self.init_accessory(&mut accessory);
        accessory
    }

    /// Writes the descriptive information fields.
    pub fn init_accessory(&self, accessory: &mut Accessory) {
        accessory.information.manufacturer = MANUFACTURER.to_string();
        accessory.information.model = MODEL.to_string();
        accessory.information.serial_number = SERIAL_NUMBER.to_string();
    }

    /// Removes host services that no declaration accounts for.
    ///
    /// A named service survives only if a declaration carries its display
    /// name and, when the service has a subtype, that same subtype. A device
    /// re-included on the hub under a new id therefore loses its old service.
    /// Services without a display name are kept. Returns the removed services.
    pub fn remove_stale_services(&self, accessory: &mut Accessory) -> Vec<Service> {
        let mut removed = Vec::new();
        accessory.services.retain(|service| {
            let keep = match service.display_name.as_deref() {
                None => true,
                Some(name) => self.services.iter().any(|d| {
                    d.display_name == name
                        && service.subtype.as_ref().is_none_or(|s| *s == d.subtype)
                }),
            };
            if !keep {
                removed.push(service.clone());
            }
            keep
        });
        removed
    }

    /// Adds declared services the host accessory lacks.
    ///
    /// New characteristics are flagged `needs_binding`, and the ambient light
    /// and current temperature bounds are widened to what the hub reports.
    /// Returns the subtypes of the added services.
    pub fn add_missing_services(&self, accessory: &mut Accessory) -> Vec<ServiceSubtype> {
        let mut added = Vec::new();
        for declaration in &self.services {
            let present = accessory.services.iter().any(|s| {
                s.subtype.as_ref() == Some(&declaration.subtype)
                    && s.display_name.as_deref() == Some(declaration.display_name.as_str())
            });
            if present {
                continue;
            }
            accessory.services.push(declaration.to_service());
            added.push(declaration.subtype.clone());
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> ShadowAccessory {
        ShadowAccessory::new("Lamp", 1, DeviceRef::Device(5)).with_service(ServiceDeclaration::new(
            ServiceKind::Switch,
            "Lamp",
            ServiceSubtype::device(5),
            &[CharacteristicKind::On],
        ))
    }

    #[test]
    fn create_accessory_fills_information() {
        let accessory = lamp().create_accessory();
        assert_eq!(accessory.identity_key, "Lamp1");
        assert_eq!(accessory.information.manufacturer, "IlCato");
        assert_eq!(accessory.information.model, "HomeCenterBridgedAccessory");
        assert_eq!(accessory.information.serial_number, "<unknown>");
    }

    #[test]
    fn add_missing_services_is_idempotent() {
        let shadow = lamp();
        let mut accessory = shadow.create_accessory();
        assert_eq!(shadow.add_missing_services(&mut accessory).len(), 1);
        assert!(shadow.add_missing_services(&mut accessory).is_empty());

        let service = &accessory.services[0];
        let on = service.characteristic(CharacteristicKind::On).unwrap();
        assert!(on.props.needs_binding);
    }

    #[test]
    fn stale_services_are_removed_but_unnamed_kept() {
        let shadow = lamp();
        let mut accessory = shadow.create_accessory();
        accessory.services.push(Service::new(
            ServiceKind::Switch,
            "Old name",
            ServiceSubtype::device(5),
        ));
        let mut unnamed = Service::new(ServiceKind::Switch, "x", ServiceSubtype::device(6));
        unnamed.display_name = None;
        accessory.services.push(unnamed);

        let removed = shadow.remove_stale_services(&mut accessory);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].display_name.as_deref(), Some("Old name"));
        assert_eq!(accessory.services.len(), 1);
    }

    #[test]
    fn renumbered_device_replaces_its_service() {
        let mut accessory = lamp().create_accessory();
        lamp().add_missing_services(&mut accessory);

        let renumbered = ShadowAccessory::new("Lamp", 1, DeviceRef::Device(55)).with_service(
            ServiceDeclaration::new(
                ServiceKind::Switch,
                "Lamp",
                ServiceSubtype::device(55),
                &[CharacteristicKind::On],
            ),
        );
        let removed = renumbered.remove_stale_services(&mut accessory);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].subtype, Some(ServiceSubtype::device(5)));

        assert_eq!(renumbered.add_missing_services(&mut accessory).len(), 1);
        assert_eq!(accessory.services.len(), 1);
        assert!(accessory.service(&ServiceSubtype::device(55)).is_some());
    }

    #[test]
    fn sensor_bounds_are_clamped() {
        let shadow = ShadowAccessory::new("Hall", 2, DeviceRef::Device(8))
            .with_service(ServiceDeclaration::new(
                ServiceKind::LightSensor,
                "Hall",
                ServiceSubtype::device(8),
                &[CharacteristicKind::CurrentAmbientLightLevel],
            ))
            .with_service(ServiceDeclaration::new(
                ServiceKind::TemperatureSensor,
                "Hall temp",
                ServiceSubtype::device(9),
                &[CharacteristicKind::CurrentTemperature],
            ));
        let mut accessory = shadow.create_accessory();
        shadow.add_missing_services(&mut accessory);

        let light = accessory.services[0]
            .characteristic(CharacteristicKind::CurrentAmbientLightLevel)
            .unwrap();
        assert_eq!(light.props.min_value, Some(0.0));
        assert_eq!(light.props.max_value, Some(10_000.0));
        assert_eq!(light.props.min_step, Some(1.0));

        let temp = accessory.services[1]
            .characteristic(CharacteristicKind::CurrentTemperature)
            .unwrap();
        assert_eq!(temp.props.min_value, Some(-50.0));
        assert_eq!(temp.props.max_value, Some(100.0));
    }

    #[test]
    fn security_system_flag() {
        assert!(ShadowAccessory::new("Alarm", 0, DeviceRef::SecuritySystem).is_security_system());
        assert!(!lamp().is_security_system());
    }
}
