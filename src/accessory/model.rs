// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live accessory objects as held by the host runtime and the cache.

use std::collections::HashMap;

use uuid::Uuid;

use super::{CharacteristicKind, ColorState, ServiceKind, ServiceSubtype};
use crate::types::CharacteristicValue;

/// Namespace for accessory UUIDs derived from identity keys.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_52b4_2d0e_4b6a_9a53_8e0c_7d1f_2a90);

/// Numeric bounds and binding flag of a characteristic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacteristicProps {
    /// Lower bound.
    pub min_value: Option<f64>,
    /// Upper bound.
    pub max_value: Option<f64>,
    /// Step.
    pub min_step: Option<f64>,
    /// Set when the characteristic was added by the bridge and must have its
    /// get/set events routed to the hub. Persisted by the host.
    pub needs_binding: bool,
}

/// A characteristic of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct Characteristic {
    /// Kind, the key into the transform tables.
    pub kind: CharacteristicKind,
    /// Bounds and flags.
    pub props: CharacteristicProps,
    /// Last value seen through get, set, or a poller push.
    pub value: CharacteristicValue,
    binding: Option<ServiceSubtype>,
}

impl Characteristic {
    /// Creates a characteristic with the protocol defaults for `kind`.
    #[must_use]
    pub fn new(kind: CharacteristicKind) -> Self {
        Self {
            kind,
            props: kind.default_props(),
            value: kind.initial_value(),
            binding: None,
        }
    }

    /// Attaches the get/set routing for this characteristic.
    ///
    /// A characteristic is bound at most once; returns `false` if it already
    /// was.
    pub fn bind(&mut self, subtype: ServiceSubtype) -> bool {
        if self.binding.is_some() {
            return false;
        }
        self.binding = Some(subtype);
        true
    }

    /// Returns the identity the characteristic is routed with, once bound.
    #[must_use]
    pub fn binding(&self) -> Option<&ServiceSubtype> {
        self.binding.as_ref()
    }
}

/// A service of an accessory.
#[derive(Debug, Clone)]
pub struct Service {
    /// Service kind.
    pub kind: ServiceKind,
    /// Display name; restored services may lack one.
    pub display_name: Option<String>,
    /// Structured identity.
    pub subtype: Option<ServiceSubtype>,
    /// Characteristics in declaration order.
    pub characteristics: Vec<Characteristic>,
    /// Color cache, present on color services only.
    pub color: Option<ColorState>,
}

impl Service {
    /// Creates a service with no characteristics.
    #[must_use]
    pub fn new(kind: ServiceKind, display_name: impl Into<String>, subtype: ServiceSubtype) -> Self {
        Self {
            kind,
            display_name: Some(display_name.into()),
            subtype: Some(subtype),
            characteristics: Vec::new(),
            color: None,
        }
    }

    /// Returns the characteristic of the given kind.
    #[must_use]
    pub fn characteristic(&self, kind: CharacteristicKind) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind == kind)
    }

    /// Returns the characteristic of the given kind, mutably.
    pub fn characteristic_mut(&mut self, kind: CharacteristicKind) -> Option<&mut Characteristic> {
        self.characteristics.iter_mut().find(|c| c.kind == kind)
    }

    /// Returns the characteristic of the given kind, adding it if missing.
    pub fn get_or_add_characteristic(&mut self, kind: CharacteristicKind) -> &mut Characteristic {
        let index = match self.characteristics.iter().position(|c| c.kind == kind) {
            Some(index) => index,
            None => {
                self.characteristics.push(Characteristic::new(kind));
                self.characteristics.len() - 1
            }
        };
        &mut self.characteristics[index]
    }
}

/// Descriptive fields of the accessory information service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessoryInformation {
    /// Manufacturer.
    pub manufacturer: String,
    /// Model.
    pub model: String,
    /// Serial number.
    pub serial_number: String,
}

/// A platform accessory.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::accessory::Accessory;
///
/// let a = Accessory::new("Lamp", "Lamp1");
/// let b = Accessory::new("Lamp", "Lamp1");
/// assert_eq!(a.uuid, b.uuid);
/// ```
#[derive(Debug, Clone)]
pub struct Accessory {
    /// Stable UUID derived from the identity key.
    pub uuid: Uuid,
    /// Display name.
    pub display_name: String,
    /// Cache key this accessory was created under.
    pub identity_key: String,
    /// Information service fields.
    pub information: AccessoryInformation,
    /// Services, excluding the information service.
    pub services: Vec<Service>,
    /// Reachability flag shown by the host.
    pub reachable: bool,
    /// Set once the current reconciliation pass has confirmed the accessory.
    pub reviewed: bool,
}

impl Accessory {
    /// Creates an empty accessory whose UUID is derived from `identity_key`.
    #[must_use]
    pub fn new(display_name: impl Into<String>, identity_key: impl Into<String>) -> Self {
        let identity_key = identity_key.into();
        Self {
            uuid: uuid_for(&identity_key),
            display_name: display_name.into(),
            identity_key,
            information: AccessoryInformation::default(),
            services: Vec::new(),
            reachable: true,
            reviewed: false,
        }
    }

    /// Returns the first service with the given display name.
    #[must_use]
    pub fn service_by_name(&self, name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.display_name.as_deref() == Some(name))
    }

    /// Returns the service with the given subtype.
    #[must_use]
    pub fn service(&self, subtype: &ServiceSubtype) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.subtype.as_ref() == Some(subtype))
    }

    /// Returns the service with the given subtype, mutably.
    pub fn service_mut(&mut self, subtype: &ServiceSubtype) -> Option<&mut Service> {
        self.services
            .iter_mut()
            .find(|s| s.subtype.as_ref() == Some(subtype))
    }
}

/// Derives the accessory UUID for an identity key.
#[must_use]
pub fn uuid_for(identity_key: &str) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, identity_key.as_bytes())
}

/// Accessories known to the bridge, keyed by identity key.
#[derive(Debug, Default)]
pub struct AccessoryCache {
    accessories: HashMap<String, Accessory>,
}

impl AccessoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached accessories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    /// Inserts an accessory under its identity key, replacing any previous one.
    pub fn insert(&mut self, accessory: Accessory) {
        self.accessories
            .insert(accessory.identity_key.clone(), accessory);
    }

    /// Returns the accessory with the given identity key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Accessory> {
        self.accessories.get(key)
    }

    /// Returns the accessory with the given identity key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Accessory> {
        self.accessories.get_mut(key)
    }

    /// Returns the accessory with the given UUID, mutably.
    pub fn by_uuid_mut(&mut self, uuid: &Uuid) -> Option<&mut Accessory> {
        self.accessories.values_mut().find(|a| &a.uuid == uuid)
    }

    /// Returns the accessory with the given UUID.
    #[must_use]
    pub fn by_uuid(&self, uuid: &Uuid) -> Option<&Accessory> {
        self.accessories.values().find(|a| &a.uuid == uuid)
    }

    /// Removes and returns the accessory with the given identity key.
    pub fn remove(&mut self, key: &str) -> Option<Accessory> {
        self.accessories.remove(key)
    }

    /// Iterates over cached accessories in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Accessory> {
        self.accessories.values()
    }

    /// Clears the reviewed flag of every accessory ahead of a new pass.
    pub fn clear_reviewed(&mut self) {
        for accessory in self.accessories.values_mut() {
            accessory.reviewed = false;
        }
    }

    /// Removes every accessory not reviewed in the current pass.
    pub fn drain_unreviewed(&mut self) -> Vec<Accessory> {
        let stale: Vec<String> = self
            .accessories
            .iter()
            .filter(|(_, a)| !a.reviewed)
            .map(|(k, _)| k.clone())
            .collect();
        stale
            .into_iter()
            .filter_map(|k| self.accessories.remove(&k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_is_deterministic_per_key() {
        assert_eq!(uuid_for("Lamp1"), uuid_for("Lamp1"));
        assert_ne!(uuid_for("Lamp1"), uuid_for("Lamp2"));
    }

    #[test]
    fn characteristic_binds_once() {
        let mut c = Characteristic::new(CharacteristicKind::On);
        assert!(c.bind(ServiceSubtype::device(1)));
        assert!(!c.bind(ServiceSubtype::device(2)));
        assert_eq!(c.binding(), Some(&ServiceSubtype::device(1)));
    }

    #[test]
    fn get_or_add_characteristic_is_idempotent() {
        let mut s = Service::new(ServiceKind::Switch, "Lamp", ServiceSubtype::device(1));
        s.get_or_add_characteristic(CharacteristicKind::On);
        s.get_or_add_characteristic(CharacteristicKind::On);
        assert_eq!(s.characteristics.len(), 1);
    }

    #[test]
    fn cache_drains_only_unreviewed() {
        let mut cache = AccessoryCache::new();
        let mut kept = Accessory::new("A", "A1");
        kept.reviewed = true;
        cache.insert(kept);
        cache.insert(Accessory::new("B", "B1"));

        let removed = cache.drain_unreviewed();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].identity_key, "B1");
        assert!(cache.get("A1").is_some());

        cache.clear_reviewed();
        assert!(cache.iter().all(|a| !a.reviewed));
    }

    #[test]
    fn lookup_by_uuid() {
        let mut cache = AccessoryCache::new();
        let accessory = Accessory::new("A", "A1");
        let uuid = accessory.uuid;
        cache.insert(accessory);
        assert_eq!(cache.by_uuid(&uuid).map(|a| a.display_name.as_str()), Some("A"));
        assert!(cache.by_uuid_mut(&Uuid::nil()).is_none());
    }
}
