// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory reconciliation against the hub device list.

use std::collections::HashMap;

use super::{Platform, UpdateSubscription};
use crate::accessory::{Accessory, DeviceRef, ShadowAccessory};
use crate::archetype::{global_variable_shadow, security_system_shadow, shadow_for};
use crate::host::HostRuntime;
use crate::hub::{Device, HubClient};

impl<H: HubClient, R: HostRuntime> Platform<H, R> {
    /// Reconciles the accessory cache with a device list.
    ///
    /// Every mapped, included device is created or updated and registered
    /// with the host, followed by the security system and global variable
    /// switches when configured. Cached accessories not seen in this pass are
    /// then unregistered. In test mode decisions are only logged.
    pub fn load_accessories(&self, devices: &[Device]) {
        let config = &self.shared.config;
        tracing::info!(devices = devices.len(), "Loading accessories");

        self.shared.cache.lock().clear_reviewed();
        let mut claimed = HashMap::new();

        for device in devices.iter().filter(|d| self.is_included(d)) {
            let shadow = shadow_for(device);
            if config.test_mode {
                match &shadow {
                    Some(s) => tracing::info!(
                        "TEST: Adding accessory: {} (Fibaro device ID: {})",
                        s.name,
                        device.id
                    ),
                    None => tracing::info!(
                        "TEST: --> Skipping device: {} (Fibaro ID: {})",
                        device.name,
                        device.id
                    ),
                }
                continue;
            }
            match shadow {
                Some(shadow) => self.add_accessory(&shadow, &mut claimed),
                None => tracing::trace!(
                    device_id = device.id,
                    device_type = %device.device_type,
                    "Unmapped device type"
                ),
            }
        }

        if config.security_system {
            let shadow = security_system_shadow();
            if config.test_mode {
                tracing::info!("TEST: Adding security system: {}", shadow.name);
            } else {
                self.add_accessory(&shadow, &mut claimed);
            }
        }

        for name in &config.global_variable_switches {
            let shadow = global_variable_shadow(name);
            if config.test_mode {
                tracing::info!("TEST: Adding global variable switch: {}", shadow.name);
            } else {
                self.add_accessory(&shadow, &mut claimed);
            }
        }

        if !config.test_mode {
            self.prune();
        }
    }

    fn is_included(&self, device: &Device) -> bool {
        let config = &self.shared.config;
        !config.exclude.contains(&device.id)
            && (config.include.contains(&device.id)
                || (device.visible && !device.name.starts_with('_')))
    }

    fn add_accessory(&self, shadow: &ShadowAccessory, claimed: &mut HashMap<String, DeviceRef>) {
        if shadow.services.is_empty() {
            tracing::debug!(accessory = %shadow.name, "No services to expose");
            return;
        }

        let key = shadow.identity_key();
        if let Some(owner) = claimed.get(&key)
            && *owner != shadow.device
        {
            tracing::warn!(
                accessory = %shadow.name,
                room_id = shadow.room_id,
                device = %shadow.device,
                owner = %owner,
                "Identity collision, device skipped"
            );
            return;
        }
        claimed.insert(key.clone(), shadow.device.clone());

        let (snapshot, is_new, removed) = {
            let mut cache = self.shared.cache.lock();
            let is_new = cache.get(&key).is_none();
            if is_new {
                cache.insert(shadow.create_accessory());
            }
            let Some(accessory) = cache.get_mut(&key) else {
                return;
            };
            shadow.init_accessory(accessory);
            let removed = shadow.remove_stale_services(accessory);
            shadow.add_missing_services(accessory);
            self.bind_characteristics(accessory);
            accessory.reachable = true;
            accessory.reviewed = true;
            (accessory.clone(), is_new, removed)
        };

        if !removed.is_empty() {
            let mut subscriptions = self.shared.subscriptions.lock();
            for subtype in removed.iter().filter_map(|s| s.subtype.as_ref()) {
                subscriptions.remove_service(&snapshot.uuid, subtype);
            }
        }

        let accessories = std::slice::from_ref(&snapshot);
        if is_new {
            self.shared.host.register_accessories(accessories);
        } else {
            self.shared.host.update_accessories(accessories);
        }
        tracing::info!(accessory = %shadow.name, new = is_new, "Added/changed accessory");
    }

    /// Binds every characteristic flagged for binding and subscribes it to
    /// the poller. Already bound characteristics are left alone.
    pub(super) fn bind_characteristics(&self, accessory: &mut Accessory) {
        let uuid = accessory.uuid;
        let mut subscriptions = self.shared.subscriptions.lock();
        for service in &mut accessory.services {
            let Some(subtype) = service.subtype.clone() else {
                continue;
            };
            for characteristic in &mut service.characteristics {
                if !characteristic.props.needs_binding || !characteristic.bind(subtype.clone()) {
                    continue;
                }
                if let Some(subscription) =
                    UpdateSubscription::for_characteristic(uuid, &subtype, characteristic.kind)
                {
                    subscriptions.register(subscription);
                }
            }
        }
    }

    fn prune(&self) {
        let stale = self.shared.cache.lock().drain_unreviewed();
        if stale.is_empty() {
            return;
        }
        {
            let mut subscriptions = self.shared.subscriptions.lock();
            for accessory in &stale {
                subscriptions.remove_accessory(&accessory.uuid);
            }
        }
        for accessory in &stale {
            tracing::info!(accessory = %accessory.display_name, "Remove accessory");
        }
        self.shared.host.unregister_accessories(&stale);
    }
}
