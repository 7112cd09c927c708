// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change poller.
//!
//! Every bound characteristic that reflects hub state is subscribed here.
//! Each tick fetches one device snapshot plus each watched global variable,
//! runs every subscription through its read transform, and pushes values
//! that differ from the last one seen to the host as
//! [`WriteOrigin::InternalSync`] updates. Comparing transformed values also
//! catches changes with no hub property behind them, such as a thermostat
//! mode lapsing.

use std::collections::{BTreeSet, HashMap};

use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use super::Platform;
use super::transforms::{read_device, read_global_variable};
use crate::accessory::{CharacteristicKind, ServiceSubtype};
use crate::host::{HostRuntime, WriteOrigin};
use crate::hub::{DeviceProperties, HubClient};
use crate::types::CharacteristicValue;

/// Global variable holding the security system state.
pub const SECURITY_SYSTEM_VARIABLE: &str = "SecuritySystem";

/// Where a subscribed value is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionSource {
    /// A property of a device snapshot.
    DeviceProperty {
        /// Device id.
        device_id: u64,
        /// Watched property name.
        property: &'static str,
    },
    /// A global variable.
    GlobalVariable(String),
}

/// A characteristic the poller keeps in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSubscription {
    /// Value source.
    pub source: SubscriptionSource,
    /// Accessory the characteristic belongs to.
    pub accessory: Uuid,
    /// Service identity.
    pub subtype: ServiceSubtype,
    /// Characteristic kind.
    pub kind: CharacteristicKind,
    last_seen: Option<CharacteristicValue>,
}

impl UpdateSubscription {
    /// Builds the subscription for a bound characteristic.
    ///
    /// Push buttons are stateless and get none.
    #[must_use]
    pub fn for_characteristic(
        accessory: Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
    ) -> Option<Self> {
        if subtype.is_push_button() {
            return None;
        }
        let source = if subtype.is_security_system() {
            SubscriptionSource::GlobalVariable(SECURITY_SYSTEM_VARIABLE.to_string())
        } else if let Some(name) = subtype.global_variable_name() {
            SubscriptionSource::GlobalVariable(name.to_string())
        } else {
            SubscriptionSource::DeviceProperty {
                device_id: subtype.device_id()?,
                property: watched_property(subtype, kind),
            }
        };
        Some(Self {
            source,
            accessory,
            subtype: subtype.clone(),
            kind,
            last_seen: None,
        })
    }

    /// Returns the last value pushed for this subscription.
    #[must_use]
    pub fn last_seen(&self) -> Option<&CharacteristicValue> {
        self.last_seen.as_ref()
    }

    fn same_target(&self, other: &Self) -> bool {
        self.accessory == other.accessory && self.subtype == other.subtype && self.kind == other.kind
    }
}

/// All poller subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Vec<UpdateSubscription>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription, replacing one for the same characteristic.
    pub fn register(&mut self, subscription: UpdateSubscription) {
        self.subscriptions.retain(|s| !s.same_target(&subscription));
        self.subscriptions.push(subscription);
    }

    /// Drops every subscription of an accessory.
    pub fn remove_accessory(&mut self, accessory: &Uuid) {
        self.subscriptions.retain(|s| &s.accessory != accessory);
    }

    /// Drops every subscription of one service.
    pub fn remove_service(&mut self, accessory: &Uuid, subtype: &ServiceSubtype) {
        self.subscriptions
            .retain(|s| !(&s.accessory == accessory && &s.subtype == subtype));
    }

    /// Number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Iterates over subscriptions.
    pub fn iter(&self) -> impl Iterator<Item = &UpdateSubscription> {
        self.subscriptions.iter()
    }

    fn watches_devices(&self) -> bool {
        self.subscriptions
            .iter()
            .any(|s| matches!(s.source, SubscriptionSource::DeviceProperty { .. }))
    }

    fn variables(&self) -> BTreeSet<String> {
        self.subscriptions
            .iter()
            .filter_map(|s| match &s.source {
                SubscriptionSource::GlobalVariable(name) => Some(name.clone()),
                SubscriptionSource::DeviceProperty { .. } => None,
            })
            .collect()
    }

    fn mark_seen(&mut self, target: &UpdateSubscription, value: CharacteristicValue) {
        if let Some(s) = self.subscriptions.iter_mut().find(|s| s.same_target(target)) {
            s.last_seen = Some(value);
        }
    }
}

/// Device property a characteristic's read transform is driven by.
fn watched_property(subtype: &ServiceSubtype, kind: CharacteristicKind) -> &'static str {
    match kind {
        _ if subtype.color => "color",
        CharacteristicKind::TargetTemperature => "targetLevel",
        CharacteristicKind::OutletInUse => "power",
        _ => "value",
    }
}

impl<H: HubClient, R: HostRuntime> Platform<H, R> {
    /// Starts the poll loop; a disabled poll interval starts nothing.
    ///
    /// The first tick fires one interval after the call. A running loop is
    /// replaced.
    pub fn start_poller(&self) {
        let Some(period) = self.shared.config.poll_interval else {
            tracing::info!("Polling disabled");
            return;
        };
        let platform = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                platform.poll().await;
            }
        });
        tracing::debug!(period_secs = period.as_secs(), "Poller started");
        if let Some(previous) = self.shared.poller.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Runs one poll tick and returns the number of values pushed.
    ///
    /// Fetch failures are logged and skip only the subscriptions they feed.
    pub async fn poll(&self) -> usize {
        let (subscriptions, watches_devices, variables) = {
            let registry = self.shared.subscriptions.lock();
            if registry.is_empty() {
                tracing::trace!("Nothing to poll");
                return 0;
            }
            (
                registry.iter().cloned().collect::<Vec<_>>(),
                registry.watches_devices(),
                registry.variables(),
            )
        };

        let devices: HashMap<u64, DeviceProperties> = if watches_devices {
            match self.shared.hub.get_devices().await {
                Ok(devices) => devices.into_iter().map(|d| (d.id, d.properties)).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "Poller failed to fetch devices");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        let mut values = HashMap::new();
        for name in variables {
            let result = self.shared.hub.get_global_variable(&name).await;
            match result {
                Ok(value) => {
                    values.insert(name, value);
                }
                Err(e) => {
                    tracing::warn!(variable = %name, error = %e, "Poller failed to read global variable");
                }
            }
        }

        let mut pushed = 0;
        for subscription in &subscriptions {
            let value = match &subscription.source {
                SubscriptionSource::DeviceProperty { device_id, .. } => {
                    // Missing from this snapshot: removed from the hub or the fetch failed.
                    let Some(properties) = devices.get(device_id) else {
                        continue;
                    };
                    let thermostats = self.shared.thermostats.lock();
                    read_device(subscription.kind, &subscription.subtype, properties, &thermostats)
                }
                SubscriptionSource::GlobalVariable(name) => {
                    let Some(raw) = values.get(name) else {
                        continue;
                    };
                    read_global_variable(subscription.kind, &subscription.subtype, raw)
                }
            };
            let value = match value {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(
                        subtype = %subscription.subtype,
                        characteristic = %subscription.kind,
                        source = ?subscription.source,
                        error = %e,
                        "Poller could not transform value"
                    );
                    continue;
                }
            };
            if subscription.last_seen() == Some(&value) {
                continue;
            }

            tracing::debug!(
                subtype = %subscription.subtype,
                characteristic = %subscription.kind,
                value = %value,
                "Pushing hub change"
            );
            self.store_value(
                &subscription.accessory,
                &subscription.subtype,
                subscription.kind,
                value.clone(),
            );
            self.shared.host.update_characteristic(
                &subscription.accessory,
                &subscription.subtype,
                subscription.kind,
                &value,
                WriteOrigin::InternalSync,
            );
            self.shared
                .subscriptions
                .lock()
                .mark_seen(subscription, value);
            pushed += 1;
        }
        pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(subtype: &ServiceSubtype, kind: CharacteristicKind) -> Option<UpdateSubscription> {
        UpdateSubscription::for_characteristic(Uuid::nil(), subtype, kind)
    }

    #[test]
    fn sources_follow_subtype() {
        let device = sub(&ServiceSubtype::device(5), CharacteristicKind::On).unwrap();
        assert_eq!(
            device.source,
            SubscriptionSource::DeviceProperty {
                device_id: 5,
                property: "value"
            }
        );

        let color = sub(&ServiceSubtype::color(7), CharacteristicKind::Hue).unwrap();
        assert_eq!(
            color.source,
            SubscriptionSource::DeviceProperty {
                device_id: 7,
                property: "color"
            }
        );

        let alarm = sub(
            &ServiceSubtype::security_system(),
            CharacteristicKind::SecuritySystemCurrentState,
        )
        .unwrap();
        assert_eq!(
            alarm.source,
            SubscriptionSource::GlobalVariable("SecuritySystem".to_string())
        );

        let gv = sub(&ServiceSubtype::global_variable("Away"), CharacteristicKind::On).unwrap();
        assert_eq!(gv.source, SubscriptionSource::GlobalVariable("Away".to_string()));
    }

    #[test]
    fn push_buttons_are_not_subscribed() {
        assert!(sub(&ServiceSubtype::button(9, 2), CharacteristicKind::On).is_none());
    }

    #[test]
    fn registry_replaces_and_removes() {
        let mut registry = SubscriptionRegistry::new();
        let s = sub(&ServiceSubtype::device(5), CharacteristicKind::On).unwrap();
        registry.register(s.clone());
        registry.register(s.clone());
        assert_eq!(registry.len(), 1);

        registry.mark_seen(&s, CharacteristicValue::Bool(true));
        assert_eq!(
            registry.iter().next().unwrap().last_seen(),
            Some(&CharacteristicValue::Bool(true))
        );

        registry.register(sub(&ServiceSubtype::global_variable("Away"), CharacteristicKind::On).unwrap());
        assert!(registry.watches_devices());
        assert_eq!(registry.variables().len(), 1);

        registry.remove_service(&Uuid::nil(), &ServiceSubtype::device(5));
        assert!(!registry.watches_devices());
        registry.remove_accessory(&Uuid::nil());
        assert!(registry.is_empty());
    }

    #[test]
    fn watched_property_follows_read_transform() {
        let heater = ServiceSubtype::device(12);
        assert_eq!(
            sub(&heater, CharacteristicKind::TargetTemperature).unwrap().source,
            SubscriptionSource::DeviceProperty {
                device_id: 12,
                property: "targetLevel"
            }
        );
        assert_eq!(
            sub(&ServiceSubtype::device(6), CharacteristicKind::OutletInUse)
                .unwrap()
                .source,
            SubscriptionSource::DeviceProperty {
                device_id: 6,
                property: "power"
            }
        );
        assert_eq!(
            sub(&heater, CharacteristicKind::CurrentTemperature).unwrap().source,
            SubscriptionSource::DeviceProperty {
                device_id: 12,
                property: "value"
            }
        );
    }
}
