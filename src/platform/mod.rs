// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bridge platform: accessory cache, reconciliation, event routing, and
//! change polling.
//!
//! A [`Platform`] is built once from a [`HubClient`], a [`HostRuntime`], and
//! a [`PlatformConfig`]. The host then:
//!
//! 1. calls [`configure_accessory`](Platform::configure_accessory) for every
//!    accessory it restored from its own persistence,
//! 2. calls [`did_finish_launching`](Platform::did_finish_launching) once,
//!    which loads scenes and devices, reconciles the cache, and starts the
//!    poller,
//! 3. forwards characteristic events to
//!    [`handle_set`](Platform::handle_set) and
//!    [`handle_get`](Platform::handle_get).
//!
//! # Examples
//!
//! ```no_run
//! use fibaro_bridge::accessory::Accessory;
//! use fibaro_bridge::host::{HostRuntime, WriteOrigin};
//! use fibaro_bridge::platform::{Platform, PlatformConfig};
//!
//! struct Host;
//!
//! impl HostRuntime for Host {
//!     fn register_accessories(&self, _: &[Accessory]) {}
//!     fn update_accessories(&self, _: &[Accessory]) {}
//!     fn unregister_accessories(&self, _: &[Accessory]) {}
//!     fn update_characteristic(
//!         &self,
//!         _: &uuid::Uuid,
//!         _: &fibaro_bridge::accessory::ServiceSubtype,
//!         _: fibaro_bridge::accessory::CharacteristicKind,
//!         _: &fibaro_bridge::types::CharacteristicValue,
//!         _: WriteOrigin,
//!     ) {
//!     }
//! }
//!
//! # async fn example() -> fibaro_bridge::Result<()> {
//! let config = PlatformConfig::from_json(r#"{"host": "192.168.1.20", "username": "admin", "password": "admin"}"#)?;
//! let hub = config.hub_config().into_client()?;
//! let platform = Platform::new(hub, Host, config);
//! platform.did_finish_launching().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod poller;
mod reconcile;
mod router;
mod thermostat;
pub mod transforms;

pub use config::{PlatformConfig, RawConfig};
pub use poller::{SubscriptionRegistry, SubscriptionSource, UpdateSubscription};
pub use thermostat::ThermostatTracker;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::accessory::{Accessory, AccessoryCache, ColorState};
use crate::error::Result;
use crate::host::HostRuntime;
use crate::hub::HubClient;

struct Shared<H, R> {
    hub: H,
    host: R,
    config: PlatformConfig,
    cache: Mutex<AccessoryCache>,
    subscriptions: Mutex<SubscriptionRegistry>,
    security_scenes: Mutex<HashMap<String, u64>>,
    thermostats: Mutex<ThermostatTracker>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

/// The bridge platform.
///
/// Cheap to clone; clones share the same cache and hub client.
pub struct Platform<H, R> {
    shared: Arc<Shared<H, R>>,
}

impl<H, R> Clone for Platform<H, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H: HubClient, R: HostRuntime> Platform<H, R> {
    /// Creates a platform with an empty accessory cache.
    #[must_use]
    pub fn new(hub: H, host: R, config: PlatformConfig) -> Self {
        let thermostats =
            ThermostatTracker::new(config.thermostat_timeout, config.cooling_state_management);
        Self {
            shared: Arc::new(Shared {
                hub,
                host,
                config,
                cache: Mutex::new(AccessoryCache::new()),
                subscriptions: Mutex::new(SubscriptionRegistry::new()),
                security_scenes: Mutex::new(HashMap::new()),
                thermostats: Mutex::new(thermostats),
                poller: Mutex::new(None),
            }),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.shared.config
    }

    /// Returns the hub client.
    #[must_use]
    pub fn hub(&self) -> &H {
        &self.shared.hub
    }

    /// Returns the host runtime.
    #[must_use]
    pub fn host(&self) -> &R {
        &self.shared.host
    }

    /// Restores an accessory the host persisted in a previous run.
    ///
    /// Color services get a fresh color cache, characteristics flagged for
    /// binding are bound again, and the accessory is marked reachable.
    pub fn configure_accessory(&self, mut accessory: Accessory) {
        for service in &mut accessory.services {
            if service.subtype.as_ref().is_some_and(|s| s.color) {
                service.color = Some(ColorState::restored());
            }
        }
        self.bind_characteristics(&mut accessory);
        accessory.reachable = true;
        tracing::info!(accessory = %accessory.display_name, "Configured accessory");
        self.shared.cache.lock().insert(accessory);
    }

    /// Runs the startup load cycle: scenes, devices, reconciliation, and the
    /// poller.
    ///
    /// # Errors
    ///
    /// Returns the hub error if scenes or devices cannot be fetched. The cache
    /// is left untouched and the poller is not started in that case.
    pub async fn did_finish_launching(&self) -> Result<()> {
        tracing::info!("Loading scenes and devices from Home Center");
        let result = self.load().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error getting data from Home Center");
        }
        result
    }

    async fn load(&self) -> Result<()> {
        let scenes = self.shared.hub.get_scenes().await?;
        if self.shared.config.security_system {
            let mut map = self.shared.security_scenes.lock();
            for scene in scenes {
                map.insert(scene.name, scene.id);
            }
        }
        let devices = self.shared.hub.get_devices().await?;
        self.load_accessories(&devices);
        self.start_poller();
        Ok(())
    }

    /// Returns a snapshot of every cached accessory.
    #[must_use]
    pub fn accessories(&self) -> Vec<Accessory> {
        self.shared.cache.lock().iter().cloned().collect()
    }

    /// Returns a snapshot of the accessory cached under an identity key.
    #[must_use]
    pub fn accessory(&self, identity_key: &str) -> Option<Accessory> {
        self.shared.cache.lock().get(identity_key).cloned()
    }

    /// Returns a snapshot of the accessory with the given UUID.
    #[must_use]
    pub fn accessory_by_uuid(&self, uuid: &Uuid) -> Option<Accessory> {
        self.shared.cache.lock().by_uuid(uuid).cloned()
    }

    /// Returns the number of poller subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.shared.subscriptions.lock().len()
    }

    /// Stops the poller. In-flight hub requests are left to complete.
    pub fn shutdown(&self) {
        if let Some(handle) = self.shared.poller.lock().take() {
            handle.abort();
        }
    }
}
