// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host runtime seam.
//!
//! The host runtime owns accessory persistence and the accessory protocol
//! itself. The platform hands it snapshots of accessories to register,
//! update, or unregister, and pushes characteristic values through
//! [`HostRuntime::update_characteristic`]. Characteristic events flow the
//! other way through [`Platform::handle_set`](crate::platform::Platform::handle_set)
//! and [`Platform::handle_get`](crate::platform::Platform::handle_get).

use uuid::Uuid;

use crate::accessory::{Accessory, CharacteristicKind, ServiceSubtype};
use crate::types::CharacteristicValue;

/// Where a characteristic write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOrigin {
    /// A write issued by a protocol client; routed to the hub.
    UserInitiated,
    /// A value pushed by the bridge itself; never written back to the hub.
    InternalSync,
}

impl WriteOrigin {
    /// Returns true for writes that must not reach the hub.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InternalSync)
    }
}

/// Accessory-protocol runtime the platform is hosted in.
///
/// Calls are synchronous and must not block; implementations typically
/// forward to the protocol server's own queue.
pub trait HostRuntime: Send + Sync + 'static {
    /// Registers newly created accessories.
    fn register_accessories(&self, accessories: &[Accessory]);

    /// Persists changes to already registered accessories.
    fn update_accessories(&self, accessories: &[Accessory]);

    /// Removes accessories that no longer exist on the hub.
    fn unregister_accessories(&self, accessories: &[Accessory]);

    /// Publishes a characteristic value to protocol clients.
    fn update_characteristic(
        &self,
        accessory: &Uuid,
        subtype: &ServiceSubtype,
        kind: CharacteristicKind,
        value: &CharacteristicValue,
        origin: WriteOrigin,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_sync_is_internal() {
        assert!(WriteOrigin::InternalSync.is_internal());
        assert!(!WriteOrigin::UserInitiated.is_internal());
    }
}
