// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured service identity.
//!
//! The host runtime persists a service subtype as a string of the form
//! `deviceID-buttonID-colorMarker`. That string is parsed once, when a cached
//! accessory is restored, into a [`ServiceSubtype`]; everything downstream
//! works with the typed fields.
//!
//! | Service                 | String form    |
//! |-------------------------|----------------|
//! | ordinary device 5       | `5--`          |
//! | color device 7          | `7--RGB`       |
//! | virtual device 9 btn 2  | `9-2-`         |
//! | security system         | `0--`          |
//! | global variable `Away`  | `G-Away-`      |

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

const COLOR_MARKER: &str = "RGB";
const GLOBAL_VARIABLE_MARKER: &str = "G";
const SECURITY_SYSTEM_ID: &str = "0";

/// What a service is backed by on the Home Center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceRef {
    /// A real device, by hub id.
    Device(u64),
    /// The security system, backed by the `SecuritySystem` global variable.
    SecuritySystem,
    /// A switch backed by the named global variable.
    GlobalVariable(String),
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(id) => write!(f, "{id}"),
            Self::SecuritySystem => f.write_str("security system"),
            Self::GlobalVariable(name) => write!(f, "global variable {name}"),
        }
    }
}

/// Identity of one service within an accessory.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::accessory::{DeviceRef, ServiceSubtype};
///
/// let subtype: ServiceSubtype = "9-2-".parse().unwrap();
/// assert_eq!(subtype.device, DeviceRef::Device(9));
/// assert_eq!(subtype.button, Some(2));
/// assert!(subtype.is_push_button());
/// assert_eq!(subtype.to_string(), "9-2-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceSubtype {
    /// Backing device.
    pub device: DeviceRef,
    /// Virtual-device button id, for push-button services.
    pub button: Option<u64>,
    /// Whether the service drives a color controller.
    pub color: bool,
}

impl ServiceSubtype {
    /// Subtype of a plain device service.
    #[must_use]
    pub const fn device(id: u64) -> Self {
        Self {
            device: DeviceRef::Device(id),
            button: None,
            color: false,
        }
    }

    /// Subtype of a color controller service.
    #[must_use]
    pub const fn color(id: u64) -> Self {
        Self {
            device: DeviceRef::Device(id),
            button: None,
            color: true,
        }
    }

    /// Subtype of a virtual-device push button.
    #[must_use]
    pub const fn button(id: u64, button: u64) -> Self {
        Self {
            device: DeviceRef::Device(id),
            button: Some(button),
            color: false,
        }
    }

    /// Subtype of the security system service.
    #[must_use]
    pub const fn security_system() -> Self {
        Self {
            device: DeviceRef::SecuritySystem,
            button: None,
            color: false,
        }
    }

    /// Subtype of a global-variable switch.
    #[must_use]
    pub fn global_variable(name: impl Into<String>) -> Self {
        Self {
            device: DeviceRef::GlobalVariable(name.into()),
            button: None,
            color: false,
        }
    }

    /// Returns the hub device id for services backed by a real device.
    #[must_use]
    pub fn device_id(&self) -> Option<u64> {
        match self.device {
            DeviceRef::Device(id) => Some(id),
            _ => None,
        }
    }

    /// Push buttons are stateless and never read from the hub.
    #[must_use]
    pub fn is_push_button(&self) -> bool {
        self.button.is_some()
    }

    /// Returns true for the security system service.
    #[must_use]
    pub fn is_security_system(&self) -> bool {
        self.device == DeviceRef::SecuritySystem
    }

    /// Returns the variable name for global-variable switches.
    #[must_use]
    pub fn global_variable_name(&self) -> Option<&str> {
        match &self.device {
            DeviceRef::GlobalVariable(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.color { COLOR_MARKER } else { "" };
        match &self.device {
            DeviceRef::Device(id) => {
                let button = self.button.map(|b| b.to_string()).unwrap_or_default();
                write!(f, "{id}-{button}-{marker}")
            }
            DeviceRef::SecuritySystem => write!(f, "{SECURITY_SYSTEM_ID}--{marker}"),
            DeviceRef::GlobalVariable(name) => {
                write!(f, "{GLOBAL_VARIABLE_MARKER}-{name}-{marker}")
            }
        }
    }
}

impl FromStr for ServiceSubtype {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidSubtype(s.to_string());

        // Variable names may contain '-', so only the outer separators count.
        let (head, rest) = s.split_once('-').ok_or_else(invalid)?;
        let (middle, marker) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let color = match marker {
            "" => false,
            COLOR_MARKER => true,
            _ => return Err(invalid()),
        };

        let (device, button) = match head {
            GLOBAL_VARIABLE_MARKER if !middle.is_empty() => {
                (DeviceRef::GlobalVariable(middle.to_string()), None)
            }
            SECURITY_SYSTEM_ID if middle.is_empty() => (DeviceRef::SecuritySystem, None),
            id => {
                let id = id.parse().map_err(|_| invalid())?;
                let button = if middle.is_empty() {
                    None
                } else {
                    Some(middle.parse().map_err(|_| invalid())?)
                };
                (DeviceRef::Device(id), button)
            }
        };

        Ok(Self {
            device,
            button,
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_documented_form() {
        assert_eq!("5--".parse::<ServiceSubtype>().unwrap(), ServiceSubtype::device(5));
        assert_eq!("7--RGB".parse::<ServiceSubtype>().unwrap(), ServiceSubtype::color(7));
        assert_eq!(
            "9-2-".parse::<ServiceSubtype>().unwrap(),
            ServiceSubtype::button(9, 2)
        );
        assert_eq!(
            "0--".parse::<ServiceSubtype>().unwrap(),
            ServiceSubtype::security_system()
        );
        assert_eq!(
            "G-Vacation-".parse::<ServiceSubtype>().unwrap(),
            ServiceSubtype::global_variable("Vacation")
        );
    }

    #[test]
    fn display_matches_persisted_form() {
        assert_eq!(ServiceSubtype::device(5).to_string(), "5--");
        assert_eq!(ServiceSubtype::color(7).to_string(), "7--RGB");
        assert_eq!(ServiceSubtype::button(9, 2).to_string(), "9-2-");
        assert_eq!(ServiceSubtype::security_system().to_string(), "0--");
        assert_eq!(
            ServiceSubtype::global_variable("Away").to_string(),
            "G-Away-"
        );
    }

    #[test]
    fn global_variable_names_may_contain_dashes() {
        let subtype: ServiceSubtype = "G-night-mode-".parse().unwrap();
        assert_eq!(subtype.global_variable_name(), Some("night-mode"));
        assert_eq!(subtype.to_string(), "G-night-mode-");
    }

    #[test]
    fn rejects_malformed_subtypes() {
        for s in ["", "5", "5-", "x--", "5-a-", "5--HSV", "G--"] {
            assert!(s.parse::<ServiceSubtype>().is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn classification_helpers() {
        assert!(ServiceSubtype::button(1, 1).is_push_button());
        assert!(!ServiceSubtype::global_variable("x").is_push_button());
        assert!(ServiceSubtype::security_system().is_security_system());
        assert_eq!(ServiceSubtype::color(3).device_id(), Some(3));
        assert_eq!(ServiceSubtype::security_system().device_id(), None);
    }
}
