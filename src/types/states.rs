// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enumerated characteristic states.
//!
//! The accessory protocol encodes these as small integers. Each type maps
//! between that integer and, where the Home Center has one, its string form.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Security system state, shared by the current and target characteristics.
///
/// The Home Center side is a global variable named `SecuritySystem` holding
/// one of the string forms below.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::types::SecuritySystemState;
///
/// let state: SecuritySystemState = "AwayArmed".parse().unwrap();
/// assert_eq!(state, SecuritySystemState::AwayArm);
/// assert_eq!(state.as_num(), 1);
/// assert_eq!(state.scene_name(), Some("SetAwayArmed"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecuritySystemState {
    /// Armed, occupants at home.
    StayArm,
    /// Armed, nobody home.
    AwayArm,
    /// Armed for the night.
    NightArm,
    /// Disarmed.
    Disarmed,
    /// Alarm triggered. Only valid as a current state.
    AlarmTriggered,
}

impl SecuritySystemState {
    /// Returns the Home Center global variable value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StayArm => "StayArmed",
            Self::AwayArm => "AwayArmed",
            Self::NightArm => "NightArmed",
            Self::Disarmed => "Disarmed",
            Self::AlarmTriggered => "AlarmTriggered",
        }
    }

    /// Returns the protocol's numeric encoding.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarmed => 3,
            Self::AlarmTriggered => 4,
        }
    }

    /// Decodes the protocol's numeric encoding.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for values above 4.
    pub fn from_num(value: i64) -> Result<Self, ValueError> {
        match value {
            0 => Ok(Self::StayArm),
            1 => Ok(Self::AwayArm),
            2 => Ok(Self::NightArm),
            3 => Ok(Self::Disarmed),
            4 => Ok(Self::AlarmTriggered),
            other => Err(ValueError::OutOfRange {
                min: 0,
                max: 4,
                actual: u16::try_from(other).unwrap_or(u16::MAX),
            }),
        }
    }

    /// Name of the Home Center scene that moves the system into this state.
    ///
    /// `AlarmTriggered` cannot be requested and has no scene.
    #[must_use]
    pub const fn scene_name(&self) -> Option<&'static str> {
        match self {
            Self::StayArm => Some("SetStayArmed"),
            Self::AwayArm => Some("SetAwayArmed"),
            Self::NightArm => Some("SetNightArmed"),
            Self::Disarmed => Some("SetDisarmed"),
            Self::AlarmTriggered => None,
        }
    }

    /// Target state to report for this current state.
    ///
    /// A triggered alarm keeps the system armed, reported as away.
    #[must_use]
    pub const fn as_target(&self) -> Self {
        match self {
            Self::AlarmTriggered => Self::AwayArm,
            other => *other,
        }
    }
}

impl fmt::Display for SecuritySystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecuritySystemState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "StayArmed" => Ok(Self::StayArm),
            "AwayArmed" => Ok(Self::AwayArm),
            "NightArmed" => Ok(Self::NightArm),
            "Disarmed" => Ok(Self::Disarmed),
            "AlarmTriggered" => Ok(Self::AlarmTriggered),
            other => Err(ValueError::InvalidSecurityState(other.to_string())),
        }
    }
}

/// Heating/cooling mode of a thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeatingCoolingState {
    /// Not heating or cooling.
    #[default]
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Automatic. Only valid as a target.
    Auto,
}

impl HeatingCoolingState {
    /// Returns the protocol's numeric encoding.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Heat => 1,
            Self::Cool => 2,
            Self::Auto => 3,
        }
    }

    /// Decodes the protocol's numeric encoding; unknown values read as `Off`.
    #[must_use]
    pub const fn from_num(value: i64) -> Self {
        match value {
            1 => Self::Heat,
            2 => Self::Cool,
            3 => Self::Auto,
            _ => Self::Off,
        }
    }
}

/// Lock mechanism state, shared by current and target characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    /// Unlocked.
    Unsecured,
    /// Locked.
    Secured,
}

impl LockState {
    /// Returns the protocol's numeric encoding.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Unsecured => 0,
            Self::Secured => 1,
        }
    }

    /// Returns the Home Center action that moves the lock into this state.
    #[must_use]
    pub const fn hub_action(&self) -> &'static str {
        match self {
            Self::Unsecured => "unsecure",
            Self::Secured => "secure",
        }
    }
}

impl From<bool> for LockState {
    fn from(secured: bool) -> Self {
        if secured { Self::Secured } else { Self::Unsecured }
    }
}

/// Contact sensor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactState {
    /// Contact detected (closed).
    Detected,
    /// Contact not detected (open).
    NotDetected,
}

impl ContactState {
    /// Returns the protocol's numeric encoding.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Detected => 0,
            Self::NotDetected => 1,
        }
    }

    /// Maps the hub's breached flag (`true` = open) to a contact state.
    #[must_use]
    pub const fn from_breached(breached: bool) -> Self {
        if breached {
            Self::NotDetected
        } else {
            Self::Detected
        }
    }
}

/// Window covering movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionState {
    /// Moving towards closed.
    Decreasing,
    /// Moving towards open.
    Increasing,
    /// Not moving.
    Stopped,
}

impl PositionState {
    /// Returns the protocol's numeric encoding.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Decreasing => 0,
            Self::Increasing => 1,
            Self::Stopped => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_state_parses_hub_strings() {
        for state in [
            SecuritySystemState::StayArm,
            SecuritySystemState::AwayArm,
            SecuritySystemState::NightArm,
            SecuritySystemState::Disarmed,
            SecuritySystemState::AlarmTriggered,
        ] {
            assert_eq!(state.as_str().parse::<SecuritySystemState>().unwrap(), state);
            assert_eq!(
                SecuritySystemState::from_num(i64::from(state.as_num())).unwrap(),
                state
            );
        }
    }

    #[test]
    fn security_state_rejects_unknown() {
        assert!(matches!(
            "Panic".parse::<SecuritySystemState>(),
            Err(ValueError::InvalidSecurityState(s)) if s == "Panic"
        ));
        assert!(SecuritySystemState::from_num(7).is_err());
    }

    #[test]
    fn triggered_alarm_has_no_scene_and_targets_away() {
        let state = SecuritySystemState::AlarmTriggered;
        assert_eq!(state.scene_name(), None);
        assert_eq!(state.as_target(), SecuritySystemState::AwayArm);
    }

    #[test]
    fn heating_state_unknown_reads_off() {
        assert_eq!(HeatingCoolingState::from_num(9), HeatingCoolingState::Off);
        assert_eq!(HeatingCoolingState::from_num(2), HeatingCoolingState::Cool);
    }

    #[test]
    fn lock_and_contact_mapping() {
        assert_eq!(LockState::from(true).hub_action(), "secure");
        assert_eq!(LockState::from(false).as_num(), 0);
        assert_eq!(ContactState::from_breached(true).as_num(), 1);
        assert_eq!(PositionState::Stopped.as_num(), 2);
    }
}
