// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating/cooling state inference for setpoint devices.
//!
//! Setpoint devices only report temperatures. The mode a user selected and
//! the target they set are remembered here, with a timestamp; once the
//! configured timeout passes without a new write the mode lapses to off.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::HeatingCoolingState;

#[derive(Debug, Clone, Copy)]
struct Entry {
    mode: HeatingCoolingState,
    target: Option<f64>,
    updated: Instant,
}

/// Remembers user-set thermostat modes and targets per device.
#[derive(Debug, Default)]
pub struct ThermostatTracker {
    timeout: Option<Duration>,
    cooling: bool,
    entries: HashMap<u64, Entry>,
}

impl ThermostatTracker {
    /// Creates a tracker. `timeout` of `None` never lapses.
    #[must_use]
    pub fn new(timeout: Option<Duration>, cooling_state_management: bool) -> Self {
        Self {
            timeout,
            cooling: cooling_state_management,
            entries: HashMap::new(),
        }
    }

    /// Records a user-selected mode.
    pub fn record_mode(&mut self, device_id: u64, mode: HeatingCoolingState) {
        let now = Instant::now();
        self.entries
            .entry(device_id)
            .and_modify(|e| {
                e.mode = mode;
                e.updated = now;
            })
            .or_insert(Entry {
                mode,
                target: None,
                updated: now,
            });
    }

    /// Records a user-set target temperature.
    ///
    /// Setting a target on a thermostat that was off turns it to heat.
    pub fn record_target(&mut self, device_id: u64, target: f64) {
        let now = Instant::now();
        let entry = self.entries.entry(device_id).or_insert(Entry {
            mode: HeatingCoolingState::Heat,
            target: None,
            updated: now,
        });
        if entry.mode == HeatingCoolingState::Off {
            entry.mode = HeatingCoolingState::Heat;
        }
        entry.target = Some(target);
        entry.updated = now;
    }

    fn live_entry(&self, device_id: u64) -> Option<&Entry> {
        let entry = self.entries.get(&device_id)?;
        match self.timeout {
            Some(timeout) if entry.updated.elapsed() > timeout => None,
            _ => Some(entry),
        }
    }

    /// Mode to report as the target heating/cooling state.
    ///
    /// Devices with no record report heat; lapsed records report off.
    #[must_use]
    pub fn target_state(&self, device_id: u64) -> HeatingCoolingState {
        if !self.entries.contains_key(&device_id) {
            return HeatingCoolingState::Heat;
        }
        self.live_entry(device_id)
            .map_or(HeatingCoolingState::Off, |e| e.mode)
    }

    /// Current heating/cooling state given the measured temperature and the
    /// device's target level.
    #[must_use]
    pub fn current_state(
        &self,
        device_id: u64,
        current: Option<f64>,
        target: Option<f64>,
    ) -> HeatingCoolingState {
        let mode = self.target_state(device_id);
        if mode == HeatingCoolingState::Off {
            return HeatingCoolingState::Off;
        }
        if !self.cooling {
            return HeatingCoolingState::Heat;
        }
        let target = self
            .live_entry(device_id)
            .and_then(|e| e.target)
            .or(target);
        let (Some(current), Some(target)) = (current, target) else {
            return HeatingCoolingState::Off;
        };
        let wants_heat = matches!(mode, HeatingCoolingState::Heat | HeatingCoolingState::Auto);
        let wants_cool = matches!(mode, HeatingCoolingState::Cool | HeatingCoolingState::Auto);
        if target > current && wants_heat {
            HeatingCoolingState::Heat
        } else if target < current && wants_cool {
            HeatingCoolingState::Cool
        } else {
            HeatingCoolingState::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_device_reports_heat() {
        let tracker = ThermostatTracker::new(None, false);
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Heat);
        assert_eq!(
            tracker.current_state(1, Some(20.0), Some(22.0)),
            HeatingCoolingState::Heat
        );
    }

    #[test]
    fn off_mode_is_reported() {
        let mut tracker = ThermostatTracker::new(None, false);
        tracker.record_mode(1, HeatingCoolingState::Off);
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Off);
        assert_eq!(tracker.current_state(1, None, None), HeatingCoolingState::Off);
    }

    #[test]
    fn setting_a_target_turns_heat_on() {
        let mut tracker = ThermostatTracker::new(None, false);
        tracker.record_mode(1, HeatingCoolingState::Off);
        tracker.record_target(1, 21.0);
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Heat);
    }

    #[test]
    fn cooling_management_compares_temperatures() {
        let mut tracker = ThermostatTracker::new(None, true);
        tracker.record_mode(1, HeatingCoolingState::Auto);
        assert_eq!(
            tracker.current_state(1, Some(18.0), Some(21.0)),
            HeatingCoolingState::Heat
        );
        assert_eq!(
            tracker.current_state(1, Some(25.0), Some(21.0)),
            HeatingCoolingState::Cool
        );
        assert_eq!(
            tracker.current_state(1, Some(21.0), Some(21.0)),
            HeatingCoolingState::Off
        );

        tracker.record_mode(1, HeatingCoolingState::Heat);
        assert_eq!(
            tracker.current_state(1, Some(25.0), Some(21.0)),
            HeatingCoolingState::Off
        );
    }

    #[test]
    fn recorded_target_wins_over_reported() {
        let mut tracker = ThermostatTracker::new(None, true);
        tracker.record_target(1, 24.0);
        assert_eq!(
            tracker.current_state(1, Some(22.0), Some(18.0)),
            HeatingCoolingState::Heat
        );
    }

    #[tokio::test(start_paused = true)]
    async fn entries_lapse_after_timeout() {
        let mut tracker = ThermostatTracker::new(Some(Duration::from_secs(60)), false);
        tracker.record_mode(1, HeatingCoolingState::Heat);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Heat);
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Off);
        assert_eq!(tracker.current_state(1, Some(10.0), Some(20.0)), HeatingCoolingState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn no_timeout_never_lapses() {
        let mut tracker = ThermostatTracker::new(None, false);
        tracker.record_mode(1, HeatingCoolingState::Cool);
        tokio::time::advance(Duration::from_secs(100_000)).await;
        assert_eq!(tracker.target_state(1), HeatingCoolingState::Cool);
    }
}
