// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform configuration.
//!
//! [`RawConfig`] mirrors the string-valued config block the host hands the
//! platform. [`PlatformConfig`] is its normalized form; invalid values fall
//! back to defaults instead of being rejected.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ParseError;

/// Raw platform config block, all values as the host supplies them.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::platform::{PlatformConfig, RawConfig};
///
/// let raw: RawConfig = serde_json::from_str(r#"{
///     "host": "192.168.1.20",
///     "pollerperiod": "0",
///     "switchglobalvariables": "Vacation, Guests"
/// }"#).unwrap();
/// let config = PlatformConfig::from(raw);
/// assert!(config.poll_interval.is_none());
/// assert_eq!(config.global_variable_switches, vec!["Vacation", "Guests"]);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Hub address.
    #[serde(default)]
    pub host: String,
    /// Hub user.
    pub username: Option<String>,
    /// Hub password.
    pub password: Option<String>,
    /// Poll period in seconds.
    pub pollerperiod: Option<String>,
    /// `"enabled"` to expose the security system.
    pub securitysystem: Option<String>,
    /// Comma separated global variable names.
    pub switchglobalvariables: Option<String>,
    /// Thermostat timeout in seconds.
    pub thermostattimeout: Option<String>,
    /// `"on"` to infer cooling from temperatures.
    pub enablecoolingstatemanagemnt: Option<String>,
    /// Comma separated device ids never exposed.
    pub excludedevices: Option<String>,
    /// Comma separated device ids always exposed.
    pub includedevices: Option<String>,
    /// `"true"` for dry-run.
    pub testmode: Option<String>,
}

/// Normalized platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Hub address.
    pub host: String,
    /// Hub credentials.
    pub credentials: Option<(String, String)>,
    /// Poll period; `None` disables polling.
    pub poll_interval: Option<Duration>,
    /// Whether the security system accessory is exposed.
    pub security_system: bool,
    /// Global variables exposed as switches.
    pub global_variable_switches: Vec<String>,
    /// How long a user-set thermostat state is trusted; `None` is forever.
    pub thermostat_timeout: Option<Duration>,
    /// Whether thermostats report cooling as well as heating.
    pub cooling_state_management: bool,
    /// Device ids never exposed.
    pub exclude: HashSet<u64>,
    /// Device ids exposed regardless of visibility.
    pub include: HashSet<u64>,
    /// Dry-run: log decisions, touch nothing.
    pub test_mode: bool,
    /// Window within which color channel writes are merged.
    pub color_debounce: Duration,
}

impl PlatformConfig {
    /// Default poll period.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
    /// Longest accepted poll period, in seconds.
    pub const MAX_POLL_SECONDS: u64 = 100;
    /// Default thermostat timeout.
    pub const DEFAULT_THERMOSTAT_TIMEOUT: Duration = Duration::from_secs(7200);
    /// Default color debounce window.
    pub const DEFAULT_COLOR_DEBOUNCE: Duration = Duration::from_millis(200);

    /// Creates a configuration with defaults for the given hub host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            credentials: None,
            poll_interval: Some(Self::DEFAULT_POLL_INTERVAL),
            security_system: false,
            global_variable_switches: Vec::new(),
            thermostat_timeout: Some(Self::DEFAULT_THERMOSTAT_TIMEOUT),
            cooling_state_management: false,
            exclude: HashSet::new(),
            include: HashSet::new(),
            test_mode: false,
            color_debounce: Self::DEFAULT_COLOR_DEBOUNCE,
        }
    }

    /// Parses a JSON config block.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the block is not a JSON object of
    /// strings.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Sets hub credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the poll period; `None` disables polling.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Enables the security system accessory.
    #[must_use]
    pub fn with_security_system(mut self, enabled: bool) -> Self {
        self.security_system = enabled;
        self
    }

    /// Adds a global variable switch.
    #[must_use]
    pub fn with_global_variable_switch(mut self, name: impl Into<String>) -> Self {
        self.global_variable_switches.push(name.into());
        self
    }

    /// Sets the thermostat timeout; `None` never expires.
    #[must_use]
    pub fn with_thermostat_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.thermostat_timeout = timeout;
        self
    }

    /// Enables cooling state management.
    #[must_use]
    pub fn with_cooling_state_management(mut self, enabled: bool) -> Self {
        self.cooling_state_management = enabled;
        self
    }

    /// Excludes a device id.
    #[must_use]
    pub fn with_excluded(mut self, id: u64) -> Self {
        self.exclude.insert(id);
        self
    }

    /// Includes a device id.
    #[must_use]
    pub fn with_included(mut self, id: u64) -> Self {
        self.include.insert(id);
        self
    }

    /// Enables dry-run mode.
    #[must_use]
    pub fn with_test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Sets the color debounce window.
    #[must_use]
    pub fn with_color_debounce(mut self, window: Duration) -> Self {
        self.color_debounce = window;
        self
    }

    /// Builds the hub connection configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn hub_config(&self) -> crate::hub::HubConfig {
        let config = crate::hub::HubConfig::new(self.host.clone());
        match &self.credentials {
            Some((user, pass)) => config.with_credentials(user.clone(), pass.clone()),
            None => config,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<RawConfig> for PlatformConfig {
    fn from(raw: RawConfig) -> Self {
        let credentials = match (raw.username, raw.password) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (Some(user), None) => Some((user, String::new())),
            _ => None,
        };

        Self {
            host: raw.host,
            credentials,
            poll_interval: parse_poll_interval(raw.pollerperiod.as_deref()),
            security_system: raw.securitysystem.as_deref() == Some("enabled"),
            global_variable_switches: split_list(raw.switchglobalvariables.as_deref())
                .map(str::to_string)
                .collect(),
            thermostat_timeout: parse_thermostat_timeout(raw.thermostattimeout.as_deref()),
            cooling_state_management: raw.enablecoolingstatemanagemnt.as_deref() == Some("on"),
            exclude: parse_ids(raw.excludedevices.as_deref()),
            include: parse_ids(raw.includedevices.as_deref()),
            test_mode: raw.testmode.as_deref() == Some("true"),
            color_debounce: Self::DEFAULT_COLOR_DEBOUNCE,
        }
    }
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_ids(value: Option<&str>) -> HashSet<u64> {
    split_list(value).filter_map(|s| s.parse().ok()).collect()
}

fn parse_poll_interval(value: Option<&str>) -> Option<Duration> {
    let Some(value) = value else {
        return Some(PlatformConfig::DEFAULT_POLL_INTERVAL);
    };
    match value.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) if secs <= PlatformConfig::MAX_POLL_SECONDS => Some(Duration::from_secs(secs)),
        _ => {
            tracing::warn!(value, "Invalid poller period, using default");
            Some(PlatformConfig::DEFAULT_POLL_INTERVAL)
        }
    }
}

fn parse_thermostat_timeout(value: Option<&str>) -> Option<Duration> {
    let Some(value) = value else {
        return Some(PlatformConfig::DEFAULT_THERMOSTAT_TIMEOUT);
    };
    match value.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => Some(PlatformConfig::DEFAULT_THERMOSTAT_TIMEOUT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> PlatformConfig {
        PlatformConfig::from_json(json).unwrap()
    }

    #[test]
    fn defaults_when_absent() {
        let config = raw(r#"{"host": "hc2"}"#);
        assert_eq!(config.poll_interval, Some(Duration::from_secs(5)));
        assert_eq!(config.thermostat_timeout, Some(Duration::from_secs(7200)));
        assert!(!config.security_system);
        assert!(!config.cooling_state_management);
        assert!(!config.test_mode);
        assert!(config.global_variable_switches.is_empty());
        assert!(config.credentials.is_none());
        assert_eq!(config.color_debounce, Duration::from_millis(200));
    }

    #[test]
    fn poll_interval_zero_disables() {
        assert!(raw(r#"{"pollerperiod": "0"}"#).poll_interval.is_none());
    }

    #[test]
    fn poll_interval_out_of_range_uses_default() {
        for value in ["101", "-3", "abc", ""] {
            let config = raw(&format!(r#"{{"pollerperiod": "{value}"}}"#));
            assert_eq!(config.poll_interval, Some(Duration::from_secs(5)), "{value}");
        }
        assert_eq!(
            raw(r#"{"pollerperiod": "100"}"#).poll_interval,
            Some(Duration::from_secs(100))
        );
    }

    #[test]
    fn thermostat_timeout_zero_is_infinite() {
        assert!(raw(r#"{"thermostattimeout": "0"}"#).thermostat_timeout.is_none());
        assert_eq!(
            raw(r#"{"thermostattimeout": "60"}"#).thermostat_timeout,
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn flags_require_exact_values() {
        let config = raw(
            r#"{"securitysystem": "enabled", "enablecoolingstatemanagemnt": "on", "testmode": "true"}"#,
        );
        assert!(config.security_system);
        assert!(config.cooling_state_management);
        assert!(config.test_mode);

        let config = raw(r#"{"securitysystem": "yes", "testmode": "TRUE"}"#);
        assert!(!config.security_system);
        assert!(!config.test_mode);
    }

    #[test]
    fn id_lists_drop_non_numeric_entries() {
        let config = raw(r#"{"excludedevices": "5, 7,x,,9", "includedevices": "12"}"#);
        assert_eq!(config.exclude, HashSet::from([5, 7, 9]));
        assert_eq!(config.include, HashSet::from([12]));
    }

    #[test]
    fn global_variable_switches_are_trimmed() {
        let config = raw(r#"{"switchglobalvariables": " Vacation ,, Guests "}"#);
        assert_eq!(config.global_variable_switches, vec!["Vacation", "Guests"]);
    }

    #[test]
    fn credentials_from_raw() {
        let config = raw(r#"{"host": "hc2", "username": "admin", "password": "pw"}"#);
        assert_eq!(
            config.credentials,
            Some(("admin".to_string(), "pw".to_string()))
        );
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            PlatformConfig::from_json("[1, 2]"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn builder_chain() {
        let config = PlatformConfig::new("hc2")
            .with_poll_interval(None)
            .with_security_system(true)
            .with_global_variable_switch("Away")
            .with_excluded(3)
            .with_included(4)
            .with_test_mode(true)
            .with_color_debounce(Duration::from_millis(50));
        assert!(config.poll_interval.is_none());
        assert!(config.security_system);
        assert_eq!(config.global_variable_switches, vec!["Away"]);
        assert!(config.exclude.contains(&3));
        assert!(config.include.contains(&4));
        assert!(config.test_mode);
        assert_eq!(config.color_debounce, Duration::from_millis(50));
    }

    #[cfg(feature = "http")]
    #[test]
    fn hub_config_carries_credentials() {
        let config = PlatformConfig::new("hc2").with_credentials("admin", "pw");
        let hub = config.hub_config();
        assert_eq!(hub.host(), "hc2");
        assert_eq!(hub.credentials(), Some(("admin", "pw")));
    }
}
