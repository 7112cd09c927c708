// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Center data model: devices, their properties, and scenes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A device record as returned by the Home Center.
///
/// This is an immutable snapshot; every load cycle and every poller tick
/// fetches fresh records.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::hub::Device;
///
/// let json = r#"{
///     "id": 5, "name": "Lamp", "roomID": 1,
///     "type": "com.fibaro.binarySwitch", "visible": true,
///     "properties": {"value": "true"}
/// }"#;
/// let device: Device = serde_json::from_str(json).unwrap();
/// assert_eq!(device.room_id, 1);
/// assert_eq!(device.properties.as_bool("value"), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Hub-assigned device id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Id of the room the device belongs to.
    #[serde(rename = "roomID", default)]
    pub room_id: u64,
    /// Device type identifier, e.g. `com.fibaro.binarySwitch`.
    #[serde(rename = "type", default)]
    pub device_type: String,
    /// Whether the device is visible in the Home Center UI.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Type-specific properties.
    #[serde(default)]
    pub properties: DeviceProperties,
}

fn default_visible() -> bool {
    true
}

impl Device {
    /// Creates a device record with no properties.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, room_id: u64, device_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            room_id,
            device_type: device_type.into(),
            visible: true,
            properties: DeviceProperties::default(),
        }
    }

    /// Sets the visibility flag.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets a single property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.0.insert(name.into(), value.into());
        self
    }
}

/// Free-form property map of a device.
///
/// The Home Center reports most scalar properties as strings (`"true"`,
/// `"45"`, `"21.50"`), sometimes as JSON numbers or booleans. The accessors
/// accept either form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceProperties(pub Map<String, Value>);

impl DeviceProperties {
    /// Returns the raw JSON value of a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a scalar property rendered as text.
    ///
    /// Strings are returned as-is; numbers and booleans are formatted.
    /// Structured values and nulls yield `None`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Reads a property as a boolean.
    ///
    /// `"true"`, `true`, and non-zero numbers read as `true`.
    #[must_use]
    pub fn as_bool(&self, name: &str) -> Option<bool> {
        match self.0.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                other => other.parse::<f64>().ok().map(|f| f != 0.0),
            },
            _ => None,
        }
    }

    /// Reads a property as a float.
    #[must_use]
    pub fn as_f64(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns the `deviceControlType` code, if present.
    #[must_use]
    pub fn control_type(&self) -> Option<String> {
        self.text("deviceControlType")
    }

    /// Decodes the virtual-device `rows` property.
    ///
    /// Missing or malformed rows yield an empty list.
    #[must_use]
    pub fn rows(&self) -> Vec<ButtonRow> {
        self.0
            .get("rows")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

/// One row of a virtual device's UI definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonRow {
    /// Row type; only `"button"` rows produce push buttons.
    #[serde(rename = "type", default)]
    pub row_type: String,
    /// Elements of the row.
    #[serde(default)]
    pub elements: Vec<ButtonElement>,
}

impl ButtonRow {
    /// Returns true for rows holding push buttons.
    #[must_use]
    pub fn is_button_row(&self) -> bool {
        self.row_type == "button"
    }
}

/// A single element of a virtual-device row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonElement {
    /// Element id, unique within the device.
    pub id: u64,
    /// Caption shown on the button.
    #[serde(default)]
    pub caption: String,
}

/// A Home Center scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene id.
    pub id: u64,
    /// Scene name.
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn device_defaults_visible_and_empty_properties() {
        let device: Device = serde_json::from_value(json!({"id": 3, "name": "x"})).unwrap();
        assert!(device.visible);
        assert!(device.properties.0.is_empty());
        assert_eq!(device.device_type, "");
    }

    #[test]
    fn property_accessors_accept_strings_and_numbers() {
        let device = Device::new(1, "d", 1, "t")
            .with_property("value", "21.50")
            .with_property("power", 0)
            .with_property("dead", false);
        let p = &device.properties;
        assert_eq!(p.as_f64("value"), Some(21.5));
        assert_eq!(p.as_bool("value"), Some(true));
        assert_eq!(p.as_bool("power"), Some(false));
        assert_eq!(p.text("power").as_deref(), Some("0"));
        assert_eq!(p.text("dead").as_deref(), Some("false"));
        assert_eq!(p.as_f64("missing"), None);
    }

    #[test]
    fn rows_decode_button_elements() {
        let device = Device::new(9, "vd", 2, "virtual_device").with_property(
            "rows",
            json!([
                {"type": "label", "elements": [{"id": 1, "caption": "Title"}]},
                {"type": "button", "elements": [
                    {"id": 2, "caption": "Open"},
                    {"id": 3, "caption": "Close"}
                ]}
            ]),
        );
        let rows = device.properties.rows();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_button_row());
        assert_eq!(rows[1].elements[1].caption, "Close");
    }

    #[test]
    fn malformed_rows_are_empty() {
        let device = Device::new(9, "vd", 2, "virtual_device").with_property("rows", "nope");
        assert!(device.properties.rows().is_empty());
    }
}
