// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! This module provides the error hierarchy used across the crate: value
//! validation, hub communication, payload parsing, and accessory lookups.
//! None of these errors is fatal; the platform logs them and reports them
//! to the host runtime where a completion channel exists.

use thiserror::Error;

use crate::accessory::CharacteristicKind;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the Home Center.
    #[error("hub error: {0}")]
    Hub(#[from] HubError),

    /// Error occurred while parsing a payload or a persisted identifier.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A security-system scene required for a state change is missing.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// No cached accessory matches the given identity.
    #[error("accessory not found: {0}")]
    AccessoryNotFound(String),

    /// The accessory has no service with the given subtype.
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// The characteristic has no transform in the requested direction.
    #[error("characteristic {0} is not supported in this direction")]
    UnsupportedCharacteristic(CharacteristicKind),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u8),

    /// A hub color string could not be parsed.
    #[error("invalid color string: {0}")]
    InvalidColor(String),

    /// A security-system state string is not recognized.
    #[error("invalid security system state: {0}")]
    InvalidSecurityState(String),

    /// The characteristic value has the wrong type for the operation.
    #[error("expected {expected} value, got {actual}")]
    TypeMismatch {
        /// The type the transform expected.
        expected: &'static str,
        /// Debug rendering of the value received.
        actual: String,
    },
}

/// Errors related to Home Center communication.
#[derive(Debug, Error)]
pub enum HubError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the Home Center failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The Home Center answered with a non-success status.
    #[error("HTTP {code} - {reason}")]
    Status {
        /// Numeric status code.
        code: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The requested device does not exist on the hub.
    #[error("device {0} not found on hub")]
    DeviceNotFound(u64),
}

/// Errors related to parsing hub payloads and persisted identifiers.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A service subtype string does not have the `device-button-marker` shape.
    #[error("invalid service subtype: {0}")]
    InvalidSubtype(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
