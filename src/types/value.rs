// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dynamically typed characteristic value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A value carried by a characteristic.
///
/// The accessory protocol is loosely typed: booleans, integers, floats, and
/// strings all travel through the same get/set channel. Transforms use the
/// lenient accessors below, which coerce between numeric and boolean forms
/// the way the protocol clients do.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::types::CharacteristicValue;
///
/// let on = CharacteristicValue::from(true);
/// assert_eq!(on.as_bool(), Some(true));
///
/// let level = CharacteristicValue::Int(1);
/// assert_eq!(level.as_bool(), Some(true));
/// assert_eq!(level.as_f64(), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Text(String),
}

impl CharacteristicValue {
    /// Interprets the value as a boolean.
    ///
    /// Numbers are true when non-zero; the strings `"true"`/`"false"` and
    /// `"1"`/`"0"` are accepted.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::Text(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Interprets the value as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interprets the value as an integer, rounding floats.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            other => other.as_f64().map(|f| f.round() as i64),
        }
    }

    /// Like [`as_bool`](Self::as_bool), failing with a typed error.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TypeMismatch` if the value has no boolean reading.
    pub fn expect_bool(&self) -> Result<bool, ValueError> {
        self.as_bool().ok_or_else(|| self.mismatch("boolean"))
    }

    /// Like [`as_f64`](Self::as_f64), failing with a typed error.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TypeMismatch` if the value is not numeric.
    pub fn expect_f64(&self) -> Result<f64, ValueError> {
        self.as_f64().ok_or_else(|| self.mismatch("numeric"))
    }

    /// Like [`as_i64`](Self::as_i64), failing with a typed error.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TypeMismatch` if the value is not numeric.
    pub fn expect_i64(&self) -> Result<i64, ValueError> {
        self.as_i64().ok_or_else(|| self.mismatch("integer"))
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            actual: format!("{self:?}"),
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for CharacteristicValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_coercions() {
        assert_eq!(CharacteristicValue::Int(0).as_bool(), Some(false));
        assert_eq!(CharacteristicValue::Float(0.5).as_bool(), Some(true));
        assert_eq!(CharacteristicValue::from("true").as_bool(), Some(true));
        assert_eq!(CharacteristicValue::from("maybe").as_bool(), None);
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(CharacteristicValue::from("21.5").as_f64(), Some(21.5));
        assert_eq!(CharacteristicValue::Float(49.6).as_i64(), Some(50));
        assert_eq!(CharacteristicValue::Bool(true).as_i64(), Some(1));
    }

    #[test]
    fn expect_reports_type_mismatch() {
        let err = CharacteristicValue::from("abc").expect_f64().unwrap_err();
        assert!(matches!(err, ValueError::TypeMismatch { expected: "numeric", .. }));
    }

    #[test]
    fn untagged_serde() {
        let v: CharacteristicValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, CharacteristicValue::Bool(true));
        let v: CharacteristicValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, CharacteristicValue::Int(42));
        let v: CharacteristicValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(v, CharacteristicValue::Float(4.5));
    }
}
