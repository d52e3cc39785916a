// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-level access to the vendor device.
//!
//! The bulb logic never speaks the vendor's network protocol. It relies on
//! a [`PropertyClient`] that can read and write single indexed properties.
//!
//! - [`PropertyValue`]: the value of one property
//! - [`SimulatedDevice`]: an in-memory client with fault injection

mod simulated;

pub use simulated::{SimulatedDevice, WriteRecord};

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CommunicationError;

/// The value of a single vendor property.
///
/// Serialized untagged, so it maps directly onto JSON property payloads:
/// `true`, `139`, `"colour"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// On/off switches.
    Bool(bool),
    /// Brightness and white temperature levels.
    Number(i64),
    /// Mode flags and packed color strings.
    Text(String),
}

impl PropertyValue {
    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    #[must_use]
    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Reads and writes indexed properties on a vendor device.
///
/// Implementations own transport, sessions, retries and timeouts. Both
/// operations are fallible; the bulb decides per operation whether a
/// failure is surfaced or replaced by a fallback.
#[allow(async_fn_in_trait)]
pub trait PropertyClient {
    /// Reads one property.
    ///
    /// Returns `Ok(None)` when the device has never reported the property.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationError` if the device cannot be read.
    async fn get_property(
        &self,
        device_id: &str,
        index: u8,
    ) -> Result<Option<PropertyValue>, CommunicationError>;

    /// Writes one property and reports whether the device accepted it.
    ///
    /// # Errors
    ///
    /// Returns `CommunicationError` if the write cannot be delivered.
    async fn set_property(
        &self,
        device_id: &str,
        index: u8,
        value: PropertyValue,
    ) -> Result<bool, CommunicationError>;

    /// Minimum interval the device needs between two writes.
    fn write_interval(&self, device_id: &str) -> Duration {
        let _ = device_id;
        Duration::ZERO
    }
}

impl<C: PropertyClient> PropertyClient for &C {
    async fn get_property(
        &self,
        device_id: &str,
        index: u8,
    ) -> Result<Option<PropertyValue>, CommunicationError> {
        (**self).get_property(device_id, index).await
    }

    async fn set_property(
        &self,
        device_id: &str,
        index: u8,
        value: PropertyValue,
    ) -> Result<bool, CommunicationError> {
        (**self).set_property(device_id, index, value).await
    }

    fn write_interval(&self, device_id: &str) -> Duration {
        (**self).write_interval(device_id)
    }
}

impl<C: PropertyClient> PropertyClient for std::sync::Arc<C> {
    async fn get_property(
        &self,
        device_id: &str,
        index: u8,
    ) -> Result<Option<PropertyValue>, CommunicationError> {
        (**self).get_property(device_id, index).await
    }

    async fn set_property(
        &self,
        device_id: &str,
        index: u8,
        value: PropertyValue,
    ) -> Result<bool, CommunicationError> {
        (**self).set_property(device_id, index, value).await
    }

    fn write_interval(&self, device_id: &str) -> Duration {
        (**self).write_interval(device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_value_json_shapes() {
        let values: Vec<PropertyValue> =
            serde_json::from_str(r#"[true, 139, "colour", "1F709900c8503c"]"#).unwrap();
        assert_eq!(values[0], PropertyValue::Bool(true));
        assert_eq!(values[1], PropertyValue::Number(139));
        assert_eq!(values[2].as_text(), Some("colour"));
        assert_eq!(
            serde_json::to_string(&PropertyValue::from(false)).unwrap(),
            "false"
        );
    }

    #[test]
    fn accessors_reject_other_types() {
        let value = PropertyValue::from(42);
        assert_eq!(value.as_number(), Some(42));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_text(), None);
        assert_eq!(value.to_string(), "42");
        assert_eq!(PropertyValue::from("white").to_string(), "\"white\"");
    }
}
