// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb configuration as provided by the host platform.
//!
//! The host hands each accessory a JSON object. [`BulbConfig`] mirrors that
//! object (camelCase keys) and fills in the vendor defaults for anything
//! left out. Only absent keys take a default: an explicit `0` is kept as
//! configured, so `"brightMin": 0` means a vendor range starting at zero.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a single bulb.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::BulbConfig;
///
/// let config = BulbConfig::from_json(
///     r#"{ "devId": "0123456789abcdef", "type": "dimmable tunable color" }"#,
/// ).unwrap();
///
/// assert_eq!(config.display_name(), "Smart Bulb cdef");
/// assert_eq!(config.bright_min, 25);
/// assert_eq!(config.bright_max, 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulbConfig {
    /// Vendor device identifier.
    pub dev_id: String,

    /// Capability tokens (`dimmable`, `tunable`, `color`), in any order.
    #[serde(rename = "type", default)]
    pub device_type: String,

    /// Display name. Derived from the device id when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Lowest vendor brightness value.
    #[serde(default = "default_bright_min")]
    pub bright_min: i64,

    /// Highest vendor brightness value.
    #[serde(default = "default_bright_max")]
    pub bright_max: i64,

    /// Lowest vendor white temperature value (warmest).
    #[serde(default)]
    pub temp_min: i64,

    /// Highest vendor white temperature value (coolest).
    #[serde(default = "default_temp_max")]
    pub temp_max: i64,

    /// Report device errors at error level instead of debug level.
    #[serde(default)]
    pub log_errors: bool,

    /// Manufacturer shown by the host platform.
    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Model shown by the host platform.
    #[serde(default)]
    pub model: Option<String>,
}

const fn default_bright_min() -> i64 {
    25
}

const fn default_bright_max() -> i64 {
    255
}

const fn default_temp_max() -> i64 {
    255
}

impl BulbConfig {
    /// Creates a configuration with vendor defaults for the given device.
    #[must_use]
    pub fn new(dev_id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            dev_id: dev_id.into(),
            device_type: device_type.into(),
            name: None,
            bright_min: default_bright_min(),
            bright_max: default_bright_max(),
            temp_min: 0,
            temp_max: default_temp_max(),
            log_errors: false,
            manufacturer: None,
            model: None,
        }
    }

    /// Parses a configuration from the host's JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the JSON is malformed and
    /// `ConfigError::MissingDeviceId` if `devId` is empty.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.dev_id.is_empty() {
            return Err(ConfigError::MissingDeviceId);
        }
        Ok(config)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the vendor brightness range.
    #[must_use]
    pub fn with_brightness_range(mut self, min: i64, max: i64) -> Self {
        self.bright_min = min;
        self.bright_max = max;
        self
    }

    /// Sets the vendor white temperature range.
    #[must_use]
    pub fn with_white_temp_range(mut self, min: i64, max: i64) -> Self {
        self.temp_min = min;
        self.temp_max = max;
        self
    }

    /// Enables error-level reporting of device errors.
    #[must_use]
    pub fn with_log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = enabled;
        self
    }

    /// Returns the configured name, or `Smart Bulb <last 4 of devId>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Smart Bulb {}", tail(&self.dev_id, 4)),
        }
    }

    /// Returns true if the type string contains `token`.
    #[must_use]
    pub fn has_token(&self, token: &str) -> bool {
        self.device_type.contains(token)
    }

    /// Returns the accessory information shown by the host platform.
    #[must_use]
    pub fn accessory_info(&self) -> AccessoryInfo {
        AccessoryInfo {
            manufacturer: self.manufacturer.clone().unwrap_or_default(),
            model: self.model.clone().unwrap_or_default(),
            serial_number: tail(&self.dev_id, 8).to_string(),
        }
    }
}

/// Descriptive metadata for the host's accessory information service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryInfo {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Serial number, the last 8 characters of the device id.
    pub serial_number: String,
}

fn tail(s: &str, n: usize) -> &str {
    let start = s
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let config = BulbConfig::from_json(r#"{ "devId": "abc123", "type": "dimmable" }"#).unwrap();
        assert_eq!(config.bright_min, 25);
        assert_eq!(config.bright_max, 255);
        assert_eq!(config.temp_min, 0);
        assert_eq!(config.temp_max, 255);
        assert!(!config.log_errors);
        assert!(config.has_token("dimmable"));
        assert!(!config.has_token("color"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let json = r#"{
            "devId": "bf0123456789abcd",
            "type": "dimmable tunable",
            "name": "Desk Lamp",
            "brightMin": 10,
            "brightMax": 1000,
            "tempMin": 0,
            "tempMax": 1000,
            "logErrors": true,
            "manufacturer": "Acme",
            "model": "A19"
        }"#;
        let config = BulbConfig::from_json(json).unwrap();
        assert_eq!(config.display_name(), "Desk Lamp");
        assert_eq!(config.bright_min, 10);
        assert_eq!(config.bright_max, 1000);
        assert_eq!(config.temp_max, 1000);
        assert!(config.log_errors);
    }

    #[test]
    fn explicit_zero_is_kept() {
        let json = r#"{ "devId": "abc123", "brightMin": 0, "tempMax": 0, "tempMin": 0 }"#;
        let config = BulbConfig::from_json(json).unwrap();
        assert_eq!(config.bright_min, 0);
        assert_eq!(config.bright_max, 255);
        assert_eq!(config.temp_max, 0);
    }

    #[test]
    fn display_name_falls_back_to_device_id() {
        let config = BulbConfig::new("0123456789abcdef", "color");
        assert_eq!(config.display_name(), "Smart Bulb cdef");

        let short = BulbConfig::new("ab", "color");
        assert_eq!(short.display_name(), "Smart Bulb ab");
    }

    #[test]
    fn accessory_info_uses_last_eight_chars() {
        let mut config = BulbConfig::new("0123456789abcdef", "color");
        config.manufacturer = Some("Acme".to_string());
        let info = config.accessory_info();
        assert_eq!(info.serial_number, "89abcdef");
        assert_eq!(info.manufacturer, "Acme");
        assert_eq!(info.model, "");
    }

    #[test]
    fn missing_device_id_is_rejected() {
        let result = BulbConfig::from_json(r#"{ "devId": "", "type": "color" }"#);
        assert!(matches!(result, Err(ConfigError::MissingDeviceId)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = BulbConfig::from_json(r#"{ "type": "color" }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
