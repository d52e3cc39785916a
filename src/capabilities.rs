// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb capability profile.
//!
//! A [`CapabilityProfile`] is derived once from the [`BulbConfig`] and never
//! mutated afterwards. It records which features the bulb has, which
//! vendor property index carries each feature, and the numeric ranges on
//! both sides of the translation.
//!
//! # Property layout
//!
//! | Property      | white-only bulb          | color bulb |
//! |---------------|--------------------------|------------|
//! | on/off        | 1                        | 1          |
//! | mode          | -                        | 2          |
//! | brightness    | 2 (dimmable)             | 3          |
//! | white temp    | 3 (tunable)              | 4          |
//! | color         | -                        | 5          |

use crate::config::BulbConfig;
use crate::error::ConfigError;

/// An inclusive numeric range with a non-zero width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    min: i64,
    max: i64,
}

impl ValueRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyRange` if `min == max`, since the width is
    /// used as a divisor when rescaling.
    pub fn new(name: &'static str, min: i64, max: i64) -> Result<Self, ConfigError> {
        if min == max {
            return Err(ConfigError::EmptyRange { name, min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// `max - min`, never zero.
    #[must_use]
    pub const fn delta(&self) -> i64 {
        self.max - self.min
    }

    /// Returns true if `value` lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min.min(self.max)..=self.max.max(self.min)).contains(&value)
    }
}

/// Vendor property indices. `None` means the bulb lacks the feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMap {
    /// On/off switch.
    pub on_off: u8,
    /// White/colour mode flag.
    pub mode: Option<u8>,
    /// Brightness level.
    pub brightness: Option<u8>,
    /// White temperature level.
    pub white_temp: Option<u8>,
    /// Packed color string.
    pub color: Option<u8>,
}

impl PropertyMap {
    /// Returns the standard layout for the given feature set.
    #[must_use]
    pub const fn for_features(dimmable: bool, tunable: bool, color: bool) -> Self {
        let brightness = match (dimmable, color) {
            (false, _) => None,
            (true, true) => Some(3),
            (true, false) => Some(2),
        };
        let white_temp = match (tunable, color) {
            (false, _) => None,
            (true, true) => Some(4),
            (true, false) => Some(3),
        };
        Self {
            on_off: 1,
            mode: if color { Some(2) } else { None },
            brightness,
            white_temp,
            color: if color { Some(5) } else { None },
        }
    }
}

/// What a bulb can do and how its values are laid out.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::{BulbConfig, CapabilityProfile};
///
/// let config = BulbConfig::new("0123456789abcdef", "dimmable color");
/// let profile = CapabilityProfile::from_config(&config).unwrap();
///
/// assert!(profile.is_dimmable());
/// assert!(profile.is_color());
/// assert!(!profile.is_tunable());
/// assert_eq!(profile.properties().brightness, Some(3));
/// assert_eq!(profile.platform_brightness().min(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
// Each flag is an independent feature of the bulb.
#[allow(clippy::struct_excessive_bools)]
pub struct CapabilityProfile {
    dimmable: bool,
    tunable: bool,
    color: bool,
    properties: PropertyMap,
    brightness: ValueRange,
    white_temp: ValueRange,
    platform_brightness: ValueRange,
    platform_white_temp: ValueRange,
}

impl CapabilityProfile {
    /// Default platform brightness range.
    pub const PLATFORM_BRIGHTNESS: (i64, i64) = (1, 100);

    /// Default platform color temperature range, in mireds.
    pub const PLATFORM_WHITE_TEMP: (i64, i64) = (140, 500);

    /// Derives the profile from the bulb configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyRange` if a configured vendor range has
    /// zero width.
    pub fn from_config(config: &BulbConfig) -> Result<Self, ConfigError> {
        let dimmable = config.has_token("dimmable");
        let tunable = config.has_token("tunable");
        let color = config.has_token("color");
        let (hk_bright_min, hk_bright_max) = Self::PLATFORM_BRIGHTNESS;
        let (hk_temp_min, hk_temp_max) = Self::PLATFORM_WHITE_TEMP;

        Ok(Self {
            dimmable,
            tunable,
            color,
            properties: PropertyMap::for_features(dimmable, tunable, color),
            brightness: ValueRange::new("brightness", config.bright_min, config.bright_max)?,
            white_temp: ValueRange::new("white temperature", config.temp_min, config.temp_max)?,
            platform_brightness: ValueRange::new(
                "platform brightness",
                hk_bright_min,
                hk_bright_max,
            )?,
            platform_white_temp: ValueRange::new(
                "platform white temperature",
                hk_temp_min,
                hk_temp_max,
            )?,
        })
    }

    /// Replaces the platform brightness range with the host characteristic's
    /// bounds. The lowest usable level is one step above the minimum, since
    /// the minimum itself means "off".
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyRange` if the resulting range is empty.
    pub fn with_platform_brightness(
        mut self,
        min_value: i64,
        min_step: i64,
        max_value: i64,
    ) -> Result<Self, ConfigError> {
        self.platform_brightness =
            ValueRange::new("platform brightness", min_value + min_step, max_value)?;
        Ok(self)
    }

    /// Replaces the platform color temperature range with the host
    /// characteristic's bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyRange` if the range is empty.
    pub fn with_platform_white_temp(mut self, min: i64, max: i64) -> Result<Self, ConfigError> {
        self.platform_white_temp = ValueRange::new("platform white temperature", min, max)?;
        Ok(self)
    }

    /// Supports brightness control.
    #[must_use]
    pub const fn is_dimmable(&self) -> bool {
        self.dimmable
    }

    /// Supports white temperature control.
    #[must_use]
    pub const fn is_tunable(&self) -> bool {
        self.tunable
    }

    /// Supports color and the white/colour mode flag.
    #[must_use]
    pub const fn is_color(&self) -> bool {
        self.color
    }

    /// Vendor property indices.
    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Vendor brightness range.
    #[must_use]
    pub const fn brightness(&self) -> ValueRange {
        self.brightness
    }

    /// Vendor white temperature range.
    #[must_use]
    pub const fn white_temp(&self) -> ValueRange {
        self.white_temp
    }

    /// Platform brightness range.
    #[must_use]
    pub const fn platform_brightness(&self) -> ValueRange {
        self.platform_brightness
    }

    /// Platform color temperature range.
    #[must_use]
    pub const fn platform_white_temp(&self) -> ValueRange {
        self.platform_white_temp
    }
}
