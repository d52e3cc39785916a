// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value conversion between the platform domain and the vendor domain.
//!
//! Brightness is an affine rescale between the two ranges. White
//! temperature is rescaled with an inversion: the vendor's low values are
//! warm, while the platform expresses temperature in mireds where high
//! values are warm.
//!
//! The color codec lives in [`color`].

pub mod color;

pub use color::{DecodedColor, decode_color, encode_color};

use crate::capabilities::{CapabilityProfile, ValueRange};

/// Stateless range converter built from a [`CapabilityProfile`].
///
/// # Examples
///
/// ```
/// use tuyalight_lib::{BulbConfig, CapabilityProfile};
/// use tuyalight_lib::convert::ValueConverter;
///
/// let profile = CapabilityProfile::from_config(&BulbConfig::new("dev", "dimmable")).unwrap();
/// let converter = ValueConverter::new(&profile);
///
/// assert_eq!(converter.brightness_platform_to_device(50), 139);
/// assert_eq!(converter.brightness_device_to_platform(139), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueConverter {
    brightness: ValueRange,
    white_temp: ValueRange,
    platform_brightness: ValueRange,
    platform_white_temp: ValueRange,
}

impl ValueConverter {
    /// Captures the ranges of a profile.
    #[must_use]
    pub fn new(profile: &CapabilityProfile) -> Self {
        Self {
            brightness: profile.brightness(),
            white_temp: profile.white_temp(),
            platform_brightness: profile.platform_brightness(),
            platform_white_temp: profile.platform_white_temp(),
        }
    }

    /// Vendor brightness to platform brightness.
    #[must_use]
    pub fn brightness_device_to_platform(&self, bright: i64) -> i64 {
        let (dev, hk) = (self.brightness, self.platform_brightness);
        let scaled = ratio(bright, dev.min(), dev.delta()) * as_f64(hk.delta());
        let brightness = round_half_up(scaled + as_f64(hk.min()));
        tracing::trace!(vendor = bright, platform = brightness, "Converted brightness");
        brightness
    }

    /// Platform brightness to vendor brightness.
    #[must_use]
    pub fn brightness_platform_to_device(&self, brightness: i64) -> i64 {
        let (dev, hk) = (self.brightness, self.platform_brightness);
        let scaled = ratio(brightness, hk.min(), hk.delta()) * as_f64(dev.delta());
        let bright = round_half_up(scaled + as_f64(dev.min()));
        tracing::trace!(platform = brightness, vendor = bright, "Converted brightness");
        bright
    }

    /// Vendor white temperature to platform color temperature (mireds).
    #[must_use]
    pub fn white_temp_device_to_platform(&self, temp: i64) -> i64 {
        let (dev, hk) = (self.white_temp, self.platform_white_temp);
        let scaled = ratio(temp, dev.min(), dev.delta()) * as_f64(hk.delta());
        let temperature = round_half_up(as_f64(hk.max()) - scaled);
        tracing::trace!(vendor = temp, platform = temperature, "Converted white temperature");
        temperature
    }

    /// Platform color temperature (mireds) to vendor white temperature.
    #[must_use]
    pub fn white_temp_platform_to_device(&self, temperature: i64) -> i64 {
        let (dev, hk) = (self.white_temp, self.platform_white_temp);
        let scaled = ratio(temperature, hk.min(), hk.delta()) * as_f64(dev.delta());
        let temp = round_half_up(as_f64(dev.max()) - scaled);
        tracing::trace!(platform = temperature, vendor = temp, "Converted white temperature");
        temp
    }
}

// Ranges come from configuration and stay far below 2^52.
#[allow(clippy::cast_precision_loss)]
fn as_f64(value: i64) -> f64 {
    value as f64
}

// Subtracts in f64 so out-of-range device readings cannot overflow.
fn ratio(value: i64, min: i64, delta: i64) -> f64 {
    (as_f64(value) - as_f64(min)) / as_f64(delta)
}

/// Rounds halves towards positive infinity.
#[allow(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BulbConfig;

    fn converter(config: &BulbConfig) -> ValueConverter {
        ValueConverter::new(&CapabilityProfile::from_config(config).unwrap())
    }

    fn default_converter() -> ValueConverter {
        converter(&BulbConfig::new("dev", "dimmable tunable color"))
    }

    #[test]
    fn brightness_end_points() {
        let conv = default_converter();
        assert_eq!(conv.brightness_device_to_platform(25), 1);
        assert_eq!(conv.brightness_device_to_platform(255), 100);
        assert_eq!(conv.brightness_platform_to_device(1), 25);
        assert_eq!(conv.brightness_platform_to_device(100), 255);
    }

    #[test]
    fn extreme_readings_do_not_overflow() {
        let conv = default_converter();
        assert!(conv.brightness_device_to_platform(i64::MIN) < 0);
        assert!(conv.brightness_device_to_platform(i64::MAX) > 100);
        assert!(conv.white_temp_device_to_platform(i64::MIN) > 500);
        assert!(conv.white_temp_device_to_platform(i64::MAX) < 140);
    }

    #[test]
    fn brightness_fifty_percent() {
        // round((50 - 1) / 99 * 230 + 25) = round(138.84)
        assert_eq!(default_converter().brightness_platform_to_device(50), 139);
    }

    #[test]
    fn brightness_round_trip_within_one_step() {
        let conv = default_converter();
        for bright in 25..=255 {
            let platform = conv.brightness_device_to_platform(bright);
            let back = conv.brightness_platform_to_device(platform);
            assert!((back - bright).abs() <= 1, "{bright} came back as {back}");
        }
    }

    #[test]
    fn brightness_round_trip_from_platform_is_exact() {
        let conv = default_converter();
        for brightness in 1..=100 {
            let vendor = conv.brightness_platform_to_device(brightness);
            assert_eq!(conv.brightness_device_to_platform(vendor), brightness);
        }
    }

    #[test]
    fn wide_vendor_range_round_trips_exactly() {
        let conv = converter(&BulbConfig::new("dev", "dimmable").with_brightness_range(10, 1000));
        assert_eq!(conv.brightness_platform_to_device(1), 10);
        assert_eq!(conv.brightness_platform_to_device(100), 1000);
        for brightness in 1..=100 {
            let vendor = conv.brightness_platform_to_device(brightness);
            assert_eq!(conv.brightness_device_to_platform(vendor), brightness);
        }
    }

    #[test]
    fn white_temp_is_inverted() {
        let conv = default_converter();
        assert_eq!(conv.white_temp_device_to_platform(0), 500);
        assert_eq!(conv.white_temp_device_to_platform(255), 140);
        assert_eq!(conv.white_temp_platform_to_device(500), 0);
        assert_eq!(conv.white_temp_platform_to_device(140), 255);
    }

    #[test]
    fn white_temp_round_trip_within_tolerance() {
        let conv = default_converter();
        for temp in 0..=255 {
            let platform = conv.white_temp_device_to_platform(temp);
            let back = conv.white_temp_platform_to_device(platform);
            assert!((back - temp).abs() <= 1, "{temp} came back as {back}");
        }
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(138.84), 139);
    }
}
