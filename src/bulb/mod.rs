// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The light bulb facade.
//!
//! A [`LightBulb`] exposes platform-domain get/set operations for every
//! characteristic of one vendor bulb. Values are converted at the boundary,
//! slider-style writes (brightness, color temperature, hue, saturation,
//! value) are coalesced per channel, and power/mode bookkeeping is handled
//! by the controller operations in this module's `power` half.
//!
//! # Examples
//!
//! ```
//! use tuyalight_lib::{BulbConfig, LightBulb};
//! use tuyalight_lib::client::{PropertyValue, SimulatedDevice};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tuyalight_lib::Result<()> {
//! let device = SimulatedDevice::new("bf0123456789abcd")
//!     .with_property(1, true)
//!     .with_property(2, 255);
//! let config = BulbConfig::new("bf0123456789abcd", "dimmable");
//! let bulb = LightBulb::new(&device, &config).expect("valid config");
//!
//! assert_eq!(bulb.get_brightness().await?, 100);
//!
//! bulb.set_brightness(50).await?;
//! assert_eq!(device.property(2), Some(PropertyValue::Number(139)));
//! # Ok(())
//! # }
//! ```

mod characteristic;
mod power;

pub use characteristic::{Characteristic, CharacteristicValue};

use std::time::Duration;

use parking_lot::Mutex;

use crate::capabilities::CapabilityProfile;
use crate::client::{PropertyClient, PropertyValue};
use crate::coalesce::Coalescer;
use crate::config::{AccessoryInfo, BulbConfig};
use crate::convert::{ValueConverter, encode_color};
use crate::error::{CommunicationError, ConfigError, Error, Result};
use crate::report::FaultLog;
use crate::types::{ColorState, PowerMode};

/// Added to the device's write interval to form the debounce window.
pub const DEBOUNCE_MARGIN: Duration = Duration::from_millis(100);

/// Brightness reported, and written, when the brightness read fails.
pub const FALLBACK_BRIGHTNESS: i64 = 75;

/// One vendor light bulb seen through the platform's capability model.
#[derive(Debug)]
pub struct LightBulb<C> {
    client: C,
    device_id: String,
    name: String,
    profile: CapabilityProfile,
    converter: ValueConverter,
    info: AccessoryInfo,
    faults: FaultLog,
    color: Mutex<ColorState>,
    brightness_writes: Coalescer<i64>,
    white_temp_writes: Coalescer<i64>,
    color_writes: Coalescer<ColorState>,
}

impl<C: PropertyClient> LightBulb<C> {
    /// Creates a bulb with the default platform ranges and debounce window.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration yields an unusable
    /// profile.
    pub fn new(client: C, config: &BulbConfig) -> std::result::Result<Self, ConfigError> {
        Self::builder(client, config).build()
    }

    /// Starts building a bulb.
    #[must_use]
    pub fn builder(client: C, config: &BulbConfig) -> LightBulbBuilder<C> {
        LightBulbBuilder::new(client, config)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the vendor device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the capability profile.
    #[must_use]
    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Returns the accessory information.
    #[must_use]
    pub fn accessory_info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// Returns the property client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the last requested color.
    ///
    /// Updated as soon as a hue, saturation or value is set, before the
    /// coalesced write reaches the device.
    #[must_use]
    pub fn color_state(&self) -> ColorState {
        *self.color.lock()
    }

    /// Returns the debounce window shared by the coalesced channels.
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        self.brightness_writes.window()
    }

    // ========== On/Off ==========

    /// Returns true if the bulb is on in white mode.
    ///
    /// # Errors
    ///
    /// Returns error if the power state cannot be established.
    pub async fn get_white_on(&self) -> Result<bool> {
        self.get_mode_on(PowerMode::White).await
    }

    /// Switches the bulb in white mode on or off.
    ///
    /// # Errors
    ///
    /// Returns error if a device write fails.
    pub async fn set_white_on(&self, on: bool) -> Result<bool> {
        self.set_mode_on(PowerMode::White, on).await
    }

    /// Returns true if the bulb is on in color mode.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color mode, or if the power state
    /// cannot be established.
    pub async fn get_color_on(&self) -> Result<bool> {
        self.get_mode_on(PowerMode::Color).await
    }

    /// Switches the bulb in color mode on or off.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color mode, or if a device write
    /// fails.
    pub async fn set_color_on(&self, on: bool) -> Result<bool> {
        self.set_mode_on(PowerMode::Color, on).await
    }

    // ========== Brightness ==========

    /// Reads the brightness in the platform range.
    ///
    /// If the read fails, the bulb is set to
    /// [`FALLBACK_BRIGHTNESS`] and that level is reported instead.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not dimmable, or if the fallback write
    /// fails.
    pub async fn get_brightness(&self) -> Result<i64> {
        let index = require(self.profile.properties().brightness, "get brightness")?;
        match self.read_number(index).await {
            Ok(bright) => {
                tracing::debug!(device = %self.name, bright, "Read brightness");
                Ok(self.converter.brightness_device_to_platform(bright))
            }
            Err(e) => {
                self.faults.report(&self.name, "getting brightness", &e);
                self.set_brightness_now(FALLBACK_BRIGHTNESS).await?;
                Ok(FALLBACK_BRIGHTNESS)
            }
        }
    }

    /// Sets the brightness, coalescing rapid calls into one write.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not dimmable, or if the coalesced write
    /// fails.
    pub async fn set_brightness(&self, brightness: i64) -> Result<bool> {
        require(self.profile.properties().brightness, "set brightness")?;
        self.brightness_writes
            .submit(brightness, |brightness| self.set_brightness_now(brightness))
            .await
    }

    /// Writes the brightness immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not dimmable, or if a device write
    /// fails.
    pub async fn set_brightness_now(&self, brightness: i64) -> Result<bool> {
        let index = require(self.profile.properties().brightness, "set brightness")?;
        let bright = self.converter.brightness_platform_to_device(brightness);
        let accepted = self
            .write_property(index, bright.into(), "setting brightness")
            .await?;
        self.settle_power(accepted).await
    }

    // ========== Color Temperature ==========

    /// Reads the white temperature as a platform color temperature.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not tunable, or if the read fails.
    pub async fn get_color_temperature(&self) -> Result<i64> {
        let index = require(self.profile.properties().white_temp, "get white temperature")?;
        let temp = self
            .read_number(index)
            .await
            .inspect_err(|e| self.faults.report(&self.name, "getting white temperature", e))?;
        tracing::debug!(device = %self.name, temp, "Read white temperature");
        Ok(self.converter.white_temp_device_to_platform(temp))
    }

    /// Sets the color temperature, coalescing rapid calls into one write.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not tunable, or if the coalesced write
    /// fails.
    pub async fn set_color_temperature(&self, temperature: i64) -> Result<bool> {
        require(self.profile.properties().white_temp, "set white temperature")?;
        self.white_temp_writes
            .submit(temperature, |temperature| {
                self.set_color_temperature_now(temperature)
            })
            .await
    }

    /// Writes the color temperature immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not tunable, or if a device write
    /// fails.
    pub async fn set_color_temperature_now(&self, temperature: i64) -> Result<bool> {
        let index = require(self.profile.properties().white_temp, "set white temperature")?;
        let temp = self.converter.white_temp_platform_to_device(temperature);
        let accepted = self
            .write_property(index, temp.into(), "setting white temperature")
            .await?;
        self.settle_power(accepted).await
    }

    // ========== Color Components ==========

    /// Reads the hue.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the color can neither
    /// be read nor rewritten.
    pub async fn get_hue(&self) -> Result<u16> {
        require(self.profile.properties().color, "get color hue")?;
        let hue = self.get_color().await?.hue;
        tracing::debug!(device = %self.name, hue, "Read color hue");
        Ok(hue)
    }

    /// Reads the saturation.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the color can neither
    /// be read nor rewritten.
    pub async fn get_saturation(&self) -> Result<u8> {
        require(self.profile.properties().color, "get color saturation")?;
        let saturation = self.get_color().await?.saturation;
        tracing::debug!(device = %self.name, saturation, "Read color saturation");
        Ok(saturation)
    }

    /// Reads the color value (the brightness of the color).
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the color can neither
    /// be read nor rewritten.
    pub async fn get_value(&self) -> Result<u8> {
        require(self.profile.properties().color, "get color value")?;
        let value = self.get_color().await?.value;
        tracing::debug!(device = %self.name, value, "Read color value");
        Ok(value)
    }

    /// Sets the hue.
    ///
    /// The remembered color is updated at once; the device receives the
    /// full color once the burst settles.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the coalesced write
    /// fails.
    pub async fn set_hue(&self, hue: u16) -> Result<bool> {
        require(self.profile.properties().color, "set color hue")?;
        let color = self.update_color(|c| c.with_hue(hue));
        self.submit_color(color).await
    }

    /// Sets the saturation. See [`set_hue`](Self::set_hue).
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the coalesced write
    /// fails.
    pub async fn set_saturation(&self, saturation: u8) -> Result<bool> {
        require(self.profile.properties().color, "set color saturation")?;
        let color = self.update_color(|c| c.with_saturation(saturation));
        self.submit_color(color).await
    }

    /// Sets the color value. See [`set_hue`](Self::set_hue).
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the coalesced write
    /// fails.
    pub async fn set_value(&self, value: u8) -> Result<bool> {
        require(self.profile.properties().color, "set color value")?;
        let color = self.update_color(|c| c.with_value(value));
        self.submit_color(color).await
    }

    fn update_color(&self, change: impl FnOnce(ColorState) -> ColorState) -> ColorState {
        let mut color = self.color.lock();
        *color = change(*color);
        tracing::trace!(device = %self.name, color = %*color, "Updated requested color");
        *color
    }

    async fn submit_color(&self, color: ColorState) -> Result<bool> {
        self.color_writes
            .submit(color, |color| self.write_color(color))
            .await
    }

    // ========== Property I/O ==========

    async fn read_property(&self, index: u8) -> Result<Option<PropertyValue>> {
        let value = self.client.get_property(&self.device_id, index).await?;
        tracing::trace!(device = %self.name, index, value = ?value, "Read property");
        Ok(value)
    }

    /// A property never reported by the device reads as off.
    async fn read_bool(&self, index: u8) -> Result<bool> {
        match self.read_property(index).await? {
            None => Ok(false),
            Some(PropertyValue::Bool(on)) => Ok(on),
            Some(other) => Err(unexpected(index, Some(&other))),
        }
    }

    async fn read_number(&self, index: u8) -> Result<i64> {
        match self.read_property(index).await? {
            Some(PropertyValue::Number(n)) => Ok(n),
            other => Err(unexpected(index, other.as_ref())),
        }
    }

    async fn read_text(&self, index: u8) -> Result<Option<String>> {
        match self.read_property(index).await? {
            None => Ok(None),
            Some(PropertyValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(unexpected(index, Some(&other))),
        }
    }

    async fn write_property(
        &self,
        index: u8,
        value: PropertyValue,
        action: &'static str,
    ) -> Result<bool> {
        tracing::debug!(device = %self.name, index, %value, action, "Writing property");
        match self.client.set_property(&self.device_id, index, value).await {
            Ok(accepted) => {
                tracing::debug!(device = %self.name, action, accepted, "Property written");
                Ok(accepted)
            }
            Err(e) => {
                let e = Error::from(e);
                self.faults.report(&self.name, action, &e);
                Err(e)
            }
        }
    }

    async fn write_color(&self, color: ColorState) -> Result<bool> {
        let index = require(self.profile.properties().color, "set color")?;
        let accepted = self
            .write_property(index, encode_color(&color).into(), "setting color")
            .await?;
        self.settle_power(accepted).await
    }
}

fn require(index: Option<u8>, capability: &'static str) -> Result<u8> {
    index.ok_or(Error::unsupported(capability))
}

fn unexpected(index: u8, value: Option<&PropertyValue>) -> Error {
    let value = value.map_or_else(|| "nothing".to_string(), ToString::to_string);
    CommunicationError::UnexpectedValue { index, value }.into()
}

/// Builder for [`LightBulb`].
///
/// Hosts that know their characteristic metadata pass it here so the
/// platform ranges match what the user interface actually sends.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tuyalight_lib::{BulbConfig, LightBulb};
/// use tuyalight_lib::client::SimulatedDevice;
///
/// let device = SimulatedDevice::new("bf0123456789abcd");
/// let config = BulbConfig::new("bf0123456789abcd", "dimmable tunable");
///
/// let bulb = LightBulb::builder(&device, &config)
///     .with_platform_brightness(0, 1, 100)
///     .with_platform_white_temp(153, 500)
///     .with_debounce_window(Duration::from_millis(250))
///     .build()
///     .unwrap();
///
/// assert_eq!(bulb.profile().platform_brightness().min(), 1);
/// assert_eq!(bulb.debounce_window(), Duration::from_millis(250));
/// ```
#[derive(Debug)]
pub struct LightBulbBuilder<C> {
    client: C,
    config: BulbConfig,
    platform_brightness: Option<(i64, i64, i64)>,
    platform_white_temp: Option<(i64, i64)>,
    debounce_window: Option<Duration>,
    faults: Option<FaultLog>,
}

impl<C: PropertyClient> LightBulbBuilder<C> {
    fn new(client: C, config: &BulbConfig) -> Self {
        Self {
            client,
            config: config.clone(),
            platform_brightness: None,
            platform_white_temp: None,
            debounce_window: None,
            faults: None,
        }
    }

    /// Uses the host's brightness characteristic bounds.
    #[must_use]
    pub fn with_platform_brightness(mut self, min_value: i64, min_step: i64, max_value: i64) -> Self {
        self.platform_brightness = Some((min_value, min_step, max_value));
        self
    }

    /// Uses the host's color temperature characteristic bounds.
    #[must_use]
    pub fn with_platform_white_temp(mut self, min: i64, max: i64) -> Self {
        self.platform_white_temp = Some((min, max));
        self
    }

    /// Overrides the debounce window. Defaults to the client's write
    /// interval plus [`DEBOUNCE_MARGIN`].
    #[must_use]
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = Some(window);
        self
    }

    /// Overrides the fault reporter derived from `logErrors`.
    #[must_use]
    pub fn with_fault_log(mut self, faults: FaultLog) -> Self {
        self.faults = Some(faults);
        self
    }

    /// Builds the bulb.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingDeviceId` if the device id is empty and
    /// `ConfigError::EmptyRange` if any range is empty.
    pub fn build(self) -> std::result::Result<LightBulb<C>, ConfigError> {
        let config = self.config;
        if config.dev_id.is_empty() {
            return Err(ConfigError::MissingDeviceId);
        }

        let mut profile = CapabilityProfile::from_config(&config)?;
        if let Some((min_value, min_step, max_value)) = self.platform_brightness {
            profile = profile.with_platform_brightness(min_value, min_step, max_value)?;
        }
        if let Some((min, max)) = self.platform_white_temp {
            profile = profile.with_platform_white_temp(min, max)?;
        }

        let window = self
            .debounce_window
            .unwrap_or_else(|| self.client.write_interval(&config.dev_id) + DEBOUNCE_MARGIN);
        let faults = self
            .faults
            .unwrap_or_else(|| FaultLog::from_flag(config.log_errors));
        let name = config.display_name();

        tracing::debug!(
            device = %name,
            dimmable = profile.is_dimmable(),
            tunable = profile.is_tunable(),
            color = profile.is_color(),
            window_ms = window.as_millis(),
            "Created light bulb"
        );

        Ok(LightBulb {
            client: self.client,
            info: config.accessory_info(),
            device_id: config.dev_id,
            name,
            converter: ValueConverter::new(&profile),
            profile,
            faults,
            color: Mutex::new(ColorState::default()),
            brightness_writes: Coalescer::new("brightness", window),
            white_temp_writes: Coalescer::new("white temperature", window),
            color_writes: Coalescer::new("color", window),
        })
    }
}
