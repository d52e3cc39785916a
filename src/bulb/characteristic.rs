// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic-level dispatch.
//!
//! Hosts that register characteristics generically can route every get and
//! set through [`LightBulb::read`] and [`LightBulb::write`] instead of
//! calling the typed operations.
//!
//! Color bulbs expose a single lightbulb service in color mode: `On` means
//! "on in color mode" and `Brightness` is the color value. White bulbs
//! expose `On` as "on in white mode" and `Brightness` as the dimmer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bulb::LightBulb;
use crate::client::PropertyClient;
use crate::error::{Error, Result, ValueError};
use crate::types::PowerMode;

/// A platform characteristic backed by the bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Power.
    On,
    /// Brightness, 1-100 by default.
    Brightness,
    /// Color temperature in mireds, 140-500 by default.
    ColorTemperature,
    /// Hue in degrees.
    Hue,
    /// Saturation in percent.
    Saturation,
}

impl Characteristic {
    /// Returns the characteristic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Brightness => "Brightness",
            Self::ColorTemperature => "ColorTemperature",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A characteristic value in the platform domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// `On`.
    Bool(bool),
    /// Every other characteristic.
    Int(i64),
}

impl CharacteristicValue {
    fn expect_bool(self, characteristic: Characteristic) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Int(_) => Err(invalid(characteristic, self)),
        }
    }

    fn expect_int<T: TryFrom<i64>>(self, characteristic: Characteristic) -> Result<T> {
        match self {
            Self::Int(n) => T::try_from(n).map_err(|_| invalid(characteristic, self)),
            Self::Bool(_) => Err(invalid(characteristic, self)),
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
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

fn invalid(characteristic: Characteristic, value: CharacteristicValue) -> Error {
    ValueError::InvalidCharacteristicValue {
        characteristic: characteristic.as_str(),
        value: value.to_string(),
    }
    .into()
}

impl<C: PropertyClient> LightBulb<C> {
    /// Lists the characteristics this bulb exposes, `On` first.
    #[must_use]
    pub fn characteristics(&self) -> Vec<Characteristic> {
        let mut list = vec![Characteristic::On];
        if self.profile.is_color() {
            list.extend([Characteristic::Hue, Characteristic::Saturation]);
        }
        if self.profile.is_color() || self.profile.is_dimmable() {
            list.push(Characteristic::Brightness);
        }
        if self.profile.is_tunable() {
            list.push(Characteristic::ColorTemperature);
        }
        list
    }

    /// Reads a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityUnsupported` if the bulb does not expose the
    /// characteristic, or the error of the underlying get operation.
    pub async fn read(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let value: CharacteristicValue = match characteristic {
            Characteristic::On => self.get_mode_on(self.service_mode()).await?.into(),
            Characteristic::Brightness if self.profile.is_color() => {
                i64::from(self.get_value().await?).into()
            }
            Characteristic::Brightness => self.get_brightness().await?.into(),
            Characteristic::ColorTemperature => self.get_color_temperature().await?.into(),
            Characteristic::Hue => i64::from(self.get_hue().await?).into(),
            Characteristic::Saturation => i64::from(self.get_saturation().await?).into(),
        };
        tracing::trace!(device = %self.name, %characteristic, %value, "Read characteristic");
        Ok(value)
    }

    /// Writes a characteristic. Everything but `On` is coalesced.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCharacteristicValue` if `value` has the
    /// wrong type or does not fit, `CapabilityUnsupported` if the bulb does
    /// not expose the characteristic, or the error of the underlying set
    /// operation.
    pub async fn write(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<bool> {
        tracing::trace!(device = %self.name, %characteristic, %value, "Write characteristic");
        match characteristic {
            Characteristic::On => {
                let on = value.expect_bool(characteristic)?;
                self.set_mode_on(self.service_mode(), on).await
            }
            Characteristic::Brightness if self.profile.is_color() => {
                self.set_value(value.expect_int(characteristic)?).await
            }
            Characteristic::Brightness => {
                self.set_brightness(value.expect_int(characteristic)?).await
            }
            Characteristic::ColorTemperature => {
                self.set_color_temperature(value.expect_int(characteristic)?)
                    .await
            }
            Characteristic::Hue => self.set_hue(value.expect_int(characteristic)?).await,
            Characteristic::Saturation => {
                self.set_saturation(value.expect_int(characteristic)?).await
            }
        }
    }

    fn service_mode(&self) -> PowerMode {
        if self.profile.is_color() {
            PowerMode::Color
        } else {
            PowerMode::White
        }
    }
}
