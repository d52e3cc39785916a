// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and mode control.
//!
//! The bulb is in one of three states: off, on in white mode, or on in
//! color mode (color bulbs only). Reads of power, mode and color fall back
//! to a safe value instead of failing, repairing the device on the way:
//!
//! | Read fails  | Written to the device     | Reported        |
//! |-------------|---------------------------|-----------------|
//! | power       | off                       | `false`         |
//! | mode        | white                     | `White`         |
//! | color       | last requested color      | that color      |
//!
//! Writes never fall back. Every value write is followed by a power read,
//! and a bulb found off is explicitly switched off again, since some
//! devices quietly drop value writes while powered down.

use crate::bulb::{LightBulb, require};
use crate::client::PropertyClient;
use crate::convert::decode_color;
use crate::error::{Error, Result};
use crate::types::{ColorState, LightState, PowerMode};

impl<C: PropertyClient> LightBulb<C> {
    // ========== Power ==========

    /// Reads the power state.
    ///
    /// If the read fails the bulb is switched off and `false` is reported.
    ///
    /// # Errors
    ///
    /// Returns error only if the corrective off write fails too.
    pub async fn get_power(&self) -> Result<bool> {
        let index = self.profile.properties().on_off;
        match self.read_bool(index).await {
            Ok(on) => {
                tracing::debug!(device = %self.name, on, "Read power state");
                Ok(on)
            }
            Err(e) => {
                self.faults.report(&self.name, "getting power state", &e);
                self.set_power(false).await?;
                Ok(false)
            }
        }
    }

    /// Switches the bulb on or off.
    ///
    /// Switching a color bulb on also rewrites its current mode, so it comes
    /// back the way it was. Any stored mode string is written back as read,
    /// including ones the library does not model, such as a scene. That step
    /// is best effort: if the mode cannot be read, the power write alone
    /// decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns error if the power write, or the mode rewrite, fails.
    pub async fn set_power(&self, on: bool) -> Result<bool> {
        let index = self.profile.properties().on_off;
        let action = if on { "turning on" } else { "turning off" };
        let accepted = self.write_property(index, on.into(), action).await?;
        if !(on && accepted && self.profile.is_color()) {
            return Ok(accepted);
        }

        match self.mode_text().await {
            Ok(Some((index, mode))) => {
                tracing::debug!(device = %self.name, %mode, "Restoring mode after power on");
                self.write_property(index, mode.into(), "restoring mode")
                    .await
            }
            Ok(None) => Ok(accepted),
            Err(e) => {
                tracing::debug!(device = %self.name, error = %e, "Could not restore mode");
                Ok(accepted)
            }
        }
    }

    /// Reads the raw mode string for the power-on restore, with the same
    /// white fallback as [`get_mode`](Self::get_mode).
    async fn mode_text(&self) -> Result<Option<(u8, String)>> {
        let Some(index) = self.profile.properties().mode else {
            return Ok(None);
        };
        match self.read_text(index).await {
            Ok(raw) => Ok(raw.map(|mode| (index, mode))),
            Err(e) => {
                self.faults.report(&self.name, "getting mode", &e);
                self.set_mode(PowerMode::White).await?;
                Ok(Some((index, PowerMode::White.as_str().to_owned())))
            }
        }
    }

    /// Re-establishes the power state after a value write.
    pub(crate) async fn settle_power(&self, accepted: bool) -> Result<bool> {
        if self.get_power().await? {
            Ok(accepted)
        } else {
            tracing::debug!(device = %self.name, "Bulb is off after value write");
            self.set_power(false).await
        }
    }

    // ========== Mode ==========

    /// Reads the mode.
    ///
    /// White-only bulbs are always in white mode and are not queried. A
    /// mode the library does not know, such as a scene, reads as `None`. If
    /// the read fails the bulb is put in white mode and `White` is
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns error only if the corrective mode write fails.
    pub async fn get_mode(&self) -> Result<Option<PowerMode>> {
        let Some(index) = self.profile.properties().mode else {
            return Ok(Some(PowerMode::White));
        };
        match self.read_text(index).await {
            Ok(raw) => {
                let mode = raw.as_deref().and_then(|s| s.parse().ok());
                if mode.is_none() {
                    tracing::debug!(device = %self.name, raw = ?raw, "Unknown mode");
                } else {
                    tracing::debug!(device = %self.name, mode = ?mode, "Read mode");
                }
                Ok(mode)
            }
            Err(e) => {
                self.faults.report(&self.name, "getting mode", &e);
                self.set_mode(PowerMode::White).await?;
                Ok(Some(PowerMode::White))
            }
        }
    }

    /// Writes the mode.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color mode, or if the write fails.
    pub async fn set_mode(&self, mode: PowerMode) -> Result<bool> {
        let index = require(self.profile.properties().mode, "set mode")?;
        self.write_property(index, mode.as_str().into(), "setting mode")
            .await
    }

    /// Puts the bulb in white mode.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color mode, or if the write fails.
    pub async fn set_mode_white(&self) -> Result<bool> {
        self.set_mode(PowerMode::White).await
    }

    /// Puts the bulb in color mode.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color mode, or if the write fails.
    pub async fn set_mode_color(&self) -> Result<bool> {
        self.set_mode(PowerMode::Color).await
    }

    /// Returns true if the bulb is on and in `mode`.
    ///
    /// On a white-only bulb this is the power state.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityUnsupported` for color mode on a white-only bulb,
    /// or an error if the mode fallback write fails.
    pub async fn get_mode_on(&self, mode: PowerMode) -> Result<bool> {
        self.check_mode(mode)?;
        let on = self.get_power().await?;
        if on && self.profile.is_color() {
            let current = self.get_mode().await?;
            tracing::debug!(device = %self.name, %mode, on = current == Some(mode), "Read mode power");
            Ok(current == Some(mode))
        } else {
            Ok(on)
        }
    }

    /// Switches the bulb on in `mode`, or off.
    ///
    /// Unlike [`set_power`](Self::set_power), switching on always writes
    /// the requested mode afterwards and reports that write's outcome.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityUnsupported` for color mode on a white-only bulb,
    /// or an error if a device write fails.
    pub async fn set_mode_on(&self, mode: PowerMode, on: bool) -> Result<bool> {
        self.check_mode(mode)?;
        let accepted = self.set_power(on).await?;
        if on && self.profile.is_color() {
            self.set_mode(mode).await
        } else {
            Ok(accepted)
        }
    }

    /// Returns the combined power and mode state.
    ///
    /// A bulb that is on in a mode the library does not know is reported
    /// as [`LightState::OnWhite`].
    ///
    /// # Errors
    ///
    /// Returns error if a fallback write fails.
    pub async fn state(&self) -> Result<LightState> {
        if !self.get_power().await? {
            return Ok(LightState::Off);
        }
        let mode = self.get_mode().await?.unwrap_or_default();
        Ok(LightState::from_parts(true, mode))
    }

    fn check_mode(&self, mode: PowerMode) -> Result<()> {
        if mode == PowerMode::White || self.profile.is_color() {
            Ok(())
        } else {
            Err(Error::unsupported("modes other than white"))
        }
    }

    // ========== Color ==========

    /// Reads the color.
    ///
    /// Carried hue/saturation/value fields take priority over the RGB
    /// rendering; see [`DecodedColor::effective`](crate::convert::DecodedColor::effective).
    /// If the read fails, or the string cannot be decoded, the last
    /// requested color is written again and reported.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if the rewrite fails.
    pub async fn get_color(&self) -> Result<ColorState> {
        let index = require(self.profile.properties().color, "get color")?;
        let read = match self.read_text(index).await {
            Ok(Some(encoded)) => decode_color(&encoded).map_err(Error::from),
            Ok(None) => Err(super::unexpected(index, None)),
            Err(e) => Err(e),
        };
        match read {
            Ok(decoded) => {
                let color = decoded.effective();
                tracing::debug!(device = %self.name, %color, "Read color");
                Ok(color)
            }
            Err(e) => {
                self.faults.report(&self.name, "getting color", &e);
                let last = self.color_state();
                self.write_color(last).await?;
                Ok(last)
            }
        }
    }

    /// Writes a color immediately and remembers it as the requested color.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color, or if a device write fails.
    pub async fn set_color(&self, color: ColorState) -> Result<bool> {
        require(self.profile.properties().color, "set color")?;
        *self.color.lock() = color;
        self.write_color(color).await
    }
}

#[cfg(test)]
mod tests {
    use crate::bulb::LightBulb;
    use crate::client::{PropertyValue, SimulatedDevice};
    use crate::config::BulbConfig;
    use crate::error::Error;
    use crate::types::{ColorState, LightState, PowerMode};

    fn bulb<'a>(device: &'a SimulatedDevice, kind: &str) -> LightBulb<&'a SimulatedDevice> {
        LightBulb::new(device, &BulbConfig::new(device.device_id(), kind)).unwrap()
    }

    #[tokio::test]
    async fn failed_power_read_switches_off() {
        let device = SimulatedDevice::new("dev").with_property(1, true);
        device.fail_reads(1, true);
        let bulb = bulb(&device, "dimmable");

        assert_eq!(bulb.get_power().await, Ok(false));
        assert_eq!(device.writes_to(1), vec![PropertyValue::Bool(false)]);
    }

    #[tokio::test]
    async fn power_on_restores_mode() {
        let device = SimulatedDevice::new("dev")
            .with_property(1, false)
            .with_property(2, "colour");
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.set_power(true).await, Ok(true));
        assert_eq!(device.writes_to(2), vec![PropertyValue::from("colour")]);
    }

    #[tokio::test]
    async fn power_on_restores_unknown_mode_verbatim() {
        let device = SimulatedDevice::new("dev").with_property(2, "scene");
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.set_power(true).await, Ok(true));
        assert_eq!(device.writes_to(2), vec![PropertyValue::from("scene")]);
        assert_eq!(bulb.get_mode().await, Ok(None));
    }

    #[tokio::test]
    async fn power_on_without_stored_mode_skips_restore() {
        let device = SimulatedDevice::new("dev");
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.set_power(true).await, Ok(true));
        assert!(device.writes_to(2).is_empty());
    }

    #[tokio::test]
    async fn failed_mode_read_writes_white() {
        let device = SimulatedDevice::new("dev").with_property(2, "colour");
        device.fail_reads(2, true);
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.get_mode().await, Ok(Some(PowerMode::White)));
        assert_eq!(device.property(2), Some(PropertyValue::from("white")));
    }

    #[tokio::test]
    async fn white_bulb_mode_needs_no_io() {
        let device = SimulatedDevice::new("dev");
        let bulb = bulb(&device, "dimmable tunable");

        assert_eq!(bulb.get_mode().await, Ok(Some(PowerMode::White)));
        assert!(device.reads().is_empty());
        assert_eq!(
            bulb.set_mode_color().await,
            Err(Error::unsupported("set mode"))
        );
        assert_eq!(
            bulb.get_mode_on(PowerMode::Color).await,
            Err(Error::unsupported("modes other than white"))
        );
    }

    #[tokio::test]
    async fn state_combines_power_and_mode() {
        let device = SimulatedDevice::new("dev")
            .with_property(1, true)
            .with_property(2, "colour");
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.state().await, Ok(LightState::OnColor));
        device.set(2, "white");
        assert_eq!(bulb.state().await, Ok(LightState::OnWhite));
        device.set(1, false);
        assert_eq!(bulb.state().await, Ok(LightState::Off));
    }

    #[tokio::test]
    async fn undecodable_color_is_rewritten() {
        let device = SimulatedDevice::new("dev")
            .with_property(1, true)
            .with_property(5, "garbage");
        let bulb = bulb(&device, "color");

        assert_eq!(bulb.get_color().await, Ok(ColorState::default()));
        assert_eq!(
            device.property(5),
            Some(PropertyValue::from("BF03000001644b"))
        );
    }

    #[tokio::test]
    async fn set_color_remembers_request() {
        let device = SimulatedDevice::new("dev").with_property(1, true);
        let bulb = bulb(&device, "color");
        let color = ColorState::new(200, 80, 60);

        assert_eq!(bulb.set_color(color).await, Ok(true));
        assert_eq!(bulb.color_state(), color);
        assert_eq!(
            device.property(5),
            Some(PropertyValue::from("1F709900c8503c"))
        );
    }
}
