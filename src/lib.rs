// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `TuyaLight` Lib - Tuya-style light bulbs behind a home-automation
//! capability model.
//!
//! The host platform thinks in on/off, brightness 1-100, color temperature
//! in mireds and hue/saturation/value. The bulb exposes a handful of
//! indexed properties with vendor ranges, a packed hex color string and a
//! white/colour mode flag. This library translates between the two.
//!
//! # Features
//!
//! - **Value conversion**: brightness and white temperature rescaling, the
//!   14 character color codec
//! - **Write coalescing**: slider bursts collapse into one device write per
//!   channel, and every caller still gets the outcome
//! - **Power and mode control**: mode restore on power-on, self-repairing
//!   fallbacks when reads fail, power correction after value writes
//! - **Characteristic facade**: typed get/set per characteristic plus
//!   generic [`Characteristic`] dispatch
//!
//! The transport is not part of this library. Anything implementing
//! [`client::PropertyClient`] can drive a bulb; [`client::SimulatedDevice`]
//! is an in-memory one.
//!
//! # Quick Start
//!
//! ```
//! use tuyalight_lib::{BulbConfig, LightBulb};
//! use tuyalight_lib::client::SimulatedDevice;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> tuyalight_lib::Result<()> {
//!     let config = BulbConfig::from_json(
//!         r#"{ "devId": "bf0123456789abcd", "type": "dimmable tunable color" }"#,
//!     )
//!     .expect("valid config");
//!     let device = SimulatedDevice::new(&config.dev_id).with_property(2, "white");
//!     let bulb = LightBulb::new(&device, &config).expect("valid profile");
//!
//!     bulb.set_color_on(true).await?;
//!     bulb.set_hue(200).await?;
//!     assert_eq!(bulb.get_hue().await?, 200);
//!     Ok(())
//! }
//! ```

mod bulb;
pub mod capabilities;
pub mod client;
pub mod coalesce;
pub mod config;
pub mod convert;
pub mod error;
pub mod report;
pub mod types;

pub use bulb::{
    Characteristic, CharacteristicValue, DEBOUNCE_MARGIN, FALLBACK_BRIGHTNESS, LightBulb,
    LightBulbBuilder,
};
pub use capabilities::{CapabilityProfile, PropertyMap, ValueRange};
pub use config::{AccessoryInfo, BulbConfig};
pub use error::{CommunicationError, ConfigError, Error, Result, ValueError};
pub use report::{FaultLevel, FaultLog};
pub use types::{ColorState, LightState, PowerMode, RgbColor};
