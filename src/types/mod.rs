// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the converter, the controller and the facade.
//!
//! # Types
//!
//! - [`ColorState`] - Hue/saturation/value as requested by the host
//! - [`RgbColor`] - 8-bit RGB rendering of a color
//! - [`PowerMode`] - White or colour operation
//! - [`LightState`] - Power and mode combined

mod color;
mod mode;
mod rgb_color;

pub use color::ColorState;
pub use mode::{LightState, PowerMode};
pub use rgb_color::RgbColor;
