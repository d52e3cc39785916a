// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode and combined power/mode state.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// The bulb's operating mode.
///
/// Only color bulbs have a mode property; white-only bulbs are implicitly
/// always in [`PowerMode::White`].
///
/// # Examples
///
/// ```
/// use tuyalight_lib::types::PowerMode;
///
/// assert_eq!(PowerMode::White.as_str(), "white");
/// assert_eq!(PowerMode::Color.as_str(), "colour");
/// assert_eq!("colour".parse::<PowerMode>().unwrap(), PowerMode::Color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerMode {
    /// Tunable white operation.
    #[default]
    White,
    /// Full color operation.
    Color,
}

impl PowerMode {
    /// Returns the vendor string for this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Color => "colour",
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Self::White),
            "colour" | "color" => Ok(Self::Color),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

/// Combined power and mode of a bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightState {
    /// Powered off.
    Off,
    /// Powered on in white mode.
    OnWhite,
    /// Powered on in color mode.
    OnColor,
}

impl LightState {
    /// Combines a power reading with the current mode.
    #[must_use]
    pub const fn from_parts(on: bool, mode: PowerMode) -> Self {
        match (on, mode) {
            (false, _) => Self::Off,
            (true, PowerMode::White) => Self::OnWhite,
            (true, PowerMode::Color) => Self::OnColor,
        }
    }

    /// Returns true unless the bulb is off.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Returns the mode if the bulb is on.
    #[must_use]
    pub const fn mode(&self) -> Option<PowerMode> {
        match self {
            Self::Off => None,
            Self::OnWhite => Some(PowerMode::White),
            Self::OnColor => Some(PowerMode::Color),
        }
    }
}
