// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hue/saturation/value color as requested by the host platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The last color the host asked for.
///
/// The fields are deliberately unchecked: the vendor color string carries
/// them verbatim, so whatever the host sends is what the bulb receives.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::types::ColorState;
///
/// let color = ColorState::default();
/// assert_eq!((color.hue, color.saturation, color.value), (1, 100, 75));
///
/// let teal = color.with_hue(180).with_saturation(60);
/// assert_eq!(teal.to_string(), "HSV(180, 60%, 75%)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorState {
    /// Hue in degrees, nominally 0-360.
    pub hue: u16,
    /// Saturation percentage, nominally 0-100.
    pub saturation: u8,
    /// Value (color brightness) percentage, nominally 0-100.
    pub value: u8,
}

impl ColorState {
    /// Creates a color.
    #[must_use]
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Returns a copy with a different hue.
    #[must_use]
    pub const fn with_hue(self, hue: u16) -> Self {
        Self { hue, ..self }
    }

    /// Returns a copy with a different saturation.
    #[must_use]
    pub const fn with_saturation(self, saturation: u8) -> Self {
        Self { saturation, ..self }
    }

    /// Returns a copy with a different value.
    #[must_use]
    pub const fn with_value(self, value: u8) -> Self {
        Self { value, ..self }
    }
}

impl Default for ColorState {
    fn default() -> Self {
        Self::new(1, 100, 75)
    }
}

impl fmt::Display for ColorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSV({}, {}%, {}%)",
            self.hue, self.saturation, self.value
        )
    }
}

impl From<(u16, u8, u8)> for ColorState {
    fn from((hue, saturation, value): (u16, u8, u8)) -> Self {
        Self::new(hue, saturation, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_color() {
        assert_eq!(ColorState::default(), ColorState::new(1, 100, 75));
    }

    #[test]
    fn with_methods_replace_one_component() {
        let color = ColorState::default().with_value(20);
        assert_eq!(color, ColorState::new(1, 100, 20));
        assert_eq!(color.with_hue(300).hue, 300);
        assert_eq!(color.with_saturation(0).saturation, 0);
    }

    #[test]
    fn from_tuple() {
        let color: ColorState = (200u16, 80u8, 60u8).into();
        assert_eq!(color, ColorState::new(200, 80, 60));
    }
}
