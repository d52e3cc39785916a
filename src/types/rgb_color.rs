// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with hex parsing and HSV conversion.
//!
//! The vendor color string starts with the RGB rendering of the requested
//! color, so every color write goes through [`RgbColor::from_hsv`] and every
//! read can be cross-checked with [`RgbColor::to_hsv`].

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

use super::ColorState;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use tuyalight_lib::types::{ColorState, RgbColor};
///
/// let color = RgbColor::from_hsv(&ColorState::new(200, 80, 60));
/// assert_eq!(color.to_hex(), "1F7099");
///
/// let parsed = RgbColor::from_hex("1f7099").unwrap();
/// assert_eq!(parsed, color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a six digit hex string, with or without a
    /// leading `#`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColorString` if the string is not six hex
    /// digits.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ValueError::InvalidColorString(hex.to_string()));
        }
        let r = parse_hex_pair(&digits[0..2])?;
        let g = parse_hex_pair(&digits[2..4])?;
        let b = parse_hex_pair(&digits[4..6])?;
        Ok(Self::new(r, g, b))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as six uppercase hex digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Converts this color to hue (0-359), saturation and value (0-100).
    ///
    /// Rounding means the result may differ slightly from the HSV that
    /// produced this color.
    #[must_use]
    pub fn to_hsv(&self) -> ColorState {
        let (h, s, v) = rgb_to_hsv(self.red, self.green, self.blue);
        ColorState::new(h, s, v)
    }

    /// Renders an HSV color as RGB. Hues past 360 wrap around.
    #[must_use]
    pub fn from_hsv(color: &ColorState) -> Self {
        let (r, g, b) = hsv_to_rgb(color.hue, color.saturation, color.value);
        Self::new(r, g, b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

fn parse_hex_pair(s: &str) -> Result<u8, ValueError> {
    u8::from_str_radix(s, 16).map_err(|_| ValueError::InvalidColorString(s.to_string()))
}

/// Returns (hue: 0-359, saturation: 0-100, value: 0-100).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = (max * 100.0).round() as u8;
    let saturation = if max == 0.0 {
        0
    } else {
        ((delta / max) * 100.0).round() as u8
    };

    let hue = if delta < f64::EPSILON {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        (60.0 * ((g - b) / delta)).rem_euclid(360.0)
    } else if (max - g).abs() < f64::EPSILON {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    ((hue.round() as u16) % 360, saturation, value)
}

/// Takes (hue, saturation: 0-100, value: 0-100), returns 0-255 channels.
///
/// Channels are computed per 60 degree sector from `v * 255` directly and
/// rounded half up, so exact halves such as 229.5 land on the upper step.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn hsv_to_rgb(h: u16, s: u8, v: u8) -> (u8, u8, u8) {
    let h = f64::from(h) / 60.0;
    let s = (f64::from(s) / 100.0).min(1.0);
    let v = (f64::from(v) / 100.0).min(1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = 255.0 * v * (1.0 - s);
    let q = 255.0 * v * (1.0 - s * f);
    let t = 255.0 * v * (1.0 - s * (1.0 - f));
    let v = 255.0 * v;

    let (r, g, b) = match (sector as u16) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let channel = |c: f64| (c + 0.5).floor().min(255.0) as u8;
    (channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_either_case() {
        let color = RgbColor::from_hex("#FF5733").unwrap();
        assert_eq!((color.red(), color.green(), color.blue()), (255, 87, 51));
        assert_eq!(RgbColor::from_hex("ff5733").unwrap(), color);
    }

    #[test]
    fn from_hex_invalid() {
        assert!(RgbColor::from_hex("#GG0000").is_err());
        assert!(RgbColor::from_hex("FF00").is_err());
        assert!(RgbColor::from_hex("").is_err());
    }

    #[test]
    fn to_hex_pads_channels() {
        assert_eq!(RgbColor::new(0, 15, 255).to_hex(), "000FFF");
        assert_eq!(RgbColor::new(255, 128, 0).to_string(), "#FF8000");
    }

    #[test]
    fn primaries_from_hsv() {
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(0, 100, 100)),
            RgbColor::new(255, 0, 0)
        );
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(120, 100, 100)),
            RgbColor::new(0, 255, 0)
        );
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(240, 100, 100)),
            RgbColor::new(0, 0, 255)
        );
    }

    #[test]
    fn mid_range_hsv() {
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(200, 80, 60)),
            RgbColor::new(31, 112, 153)
        );
    }

    #[test]
    fn exact_halves_round_up() {
        // 0.9 * 255 = 229.5
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(0, 22, 90)),
            RgbColor::new(230, 179, 179)
        );
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(0, 28, 90)),
            RgbColor::new(230, 165, 165)
        );
    }

    #[test]
    fn hue_wraps_past_full_circle() {
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(400, 100, 100)),
            RgbColor::from_hsv(&ColorState::new(40, 100, 100))
        );
        assert_eq!(
            RgbColor::from_hsv(&ColorState::new(360, 100, 100)),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn to_hsv_of_primaries() {
        assert_eq!(RgbColor::new(255, 0, 0).to_hsv(), ColorState::new(0, 100, 100));
        assert_eq!(RgbColor::new(0, 255, 0).to_hsv(), ColorState::new(120, 100, 100));
        assert_eq!(RgbColor::new(0, 0, 255).to_hsv(), ColorState::new(240, 100, 100));
        assert_eq!(RgbColor::new(0, 0, 0).to_hsv(), ColorState::new(0, 0, 0));
    }

    #[test]
    fn magenta_side_hue_is_positive() {
        // Red is max and blue exceeds green, so the raw hue is negative.
        let hsv = RgbColor::new(255, 0, 128).to_hsv();
        assert_eq!(hsv.hue, 330);
    }
}
