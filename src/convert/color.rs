// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor color string codec.
//!
//! The color property is a 14 character hex string:
//!
//! | Bytes  | Content                                 |
//! |--------|-----------------------------------------|
//! | 0-5    | RGB rendering of the color (`RRGGBB`)   |
//! | 6-9    | hue, 4 hex digits                       |
//! | 10-11  | saturation, 2 hex digits                |
//! | 12-13  | value, 2 hex digits                     |
//!
//! The hue/saturation/value fields carry the requested color verbatim, so
//! decoding them never loses precision to the RGB rendering. The hue is
//! written without range checks.

use crate::error::ValueError;
use crate::types::{ColorState, RgbColor};

/// Encodes a color into the vendor color string.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::convert::encode_color;
/// use tuyalight_lib::types::ColorState;
///
/// assert_eq!(encode_color(&ColorState::new(200, 80, 60)), "1F709900c8503c");
/// ```
#[must_use]
pub fn encode_color(color: &ColorState) -> String {
    let rgb = RgbColor::from_hsv(color);
    let encoded = format!(
        "{}{:04x}{:02x}{:02x}",
        rgb.to_hex(),
        color.hue,
        color.saturation,
        color.value
    );
    tracing::trace!(%color, encoded = %encoded, "Encoded color");
    encoded
}

/// A decoded vendor color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedColor {
    /// The RGB rendering at the start of the string.
    pub rgb: RgbColor,
    /// Carried hue field, if present and parseable.
    pub hue: Option<u16>,
    /// Carried saturation field, if present and parseable.
    pub saturation: Option<u8>,
    /// Carried value field, if present and parseable.
    pub value: Option<u8>,
}

impl DecodedColor {
    /// The carried fields, if all three were present.
    #[must_use]
    pub fn carried(&self) -> Option<ColorState> {
        Some(ColorState::new(self.hue?, self.saturation?, self.value?))
    }

    /// HSV derived from the RGB rendering. Diagnostic only.
    #[must_use]
    pub fn derived(&self) -> ColorState {
        self.rgb.to_hsv()
    }

    /// The color to report to the platform.
    ///
    /// Each carried field wins unless it is missing or zero, in which case
    /// the RGB-derived component is used. Strings written by the vendor's
    /// own app often carry `0000ffff` after the RGB part.
    #[must_use]
    pub fn effective(&self) -> ColorState {
        let derived = self.derived();
        ColorState::new(
            self.hue.filter(|&h| h != 0).unwrap_or(derived.hue),
            self.saturation.filter(|&s| s != 0).unwrap_or(derived.saturation),
            self.value.filter(|&v| v != 0).unwrap_or(derived.value),
        )
    }
}

/// Decodes a vendor color string.
///
/// Fields are split positionally. Only the RGB part is mandatory; a short
/// or garbled tail leaves the corresponding carried field empty.
///
/// # Errors
///
/// Returns `ValueError::InvalidColorString` if the string is not ASCII or
/// does not start with six hex digits.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::convert::{decode_color, encode_color};
/// use tuyalight_lib::types::ColorState;
///
/// let color = ColorState::new(359, 3, 97);
/// let decoded = decode_color(&encode_color(&color)).unwrap();
/// assert_eq!(decoded.carried(), Some(color));
/// ```
pub fn decode_color(encoded: &str) -> Result<DecodedColor, ValueError> {
    if !encoded.is_ascii() || encoded.len() < 6 {
        return Err(ValueError::InvalidColorString(encoded.to_string()));
    }
    let rgb = RgbColor::from_hex(&encoded[0..6])
        .map_err(|_| ValueError::InvalidColorString(encoded.to_string()))?;

    let decoded = DecodedColor {
        rgb,
        hue: field(encoded, 6, 10).and_then(|f| u16::from_str_radix(f, 16).ok()),
        saturation: field(encoded, 10, 12).and_then(|f| u8::from_str_radix(f, 16).ok()),
        value: field(encoded, 12, encoded.len()).and_then(|f| u8::from_str_radix(f, 16).ok()),
    };
    tracing::trace!(
        encoded,
        ?decoded,
        derived = %decoded.derived(),
        "Decoded color"
    );
    Ok(decoded)
}

fn field(s: &str, start: usize, end: usize) -> Option<&str> {
    let end = end.min(s.len());
    s.get(start..end).filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_reference_color() {
        // HSV(200, 80, 60) renders as RGB(31, 112, 153).
        assert_eq!(encode_color(&ColorState::new(200, 80, 60)), "1F709900c8503c");
    }

    #[test]
    fn encode_rounds_half_channels_up() {
        assert!(encode_color(&ColorState::new(0, 22, 90)).starts_with("E6B3B3"));
    }

    #[test]
    fn encode_is_fourteen_chars() {
        for color in [
            ColorState::new(0, 0, 0),
            ColorState::new(360, 100, 100),
            ColorState::default(),
        ] {
            assert_eq!(encode_color(&color).len(), 14);
        }
    }

    #[test]
    fn encode_does_not_range_check_hue() {
        let encoded = encode_color(&ColorState::new(0x1234, 50, 50));
        assert_eq!(&encoded[6..10], "1234");
    }

    #[test]
    fn carried_fields_survive_encoding() {
        for hue in (0..=360).step_by(7) {
            for saturation in (0..=100).step_by(9) {
                for value in (0..=100).step_by(11) {
                    let color = ColorState::new(hue, saturation, value);
                    let decoded = decode_color(&encode_color(&color)).unwrap();
                    assert_eq!(decoded.carried(), Some(color));
                    assert_eq!(decoded.effective(), color);
                }
            }
        }
    }

    #[test]
    fn vendor_app_string_falls_back_to_rgb() {
        let decoded = decode_color("ff00000000ffff").unwrap();
        assert_eq!(decoded.carried(), Some(ColorState::new(0, 255, 255)));
        assert_eq!(decoded.effective(), ColorState::new(0, 255, 255));

        let decoded = decode_color("00ff000000ffff").unwrap();
        assert_eq!(decoded.effective().hue, 120);
    }

    #[test]
    fn short_string_uses_derived_components() {
        let decoded = decode_color("0000ff").unwrap();
        assert_eq!(decoded.carried(), None);
        assert_eq!(decoded.effective(), ColorState::new(240, 100, 100));
    }

    #[test]
    fn garbled_tail_is_ignored() {
        let decoded = decode_color("00ff00zzzz6464").unwrap();
        assert_eq!(decoded.hue, None);
        assert_eq!(decoded.saturation, Some(100));
        assert_eq!(decoded.effective(), ColorState::new(120, 100, 100));
    }

    #[test]
    fn invalid_rgb_is_rejected() {
        assert!(matches!(
            decode_color("nothex00c8503c"),
            Err(ValueError::InvalidColorString(_))
        ));
        assert!(decode_color("1F70").is_err());
        assert!(decode_color("1F7099é").is_err());
    }
}
