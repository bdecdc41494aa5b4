// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical hex color representation.

use std::fmt;

use serde::Serialize;

/// A normalized hex color string.
///
/// Always `#RRGGBB` (uppercase, six digits), or `#RRGGBBAA` when the source
/// carried an alpha channel. Derived data; never mutated after creation.
///
/// # Examples
///
/// ```
/// use stromr_lib::HexColor;
///
/// let color = HexColor::from_rgb(255.0, 128.0, 0.0);
/// assert_eq!(color.as_str(), "#FF8000");
///
/// // Shorthand expands, case normalizes
/// let parsed = HexColor::parse("#abc").unwrap();
/// assert_eq!(parsed.as_str(), "#AABBCC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Builds a hex color from floating-point RGB components.
    ///
    /// Each component is rounded and clamped to 0..=255; non-finite values
    /// collapse to 0.
    #[must_use]
    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self(format!(
            "#{:02X}{:02X}{:02X}",
            clamp_channel(red),
            clamp_channel(green),
            clamp_channel(blue)
        ))
    }

    /// Parses a hex literal, tolerating stray characters.
    ///
    /// Everything outside hex digits and `#` is stripped, a missing `#`
    /// prefix is added, and 3-digit shorthand expands by doubling each digit.
    /// Accepts 6 or 8 digits after `#`; anything else is `None`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut s: String = input
            .chars()
            .filter(|c| c.is_ascii_hexdigit() || *c == '#')
            .collect();
        if s.is_empty() {
            return None;
        }
        if !s.starts_with('#') {
            s.insert(0, '#');
        }

        if s.len() == 4 && s[1..].chars().all(|c| c.is_ascii_hexdigit()) {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in s[1..].chars() {
                expanded.push(c);
                expanded.push(c);
            }
            s = expanded;
        }

        let digits = &s[1..];
        let valid = (digits.len() == 6 || digits.len() == 8)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| Self(s.to_ascii_uppercase()))
    }

    /// Returns the canonical string, including the `#` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the red, green and blue channels as bytes.
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range| u8::from_str_radix(&self.0[range], 16).unwrap_or(0);
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_formats_uppercase() {
        assert_eq!(HexColor::from_rgb(255.0, 128.0, 0.0).as_str(), "#FF8000");
        assert_eq!(HexColor::from_rgb(0.0, 15.0, 255.0).as_str(), "#000FFF");
    }

    #[test]
    fn from_rgb_clamps_and_rounds() {
        assert_eq!(HexColor::from_rgb(-10.0, 300.0, 127.5).as_str(), "#00FF80");
        assert_eq!(HexColor::from_rgb(f64::NAN, 0.0, 0.0).as_str(), "#000000");
    }

    #[test]
    fn parse_full_hex() {
        assert_eq!(HexColor::parse("ff8800").unwrap().as_str(), "#FF8800");
        assert_eq!(HexColor::parse("#FF8800").unwrap().as_str(), "#FF8800");
    }

    #[test]
    fn parse_expands_shorthand() {
        assert_eq!(HexColor::parse("#abc").unwrap().as_str(), "#AABBCC");
        assert_eq!(HexColor::parse("fff").unwrap().as_str(), "#FFFFFF");
    }

    #[test]
    fn parse_keeps_alpha() {
        assert_eq!(HexColor::parse("11223344").unwrap().as_str(), "#11223344");
    }

    #[test]
    fn parse_strips_stray_characters() {
        assert_eq!(HexColor::parse(" ff 88 00 ").unwrap().as_str(), "#FF8800");
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!(HexColor::parse("").is_none());
        assert!(HexColor::parse("xyz").is_none());
        assert!(HexColor::parse("#FF00").is_none());
        assert!(HexColor::parse("ff#0000").is_none());
        assert!(HexColor::parse("#1234567").is_none());
    }

    #[test]
    fn rgb_roundtrip() {
        for (r, g, b) in [(0u8, 0u8, 0u8), (255, 255, 255), (12, 200, 7), (1, 2, 3)] {
            let color = HexColor::from_rgb(f64::from(r), f64::from(g), f64::from(b));
            assert_eq!(color.rgb(), (r, g, b), "roundtrip failed for {color}");
        }
    }

    #[test]
    fn rgb_ignores_alpha() {
        let color = HexColor::parse("#11223344").unwrap();
        assert_eq!(color.rgb(), (0x11, 0x22, 0x33));
    }
}
