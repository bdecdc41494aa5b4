// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSV-family string decoding with the ambiguous-ordering heuristic.
//!
//! Some bulb firmwares emit `H;S;V`, others `H;V;S`, and nothing in the
//! payload says which. The heuristic below is kept as its own function so it
//! stays independently testable and replaceable if better vendor
//! documentation ever emerges.

use super::hex::HexColor;

/// Brightness forced onto every decoded HSV color.
///
/// The device-reported value channel is unreliable, so it is ignored and the
/// brightness pinned to 80%. This mirrors observed firmware behavior; it may
/// be a workaround rather than correct, but passing the reported value
/// through produced visibly wrong dashboard swatches.
const FORCED_VALUE: f64 = 80.0;

/// Decodes an `H;S;V`-style string, disambiguating the component order.
///
/// The string splits on `;` or `,` into numeric parts (at least two
/// required). Two candidates are computed: (H, part1, forced-V) and
/// (H, part2, forced-V). For hues in the 30°–90° band, where the two
/// orderings diverge most visibly, the candidate whose red and green
/// channels are closer to equal wins (neutral yellows read as intended).
/// Outside the band the first interpretation is always used.
#[must_use]
pub fn decode_ambiguous_hsv(input: &str) -> Option<HexColor> {
    let parts: Vec<f64> = input
        .split([';', ','])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    if parts.len() < 2 {
        return None;
    }

    let hue = parts[0];
    let first_sat = parts[1];
    let swapped_sat = parts.get(2).copied().unwrap_or(first_sat);

    let first = hsv_to_hex(hue, first_sat, FORCED_VALUE);
    let swapped = hsv_to_hex(hue, swapped_sat, FORCED_VALUE);

    if (30.0..=90.0).contains(&hue.rem_euclid(360.0)) {
        let (r1, g1, _) = first.rgb();
        let (r2, g2, _) = swapped.rgb();
        let deviation_first = (red_green_ratio(r1, g1) - 1.0).abs();
        let deviation_swapped = (red_green_ratio(r2, g2) - 1.0).abs();
        if deviation_swapped + 1e-4 < deviation_first {
            tracing::debug!(input = %input, chosen = %swapped, "HSV swapped-order interpretation used");
            return Some(swapped);
        }
    }

    Some(first)
}

fn red_green_ratio(red: u8, green: u8) -> f64 {
    if green == 0 {
        if red > 0 { f64::INFINITY } else { 1.0 }
    } else {
        f64::from(red) / f64::from(green)
    }
}

/// Standard HSV to hex conversion.
///
/// Saturation and value above 1 are treated as 0–100 percentages: clamped to
/// that range, then divided by 100. The hue wraps into 0°..360°.
#[must_use]
pub(super) fn hsv_to_hex(hue: f64, saturation: f64, value: f64) -> HexColor {
    let s = if saturation > 1.0 {
        saturation.clamp(0.0, 100.0) / 100.0
    } else {
        saturation
    };
    let v = if value > 1.0 {
        value.clamp(0.0, 100.0) / 100.0
    } else {
        value
    };

    let h = hue.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    HexColor::from_rgb((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
}
