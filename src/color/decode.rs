// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of raw `color` payload values into canonical hex.

use serde_json::{Map, Value};

use super::hex::HexColor;
use super::hsv;

/// Decodes the color-bearing portion of a bulb status body.
///
/// Reads the body's `color` field and, when present, the companion `mode`
/// field that some firmwares use to hint at HSV encoding. Returns `None`
/// when the color is absent or undecodable.
#[must_use]
pub fn decode_body_color(body: &Map<String, Value>) -> Option<HexColor> {
    let color = body.get("color")?;
    let mode = body.get("mode").and_then(Value::as_str);
    decode_color(color, mode)
}

/// Decodes a raw color value into a canonical hex color.
///
/// Accepts a component object (`{r, g, b}` or `{red, green, blue}`) or a
/// string in one of the vendor encodings (HSV-family, RGB triplet, hex
/// literal). Malformed input is never an error, just `None`.
#[must_use]
pub fn decode_color(color: &Value, mode: Option<&str>) -> Option<HexColor> {
    match color {
        Value::Object(map) => decode_component_map(map),
        Value::String(s) => decode_string(s, mode),
        _ => None,
    }
}

/// Component-object path: `{r, g, b}` or `{red, green, blue}`.
fn decode_component_map(map: &Map<String, Value>) -> Option<HexColor> {
    let red = component(map, "r", "red")?;
    let green = component(map, "g", "green")?;
    let blue = component(map, "b", "blue")?;
    Some(HexColor::from_rgb(red, green, blue))
}

fn component(map: &Map<String, Value>, short: &str, long: &str) -> Option<f64> {
    map.get(short)
        .or_else(|| map.get(long))
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

/// String path: strip stray characters, then try HSV-family, RGB triplet,
/// and finally the hex-literal fallback, in that order.
fn decode_string(raw: &str, mode: Option<&str>) -> Option<HexColor> {
    let stripped: String = raw
        .chars()
        .filter(|c| {
            c.is_ascii_hexdigit() || c.is_whitespace() || matches!(c, '#' | ';' | ',' | '.' | '-')
        })
        .collect();
    let s = stripped.trim();
    if s.is_empty() {
        return None;
    }

    let hsv_hint = mode.is_some_and(|m| m.to_ascii_lowercase().contains("hsv"));
    if hsv_hint || s.contains(';') {
        if let Some(hex) = hsv::decode_ambiguous_hsv(s) {
            return Some(hex);
        }
    }

    if s.contains(',') || s.split_whitespace().count() == 3 {
        if let Some(hex) = decode_rgb_triplet(s) {
            return Some(hex);
        }
    }

    HexColor::parse(s)
}

/// `R,G,B` or `R G B` triplet; components all at most 1 are treated as
/// normalized 0..1 and scaled by 255.
fn decode_rgb_triplet(s: &str) -> Option<HexColor> {
    let tokens: Vec<&str> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 3 {
        return None;
    }

    let mut channels = [0.0_f64; 3];
    for (slot, token) in channels.iter_mut().zip(&tokens) {
        *slot = token.parse::<f64>().ok().filter(|v| v.is_finite())?;
    }

    let [mut r, mut g, mut b] = channels;
    if r <= 1.0 && g <= 1.0 && b <= 1.0 {
        r *= 255.0;
        g *= 255.0;
        b *= 255.0;
    }
    Some(HexColor::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(json: Value) -> Map<String, Value> {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn component_object_short_keys() {
        let color = json!({"r": 255, "g": 128, "b": 0});
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#FF8000");
    }

    #[test]
    fn component_object_long_keys() {
        let color = json!({"red": 0, "green": 255, "blue": 64});
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#00FF40");
    }

    #[test]
    fn component_object_mixed_keys() {
        let color = json!({"r": 10, "green": 20, "b": 30});
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#0A141E");
    }

    #[test]
    fn component_object_missing_channel() {
        let color = json!({"r": 255, "g": 128});
        assert!(decode_color(&color, None).is_none());
    }

    #[test]
    fn hex_literal_string() {
        let color = json!("ff8800");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#FF8800");
    }

    #[test]
    fn hex_shorthand_string() {
        let color = json!("#abc");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#AABBCC");
    }

    #[test]
    fn hex_with_alpha_preserved() {
        let color = json!("#11223344");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#11223344");
    }

    #[test]
    fn rgb_triplet_commas() {
        let color = json!("255, 128, 0");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#FF8000");
    }

    #[test]
    fn rgb_triplet_whitespace() {
        let color = json!("255 128 0");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#FF8000");
    }

    #[test]
    fn normalized_triplet_scales() {
        let color = json!("0,1,0.5");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#00FF80");
    }

    #[test]
    fn semicolons_select_hsv_path() {
        let color = json!("200;100;20");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#0088CC");
    }

    #[test]
    fn mode_hint_selects_hsv_for_commas() {
        let commas_hsv = decode_color(&json!("200,100,20"), Some("hsv")).unwrap();
        let semicolons = decode_color(&json!("200;100;20"), None).unwrap();
        assert_eq!(commas_hsv, semicolons);
    }

    #[test]
    fn without_mode_hint_commas_decode_as_rgb() {
        let color = json!("200,100,20");
        assert_eq!(decode_color(&color, None).unwrap().as_str(), "#C86414");
    }

    #[test]
    fn short_triplet_falls_back_to_hex() {
        // "1,2" fails the triplet parse and the hex fallback rejects "12".
        assert!(decode_color(&json!("1,2"), None).is_none());
        // "aa,bb,cc" fails numeric parse but strips to a valid hex literal.
        assert_eq!(
            decode_color(&json!("aa,bb,cc"), None).unwrap().as_str(),
            "#AABBCC"
        );
    }

    #[test]
    fn malformed_inputs_unavailable() {
        assert!(decode_color(&json!(""), None).is_none());
        assert!(decode_color(&json!("xyz"), None).is_none());
        assert!(decode_color(&json!(42), None).is_none());
        assert!(decode_color(&json!(null), None).is_none());
        assert!(decode_color(&json!(["255", "0", "0"]), None).is_none());
    }

    #[test]
    fn body_without_color_unavailable() {
        assert!(decode_body_color(&body(json!({"on": true}))).is_none());
    }

    #[test]
    fn body_color_with_mode() {
        let b = body(json!({"color": "120,100,100", "mode": "hsv"}));
        assert_eq!(
            decode_body_color(&b).unwrap(),
            decode_color(&json!("120;100;100"), None).unwrap()
        );
    }
}
