// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device kind inference from response field presence.
//!
//! myStrom devices do not announce their model in a uniform way, but their
//! status bodies have distinctive fields: motion sensors report `motion`,
//! switches report `relay`, bulbs report `on` and `color`. Classification is
//! a pure field-presence check over a parsed body; no network I/O happens
//! here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of a polled device.
///
/// Devices start out as [`Unknown`](DeviceKind::Unknown) and are reclassified
/// during polling as soon as they return a recognizable body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceKind {
    /// PIR motion sensor.
    Motion,
    /// Smart plug / relay switch.
    Switch,
    /// Color bulb.
    Bulb,
    /// Not yet classified.
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Returns `true` if the kind has not been inferred yet.
    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }

    /// Returns the kind as an uppercase string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Motion => "MOTION",
            Self::Switch => "SWITCH",
            Self::Bulb => "BULB",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infers the device kind from a status body.
///
/// The precedence is a fixed tie-break: a body exposing both `motion` and
/// `relay` classifies as [`DeviceKind::Motion`].
#[must_use]
pub fn classify(body: &Map<String, Value>) -> DeviceKind {
    if body.contains_key("motion") {
        DeviceKind::Motion
    } else if body.contains_key("relay") {
        DeviceKind::Switch
    } else if body.contains_key("on") || body.contains_key("color") {
        DeviceKind::Bulb
    } else {
        DeviceKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> Map<String, Value> {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn classify_motion() {
        let b = body(serde_json::json!({"motion": true, "light": 23}));
        assert_eq!(classify(&b), DeviceKind::Motion);
    }

    #[test]
    fn classify_switch() {
        let b = body(serde_json::json!({"relay": false, "power": 3.5}));
        assert_eq!(classify(&b), DeviceKind::Switch);
    }

    #[test]
    fn classify_bulb_by_on() {
        let b = body(serde_json::json!({"on": true}));
        assert_eq!(classify(&b), DeviceKind::Bulb);
    }

    #[test]
    fn classify_bulb_by_color() {
        let b = body(serde_json::json!({"color": "FF0000"}));
        assert_eq!(classify(&b), DeviceKind::Bulb);
    }

    #[test]
    fn motion_takes_precedence_over_relay() {
        let b = body(serde_json::json!({"motion": false, "relay": true}));
        assert_eq!(classify(&b), DeviceKind::Motion);
    }

    #[test]
    fn relay_takes_precedence_over_on() {
        let b = body(serde_json::json!({"relay": true, "on": true}));
        assert_eq!(classify(&b), DeviceKind::Switch);
    }

    #[test]
    fn unrecognized_body_stays_unknown() {
        let b = body(serde_json::json!({"firmware": "1.2.3"}));
        assert_eq!(classify(&b), DeviceKind::Unknown);
    }

    #[test]
    fn kind_display() {
        assert_eq!(DeviceKind::Motion.to_string(), "MOTION");
        assert_eq!(DeviceKind::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn kind_default_is_unknown() {
        assert!(DeviceKind::default().is_unknown());
    }
}
