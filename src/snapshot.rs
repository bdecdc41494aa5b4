// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device state snapshots produced by each poll cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::classify::DeviceKind;
use crate::color::{self, HexColor};
use crate::error::ReadError;

/// One polling cycle's result for one device.
///
/// A snapshot is produced fresh every cycle and is immutable once
/// constructed; consumers treat the latest snapshot per address as current
/// truth. Exactly one of `values` and `error` is present: a failed read
/// carries the error and no values, a successful read the reverse. The
/// [`ok`](DeviceSnapshot::ok) and [`failed`](DeviceSnapshot::failed)
/// constructors maintain this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    /// Configured device address.
    pub address: String,
    /// Device kind at poll time (possibly still unknown).
    pub kind: DeviceKind,
    /// Kind-shaped readings; absent when the read failed.
    pub values: Option<DeviceValues>,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Why the read failed; absent when it succeeded.
    pub error: Option<ReadError>,
    /// Configured device name.
    pub name: String,
    /// Configured room name.
    pub room: String,
}

impl DeviceSnapshot {
    /// Creates a snapshot for a successful read.
    #[must_use]
    pub fn ok(
        address: impl Into<String>,
        name: impl Into<String>,
        room: impl Into<String>,
        kind: DeviceKind,
        values: DeviceValues,
    ) -> Self {
        Self {
            address: address.into(),
            kind,
            values: Some(values),
            timestamp: Utc::now(),
            error: None,
            name: name.into(),
            room: room.into(),
        }
    }

    /// Creates a snapshot for a failed read.
    #[must_use]
    pub fn failed(
        address: impl Into<String>,
        name: impl Into<String>,
        room: impl Into<String>,
        kind: DeviceKind,
        error: ReadError,
    ) -> Self {
        Self {
            address: address.into(),
            kind,
            values: None,
            timestamp: Utc::now(),
            error: Some(error),
            name: name.into(),
            room: room.into(),
        }
    }

    /// Returns `true` if the read succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the device's on-state for alerting purposes.
    ///
    /// Switches use the relay, bulbs the `on` flag, motion sensors the
    /// motion flag. Unknown or failed reads count as off.
    #[must_use]
    pub fn is_on(&self) -> bool {
        match &self.values {
            Some(DeviceValues::Switch { relay_on, .. }) => relay_on.unwrap_or(false),
            Some(DeviceValues::Bulb { on, .. }) => on.unwrap_or(false),
            Some(DeviceValues::Motion {
                motion_detected, ..
            }) => motion_detected.unwrap_or(false),
            _ => false,
        }
    }

    /// Returns the reported power draw, if this kind carries one.
    #[must_use]
    pub fn power_watts(&self) -> Option<f64> {
        match &self.values {
            Some(DeviceValues::Switch { power_watts, .. })
            | Some(DeviceValues::Bulb { power_watts, .. }) => *power_watts,
            _ => None,
        }
    }
}

/// Kind-dependent readings of one device.
///
/// Serialized untagged with camelCase fields, so consumers see a flat value
/// object whose shape follows the device kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceValues {
    /// PIR motion sensor readings.
    #[serde(rename_all = "camelCase")]
    Motion {
        /// Whether motion is currently detected.
        motion_detected: Option<bool>,
        /// Ambient light level, if reported.
        illuminance: Option<f64>,
        /// Sensor temperature, if reported.
        temperature: Option<f64>,
    },
    /// Switch readings.
    #[serde(rename_all = "camelCase")]
    Switch {
        /// Whether the relay is closed.
        relay_on: Option<bool>,
        /// Current power draw in watts, if reported.
        power_watts: Option<f64>,
        /// Device temperature, if reported.
        temperature: Option<f64>,
    },
    /// Bulb readings.
    #[serde(rename_all = "camelCase")]
    Bulb {
        /// Whether the bulb is on.
        on: Option<bool>,
        /// Raw vendor color payload, passed through untouched.
        color_raw: Option<Value>,
        /// Current power draw in watts, if reported.
        power_watts: Option<f64>,
        /// Canonical hex color; absent when decoding failed.
        color_hex: Option<HexColor>,
    },
    /// Raw body of a device that is still unclassified.
    Unclassified(Map<String, Value>),
}

impl DeviceValues {
    /// Shapes a raw status body into the kind-specific value record.
    ///
    /// For bulbs the color is additionally decoded; a decode failure just
    /// leaves `color_hex` absent.
    #[must_use]
    pub fn from_body(kind: DeviceKind, body: &Map<String, Value>) -> Self {
        match kind {
            DeviceKind::Motion => Self::Motion {
                motion_detected: body.get("motion").and_then(read_bool),
                illuminance: number(body, "light"),
                temperature: number(body, "temperature"),
            },
            DeviceKind::Switch => Self::Switch {
                relay_on: body.get("relay").and_then(read_bool),
                power_watts: number(body, "power"),
                temperature: number(body, "temperature"),
            },
            DeviceKind::Bulb => Self::Bulb {
                on: body.get("on").and_then(read_bool),
                color_raw: body.get("color").cloned(),
                power_watts: number(body, "power"),
                color_hex: color::decode_body_color(body),
            },
            DeviceKind::Unknown => Self::Unclassified(body.clone()),
        }
    }
}

fn number(body: &Map<String, Value>, key: &str) -> Option<f64> {
    body.get(key).and_then(Value::as_f64)
}

/// Lenient boolean coercion for vendor payloads.
///
/// Accepts real booleans, nonzero numbers, and the strings `"true"` / `"1"`.
fn read_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => Some(s.eq_ignore_ascii_case("true") || s == "1"),
        _ => None,
    }
}
