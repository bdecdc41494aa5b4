// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling configuration: rooms, devices, intervals and timeout.
//!
//! Configuration is consumed once at startup (or on reconfigure). All types
//! deserialize from JSON with sensible defaults and offer `with_*` builders
//! for programmatic construction.

use std::time::Duration;

use serde::Deserialize;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(4000);

/// Fallback tick period used when every configured interval is zero.
pub const FALLBACK_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Top-level polling configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stromr_lib::{PollConfig, RoomConfig};
///
/// let config = PollConfig::new()
///     .with_room(
///         RoomConfig::new("Living Room")
///             .with_device("Ceiling Bulb", "192.168.1.40")
///             .with_device("PIR", "192.168.1.41"),
///     )
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.device_count(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollConfig {
    /// Rooms with their device lists.
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    /// Per-kind polling intervals.
    #[serde(default)]
    pub intervals: PollIntervals,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl PollConfig {
    /// Creates an empty configuration with default intervals and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: Vec::new(),
            intervals: PollIntervals::default(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Adds a room.
    #[must_use]
    pub fn with_room(mut self, room: RoomConfig) -> Self {
        self.rooms.push(room);
        self
    }

    /// Sets the per-kind polling intervals.
    #[must_use]
    pub fn with_intervals(mut self, intervals: PollIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the total number of configured devices across all rooms.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.rooms.iter().map(|r| r.devices.len()).sum()
    }
}

/// One room and the devices it contains.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Display name of the room.
    pub room: String,
    /// Devices in this room.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl RoomConfig {
    /// Creates an empty room.
    #[must_use]
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            devices: Vec::new(),
        }
    }

    /// Adds a device to the room.
    #[must_use]
    pub fn with_device(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.devices.push(DeviceConfig {
            name: name.into(),
            address: address.into(),
        });
        self
    }
}

/// Identity and address of one configured device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Display name of the device.
    pub name: String,
    /// Host or IP address of the device. Legacy configs use the key `ip`.
    #[serde(alias = "ip")]
    pub address: String,
}

/// Per-kind polling intervals in milliseconds.
///
/// A single scheduling loop polls every device; its tick period is the
/// minimum of these intervals (see [`PollIntervals::effective`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollIntervals {
    /// Motion sensor polling interval.
    #[serde(default = "default_motion_ms")]
    pub motion_ms: u64,
    /// Switch polling interval.
    #[serde(default = "default_switch_ms")]
    pub switch_ms: u64,
    /// Bulb polling interval.
    #[serde(default = "default_bulb_ms")]
    pub bulb_ms: u64,
}

impl PollIntervals {
    /// Returns the effective tick period: the minimum configured interval,
    /// or [`FALLBACK_POLL_INTERVAL`] when the minimum is zero.
    #[must_use]
    pub fn effective(&self) -> Duration {
        let min = self.motion_ms.min(self.switch_ms).min(self.bulb_ms);
        if min == 0 {
            FALLBACK_POLL_INTERVAL
        } else {
            Duration::from_millis(min)
        }
    }
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            motion_ms: default_motion_ms(),
            switch_ms: default_switch_ms(),
            bulb_ms: default_bulb_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    4000
}

fn default_motion_ms() -> u64 {
    10_000
}

fn default_switch_ms() -> u64 {
    2000
}

fn default_bulb_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PollConfig::new();
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.intervals.motion_ms, 10_000);
        assert_eq!(config.intervals.switch_ms, 2000);
        assert_eq!(config.intervals.bulb_ms, 2000);
        assert_eq!(config.device_count(), 0);
    }

    #[test]
    fn effective_interval_is_minimum() {
        let intervals = PollIntervals {
            motion_ms: 10_000,
            switch_ms: 2000,
            bulb_ms: 2000,
        };
        assert_eq!(intervals.effective(), Duration::from_millis(2000));
    }

    #[test]
    fn effective_interval_zero_falls_back() {
        let intervals = PollIntervals {
            motion_ms: 0,
            switch_ms: 0,
            bulb_ms: 0,
        };
        assert_eq!(intervals.effective(), FALLBACK_POLL_INTERVAL);

        // One zero interval drags the minimum to zero as well.
        let intervals = PollIntervals {
            motion_ms: 10_000,
            switch_ms: 0,
            bulb_ms: 2000,
        };
        assert_eq!(intervals.effective(), FALLBACK_POLL_INTERVAL);
    }

    #[test]
    fn builder_chain() {
        let config = PollConfig::new()
            .with_room(
                RoomConfig::new("Kitchen")
                    .with_device("Plug", "192.168.1.20")
                    .with_device("Bulb", "192.168.1.21"),
            )
            .with_room(RoomConfig::new("Hall").with_device("PIR", "192.168.1.22"))
            .with_timeout(Duration::from_secs(1));

        assert_eq!(config.rooms.len(), 2);
        assert_eq!(config.device_count(), 3);
        assert_eq!(config.timeout_ms, 1000);
    }

    #[test]
    fn deserialize_with_legacy_ip_key() {
        let json = r#"{
            "rooms": [
                {"room": "Office", "devices": [{"name": "Desk", "ip": "10.0.0.5"}]}
            ],
            "intervals": {"switch_ms": 500}
        }"#;
        let config: PollConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rooms[0].devices[0].address, "10.0.0.5");
        assert_eq!(config.intervals.switch_ms, 500);
        assert_eq!(config.intervals.motion_ms, 10_000);
        assert_eq!(config.timeout_ms, 4000);
    }
}
