// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll cycle engine: one concurrent pass over all configured devices.
//!
//! Each cycle fans out one task per device, waits for all of them, and
//! reassembles the snapshots in configured order. Partial failure is
//! isolated: a device that times out or misbehaves yields an error snapshot
//! and never blocks or fails the rest of the batch.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;

use crate::classify::{DeviceKind, classify};
use crate::config::PollConfig;
use crate::error::Error;
use crate::probe::Prober;
use crate::snapshot::{DeviceSnapshot, DeviceValues};

/// One configured device and its mutable classification state.
///
/// Created once from configuration and kept for the process lifetime. The
/// kind starts [`Unknown`](DeviceKind::Unknown) and is set in place as soon
/// as the device returns a recognizable body; the assignment is idempotent,
/// so concurrent cycles racing on it are harmless.
#[derive(Debug)]
pub struct PolledDevice {
    room: String,
    name: String,
    address: String,
    kind: Mutex<DeviceKind>,
}

impl PolledDevice {
    fn new(room: String, name: String, address: String) -> Self {
        Self {
            room,
            name,
            address,
            kind: Mutex::new(DeviceKind::Unknown),
        }
    }

    /// Returns the room this device belongs to.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Returns the configured device name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the currently known device kind.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        *self.kind.lock()
    }

    fn set_kind(&self, kind: DeviceKind) {
        *self.kind.lock() = kind;
    }
}

/// Executes poll cycles over the configured device list.
#[derive(Debug)]
pub struct PollEngine {
    prober: Prober,
    devices: Vec<Arc<PolledDevice>>,
}

impl PollEngine {
    /// Builds an engine from configuration, flattening rooms into a single
    /// ordered device list.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &PollConfig) -> Result<Self, Error> {
        let prober = Prober::new(config.timeout())?;
        let devices = config
            .rooms
            .iter()
            .flat_map(|room| {
                room.devices.iter().map(|device| {
                    Arc::new(PolledDevice::new(
                        room.room.clone(),
                        device.name.clone(),
                        device.address.clone(),
                    ))
                })
            })
            .collect();
        Ok(Self { prober, devices })
    }

    /// Returns the configured devices in poll order.
    #[must_use]
    pub fn devices(&self) -> &[Arc<PolledDevice>] {
        &self.devices
    }

    /// Returns the number of configured devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Executes one concurrent pass over all devices.
    ///
    /// All device reads run independently; the returned batch preserves the
    /// configured device order, not completion order. The call resolves only
    /// once every device has either produced values or failed within its own
    /// timeout.
    pub async fn run_cycle(&self) -> Vec<DeviceSnapshot> {
        let mut tasks = JoinSet::new();
        for (index, device) in self.devices.iter().enumerate() {
            let prober = self.prober.clone();
            let device = Arc::clone(device);
            tasks.spawn(async move { (index, poll_device(&prober, &device).await) });
        }

        let mut slots: Vec<Option<DeviceSnapshot>> = Vec::new();
        slots.resize_with(self.devices.len(), || None);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, snapshot)) => slots[index] = Some(snapshot),
                Err(e) => tracing::error!(error = %e, "poll task failed to complete"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

/// Polls a single device: classify if needed, read, shape, never fail.
async fn poll_device(prober: &Prober, device: &PolledDevice) -> DeviceSnapshot {
    // Best-effort reclassification probe for devices that were offline or
    // unrecognized so far. Failure just leaves the device unknown until the
    // next cycle.
    if device.kind().is_unknown()
        && let Ok(body) = prober.probe(device.address()).await
    {
        let detected = classify(&body);
        if !detected.is_unknown() {
            tracing::info!(address = %device.address(), kind = %detected, "device reclassified");
            device.set_kind(detected);
        }
    }

    let body = match prober.probe(device.address()).await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(address = %device.address(), error = %error, "device read failed");
            return DeviceSnapshot::failed(
                device.address(),
                device.name(),
                device.room(),
                device.kind(),
                error,
            );
        }
    };

    // A device that came online between the probes classifies from the read
    // body directly.
    if device.kind().is_unknown() {
        let detected = classify(&body);
        if !detected.is_unknown() {
            tracing::info!(address = %device.address(), kind = %detected, "device reclassified");
            device.set_kind(detected);
        }
    }

    let kind = device.kind();
    let values = DeviceValues::from_body(kind, &body);
    DeviceSnapshot::ok(device.address(), device.name(), device.room(), kind, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;

    fn two_room_config() -> PollConfig {
        PollConfig::new()
            .with_room(
                RoomConfig::new("Living Room")
                    .with_device("Bulb", "192.168.1.40")
                    .with_device("PIR", "192.168.1.41"),
            )
            .with_room(RoomConfig::new("Kitchen").with_device("Plug", "192.168.1.42"))
    }

    #[test]
    fn engine_flattens_rooms_in_order() {
        let engine = PollEngine::new(&two_room_config()).unwrap();
        let devices = engine.devices();

        assert_eq!(engine.device_count(), 3);
        assert_eq!(devices[0].name(), "Bulb");
        assert_eq!(devices[0].room(), "Living Room");
        assert_eq!(devices[1].name(), "PIR");
        assert_eq!(devices[2].name(), "Plug");
        assert_eq!(devices[2].room(), "Kitchen");
    }

    #[test]
    fn devices_start_unknown() {
        let engine = PollEngine::new(&two_room_config()).unwrap();
        assert!(engine.devices().iter().all(|d| d.kind().is_unknown()));
    }

    #[test]
    fn kind_assignment_is_idempotent() {
        let device =
            PolledDevice::new("Hall".into(), "PIR".into(), "192.168.1.41".into());
        device.set_kind(DeviceKind::Motion);
        device.set_kind(DeviceKind::Motion);
        assert_eq!(device.kind(), DeviceKind::Motion);
    }

    #[tokio::test]
    async fn empty_config_yields_empty_batch() {
        let engine = PollEngine::new(&PollConfig::new()).unwrap();
        assert!(engine.run_cycle().await.is_empty());
    }
}
