// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge-transition detection over snapshot batches.
//!
//! The tracker compares consecutive snapshots per device and emits an
//! [`Alert`] for each observed transition: on/off edges, power threshold
//! crossings, and motion clearing. What to do with an alert — play a sound,
//! send an email — is the consumer's business; this module only detects the
//! edges.

use std::collections::HashMap;

use serde::Deserialize;

use crate::classify::DeviceKind;
use crate::snapshot::DeviceSnapshot;

/// Per-kind power thresholds in watts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PowerThresholds {
    /// Threshold for switches.
    #[serde(default = "default_switch_watts")]
    pub switch_watts: Option<f64>,
    /// Threshold for bulbs.
    #[serde(default = "default_bulb_watts")]
    pub bulb_watts: Option<f64>,
}

impl PowerThresholds {
    fn for_kind(&self, kind: DeviceKind) -> Option<f64> {
        match kind {
            DeviceKind::Switch => self.switch_watts,
            DeviceKind::Bulb => self.bulb_watts,
            _ => None,
        }
    }
}

impl Default for PowerThresholds {
    fn default() -> Self {
        Self {
            switch_watts: default_switch_watts(),
            bulb_watts: default_bulb_watts(),
        }
    }
}

fn default_switch_watts() -> Option<f64> {
    Some(100.0)
}

fn default_bulb_watts() -> Option<f64> {
    Some(4.0)
}

/// One detected state transition on one device.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Device address.
    pub address: String,
    /// Device name.
    pub name: String,
    /// Room name.
    pub room: String,
    /// Device kind at the time of the transition.
    pub kind: DeviceKind,
    /// What changed.
    pub transition: Transition,
}

/// The kind of transition an [`Alert`] reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Off → on edge (relay closed, bulb lit, or motion detected).
    TurnedOn,
    /// On → off edge.
    TurnedOff,
    /// Power draw rose to or above the threshold.
    PowerExceeded {
        /// Reported power draw.
        watts: f64,
        /// Configured threshold.
        threshold: f64,
    },
    /// Power draw dropped back below the threshold.
    PowerNormal {
        /// Reported power draw.
        watts: f64,
        /// Configured threshold.
        threshold: f64,
    },
    /// Motion sensor went from motion to clear. Emitted alongside
    /// [`Transition::TurnedOff`] for motion sensors.
    MotionCleared,
}

/// Stateful edge detector over successive snapshot batches.
///
/// Snapshots with an error are skipped entirely; they neither emit alerts
/// nor update the remembered state, so a flaky device does not fire spurious
/// off/on edges.
#[derive(Debug, Default)]
pub struct AlertTracker {
    thresholds: PowerThresholds,
    last_on: HashMap<String, bool>,
    last_exceeded: HashMap<String, bool>,
}

impl AlertTracker {
    /// Creates a tracker with the given thresholds.
    #[must_use]
    pub fn new(thresholds: PowerThresholds) -> Self {
        Self {
            thresholds,
            last_on: HashMap::new(),
            last_exceeded: HashMap::new(),
        }
    }

    /// Processes one cycle's batch and returns the detected transitions.
    pub fn process_batch(&mut self, batch: &[DeviceSnapshot]) -> Vec<Alert> {
        let mut alerts = Vec::new();
        for snapshot in batch {
            if snapshot.values.is_none() {
                continue;
            }
            self.process(snapshot, &mut alerts);
        }
        alerts
    }

    fn process(&mut self, snapshot: &DeviceSnapshot, alerts: &mut Vec<Alert>) {
        let is_on = snapshot.is_on();
        let was_on = self
            .last_on
            .insert(snapshot.address.clone(), is_on)
            .unwrap_or(false);

        if !was_on && is_on {
            alerts.push(make_alert(snapshot, Transition::TurnedOn));
        }
        if was_on && !is_on {
            alerts.push(make_alert(snapshot, Transition::TurnedOff));
            if snapshot.kind == DeviceKind::Motion {
                alerts.push(make_alert(snapshot, Transition::MotionCleared));
            }
        }

        if let Some(threshold) = self.thresholds.for_kind(snapshot.kind)
            && let Some(watts) = snapshot.power_watts()
        {
            let exceeds = watts >= threshold;
            let exceeded_before = self
                .last_exceeded
                .insert(snapshot.address.clone(), exceeds)
                .unwrap_or(false);

            if !exceeded_before && exceeds {
                alerts.push(make_alert(snapshot, Transition::PowerExceeded { watts, threshold }));
            }
            if exceeded_before && !exceeds {
                alerts.push(make_alert(snapshot, Transition::PowerNormal { watts, threshold }));
            }
        }
    }
}

fn make_alert(snapshot: &DeviceSnapshot, transition: Transition) -> Alert {
    Alert {
        address: snapshot.address.clone(),
        name: snapshot.name.clone(),
        room: snapshot.room.clone(),
        kind: snapshot.kind,
        transition,
    }
}
