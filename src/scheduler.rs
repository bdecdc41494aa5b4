// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-interval scheduling of poll cycles.
//!
//! A single loop drives the engine at the effective tick period (the minimum
//! of the configured per-kind intervals). Cycles run to completion inside the
//! loop, so two cycles never overlap; a cycle that overruns its period simply
//! delays the next tick. Stopping lets an in-flight cycle finish and prevents
//! any further ones.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::PollIntervals;
use crate::poll::PollEngine;
use crate::snapshot::DeviceSnapshot;
use crate::store::SnapshotStore;

/// Capacity of the batch broadcast channel.
const BATCH_CHANNEL_CAPACITY: usize = 16;

/// Runs the poll engine on a fixed interval.
///
/// Each tick produces one batch of snapshots, applied to the shared
/// [`SnapshotStore`] and broadcast to subscribers as a single unit.
///
/// # Examples
///
/// ```no_run
/// use stromr_lib::{PollConfig, PollEngine, PollScheduler, RoomConfig};
///
/// # async fn example() -> stromr_lib::Result<()> {
/// let config = PollConfig::new()
///     .with_room(RoomConfig::new("Hall").with_device("PIR", "192.168.1.41"));
///
/// let engine = PollEngine::new(&config)?;
/// let scheduler = PollScheduler::new(engine, config.intervals);
///
/// let mut batches = scheduler.subscribe();
/// scheduler.start();
///
/// let batch = batches.recv().await.unwrap();
/// println!("{} snapshots", batch.len());
///
/// scheduler.stop();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PollScheduler {
    engine: Arc<PollEngine>,
    intervals: PollIntervals,
    store: SnapshotStore,
    sender: broadcast::Sender<Vec<DeviceSnapshot>>,
    running: Mutex<Option<ScheduleHandle>>,
}

#[derive(Debug)]
struct ScheduleHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollScheduler {
    /// Creates a scheduler for the given engine and intervals.
    #[must_use]
    pub fn new(engine: PollEngine, intervals: PollIntervals) -> Self {
        let (sender, _) = broadcast::channel(BATCH_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(engine),
            intervals,
            store: SnapshotStore::new(),
            sender,
            running: Mutex::new(None),
        }
    }

    /// Returns the effective tick period.
    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        self.intervals.effective()
    }

    /// Returns a handle to the latest-snapshot store.
    #[must_use]
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    /// Subscribes to per-cycle snapshot batches.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<DeviceSnapshot>> {
        self.sender.subscribe()
    }

    /// Returns `true` while the repeating task is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }

    /// Starts the repeating poll task, replacing any previous schedule.
    ///
    /// The first cycle runs immediately; subsequent cycles follow at the
    /// tick period. Restarting (e.g. on reconfiguration) cancels the old
    /// schedule first, so timers never overlap.
    pub fn start(&self) {
        self.stop();

        let engine = Arc::clone(&self.engine);
        let store = self.store.clone();
        let sender = self.sender.clone();
        let period = self.tick_period();
        let (stop_tx, mut stop_rx) = watch::channel(false);

        tracing::info!(period_ms = period.as_millis(), "starting poll schedule");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let batch = engine.run_cycle().await;
                        tracing::debug!(devices = batch.len(), "poll cycle completed");
                        store.apply_batch(&batch);
                        // No subscribers is fine; the store still updates.
                        let _ = sender.send(batch);
                    }
                    _ = stop_rx.changed() => {
                        tracing::info!("poll schedule stopped");
                        break;
                    }
                }
            }
        });

        *self.running.lock() = Some(ScheduleHandle { stop_tx, task });
    }

    /// Stops the repeating task.
    ///
    /// An in-flight cycle is not aborted; it completes and delivers its
    /// batch, but no new cycle is scheduled afterwards.
    pub fn stop(&self) {
        if let Some(handle) = self.running.lock().take() {
            let _ = handle.stop_tx.send(true);
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
