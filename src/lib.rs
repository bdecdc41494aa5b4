// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `StromR` Lib - A Rust library to monitor myStrom devices.
//!
//! This library polls myStrom-style smart devices over their local HTTP
//! APIs and turns the heterogeneous vendor payloads into uniform,
//! kind-shaped snapshots.
//!
//! # Supported Features
//!
//! - **Type detection**: Devices are classified from their own status body
//!   (motion sensor, switch, bulb) with no per-device configuration
//! - **Endpoint probing**: Several known API paths are tried in order, so
//!   different firmware generations work without configuration
//! - **Color normalization**: Vendor color payloads (hex strings, RGB
//!   triplets, HSV strings, component maps) decode to one canonical
//!   `#RRGGBB` form
//! - **Scheduled polling**: A fixed-interval scheduler fans out concurrent
//!   reads and broadcasts each cycle's batch; a slow or dead device never
//!   blocks the others
//! - **Alerting**: Edge detection over successive batches (on/off, power
//!   thresholds, motion clearing)
//!
//! # Quick Start
//!
//! ```no_run
//! use stromr_lib::{PollConfig, PollEngine, PollScheduler, RoomConfig};
//!
//! #[tokio::main]
//! async fn main() -> stromr_lib::Result<()> {
//!     let config = PollConfig::new()
//!         .with_room(
//!             RoomConfig::new("Living Room")
//!                 .with_device("Bulb", "192.168.1.40")
//!                 .with_device("PIR", "192.168.1.41"),
//!         )
//!         .with_room(RoomConfig::new("Kitchen").with_device("Plug", "192.168.1.42"));
//!
//!     let engine = PollEngine::new(&config)?;
//!     let scheduler = PollScheduler::new(engine, config.intervals);
//!
//!     let mut batches = scheduler.subscribe();
//!     scheduler.start();
//!
//!     while let Ok(batch) = batches.recv().await {
//!         for snapshot in &batch {
//!             println!("{} [{}]: on={}", snapshot.name, snapshot.kind, snapshot.is_on());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # One-Shot Cycle
//!
//! The engine also runs standalone for callers that bring their own timing:
//!
//! ```no_run
//! use stromr_lib::{PollConfig, PollEngine, RoomConfig};
//!
//! #[tokio::main]
//! async fn main() -> stromr_lib::Result<()> {
//!     let config = PollConfig::new()
//!         .with_room(RoomConfig::new("Office").with_device("Plug", "192.168.1.42"));
//!     let engine = PollEngine::new(&config)?;
//!
//!     let batch = engine.run_cycle().await;
//!     println!("{}", serde_json::to_string_pretty(&batch).unwrap());
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod classify;
pub mod color;
pub mod config;
pub mod error;
pub mod poll;
pub mod probe;
pub mod scheduler;
pub mod snapshot;
pub mod store;

pub use alert::{Alert, AlertTracker, PowerThresholds, Transition};
pub use classify::{DeviceKind, classify};
pub use color::HexColor;
pub use config::{DeviceConfig, PollConfig, PollIntervals, RoomConfig};
pub use error::{Error, ProtocolError, ReadError, Result};
pub use poll::{PollEngine, PolledDevice};
pub use probe::Prober;
pub use scheduler::PollScheduler;
pub use snapshot::{DeviceSnapshot, DeviceValues};
pub use store::SnapshotStore;
