// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Latest-snapshot store keyed by device address.
//!
//! This is the read-only surface handed to rendering collaborators: the most
//! recent snapshot per device, last write wins, no history.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::snapshot::DeviceSnapshot;

/// Cloneable handle to the latest snapshot per device address.
///
/// # Examples
///
/// ```
/// use stromr_lib::SnapshotStore;
///
/// let store = SnapshotStore::new();
/// assert!(store.latest("192.168.1.40").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<HashMap<String, DeviceSnapshot>>>,
}

impl SnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest snapshot for an address, if any cycle has produced
    /// one.
    #[must_use]
    pub fn latest(&self, address: &str) -> Option<DeviceSnapshot> {
        self.inner.read().get(address).cloned()
    }

    /// Applies a cycle's batch, replacing the stored snapshot per address.
    pub fn apply_batch(&self, batch: &[DeviceSnapshot]) {
        let mut inner = self.inner.write();
        for snapshot in batch {
            inner.insert(snapshot.address.clone(), snapshot.clone());
        }
    }

    /// Returns all addresses with a stored snapshot.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Returns the number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if no snapshot has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
