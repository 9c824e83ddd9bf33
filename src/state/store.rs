// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared handle to the device status.

use std::sync::Arc;

use parking_lot::RwLock;

use super::DeviceStatus;

/// Cloneable, thread-safe handle to the one [`DeviceStatus`] of the service.
///
/// The record is always locked as a whole: readers get a consistent copy of
/// every field, and writers see and replace every field at once.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<DeviceStatus>>,
}

impl StatusStore {
    /// Creates a store holding the initial record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> DeviceStatus {
        self.inner.read().clone()
    }

    /// Runs `f` on the record under the write lock.
    ///
    /// The lock is held for the duration of `f`; do not await or block in it.
    pub fn update<R>(&self, f: impl FnOnce(&mut DeviceStatus) -> R) -> R {
        let mut status = self.inner.write();
        f(&mut status)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::types::{FanSpeed, PowerState};

    #[test]
    fn clones_share_the_record() {
        let store = StatusStore::new();
        let other = store.clone();

        other.update(|status| status.available = true);
        assert!(store.snapshot().available);
    }

    #[test]
    fn snapshot_is_detached() {
        let store = StatusStore::new();
        let snapshot = store.snapshot();
        store.update(|status| status.speed = FanSpeed::new(5));

        assert_eq!(snapshot.speed, FanSpeed::OFF);
        assert_eq!(store.snapshot().speed, FanSpeed::new(5));
    }

    #[test]
    fn concurrent_writers_keep_record_consistent() {
        let store = StatusStore::new();
        let handles: Vec<_> = (0..8u64)
            .map(|n| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(|status| {
                            status.speed = FanSpeed::new(n);
                            status.state = PowerState::from(n > 0);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let status = store.snapshot();
        assert_eq!(status.state.is_on(), status.speed.is_running());
    }
}
