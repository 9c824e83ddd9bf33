// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change-detection key over the observable fields.

use std::fmt;

use crate::types::{FanSpeed, PowerState, WorkProfile};

use super::DeviceStatus;

/// Snapshot of `(available, speed, state, work)`.
///
/// Two fingerprints are equal exactly when those four fields are equal.
/// Activity time, mode code, and last system command do not participate.
///
/// # Examples
///
/// ```
/// use vakio_bridge::state::DeviceStatus;
/// use vakio_bridge::types::Mode;
///
/// let mut status = DeviceStatus::new();
/// let before = status.fingerprint();
///
/// status.mode = Mode::Night;
/// assert_eq!(status.fingerprint(), before);
///
/// status.available = true;
/// assert_ne!(status.fingerprint(), before);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    available: bool,
    speed: FanSpeed,
    state: PowerState,
    work: WorkProfile,
}

impl Fingerprint {
    /// Computes the fingerprint of a status record.
    #[must_use]
    pub fn of(status: &DeviceStatus) -> Self {
        Self {
            available: status.available,
            speed: status.speed,
            state: status.state,
            work: status.work,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "available={} speed={} state={} work={}",
            self.available, self.speed, self.state, self.work
        )
    }
}
