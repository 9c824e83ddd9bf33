// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduling phases of the availability monitor.

/// Phase of the probe schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Before the first completed probe attempt. Short period.
    #[default]
    WarmingUp,
    /// After the first completed probe attempt. Long period.
    SteadyState,
}

impl Phase {
    /// Returns the phase that follows a completed probe attempt.
    #[must_use]
    pub const fn after_attempt(self) -> Self {
        Self::SteadyState
    }

    /// Returns `true` while warming up.
    #[must_use]
    pub const fn is_warming_up(self) -> bool {
        matches!(self, Self::WarmingUp)
    }
}
