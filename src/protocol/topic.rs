// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topics used by the appliance firmware.
//!
//! The topic names are fixed by the firmware. Every topic except `mode` is
//! used in both directions: the appliance reports its state on it and
//! accepts commands on it.

use std::fmt;

/// One of the appliance topics.
///
/// # Examples
///
/// ```
/// use vakio_bridge::protocol::Topic;
///
/// assert_eq!(Topic::from_topic("vakio/speed"), Some(Topic::Speed));
/// assert_eq!(Topic::WorkMode.as_str(), "vakio/workmode");
/// assert!(!Topic::Mode.is_writable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// System commands (`0689` reboot, ...).
    System,
    /// On/off state.
    State,
    /// Decimal fan speed.
    Speed,
    /// Work profile name.
    WorkMode,
    /// Composite five-digit mode code. Inbound only.
    Mode,
}

impl Topic {
    /// Every topic the bridge subscribes to.
    pub const ALL: [Self; 5] = [
        Self::System,
        Self::State,
        Self::Speed,
        Self::WorkMode,
        Self::Mode,
    ];

    /// Returns the full topic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "vakio/system",
            Self::State => "vakio/state",
            Self::Speed => "vakio/speed",
            Self::WorkMode => "vakio/workmode",
            Self::Mode => "vakio/mode",
        }
    }

    /// Matches a received topic name. Returns `None` for foreign topics.
    #[must_use]
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == topic)
    }

    /// Returns `true` if commands may be published on this topic.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, Self::Mode)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
