// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound appliance commands.

use std::fmt;

use crate::protocol::Topic;
use crate::types::{PowerState, SystemCommand, WorkProfile};

/// A command understood by the appliance firmware.
///
/// | Command | Topic | Payload |
/// |---------|-------|---------|
/// | `Power(On)` | `vakio/state` | `on` |
/// | `Power(Off)` | `vakio/state` | `off` |
/// | `Speed(n)` | `vakio/speed` | decimal `n` |
/// | `Work(profile)` | `vakio/workmode` | profile name |
/// | `System(cmd)` | `vakio/system` | four-digit code |
///
/// # Examples
///
/// ```
/// use vakio_bridge::dispatch::Command;
/// use vakio_bridge::protocol::Topic;
/// use vakio_bridge::types::SystemCommand;
///
/// let cmd = Command::System(SystemCommand::Reboot);
/// assert_eq!(cmd.topic(), Topic::System);
/// assert_eq!(cmd.payload(), "0689");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch the unit on or off.
    Power(PowerState),
    /// Set a fixed fan speed.
    Speed(u8),
    /// Select a work profile.
    Work(WorkProfile),
    /// Send a system command.
    System(SystemCommand),
}

impl Command {
    /// Returns the topic the command is published on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::Power(_) => Topic::State,
            Self::Speed(_) => Topic::Speed,
            Self::Work(_) => Topic::WorkMode,
            Self::System(_) => Topic::System,
        }
    }

    /// Returns the wire payload.
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Self::Power(state) => state.as_str().to_string(),
            Self::Speed(speed) => speed.to_string(),
            Self::Work(work) => work.as_str().to_string(),
            Self::System(command) => command.as_str().to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.topic(), self.payload())
    }
}
