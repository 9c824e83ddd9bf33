// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System commands exchanged on the system topic.

use super::normalize;

/// System command sent to or reported by the appliance.
///
/// Besides the three named commands, the firmware publishes a family of
/// internal codes starting with `0600` or `0601`. These are grouped under
/// [`SystemCommand::InternalSystem`].
///
/// # Examples
///
/// ```
/// use vakio_bridge::types::SystemCommand;
///
/// assert_eq!(SystemCommand::parse("0689"), SystemCommand::Reboot);
/// assert_eq!(SystemCommand::parse("06013"), SystemCommand::InternalSystem);
/// assert_eq!(SystemCommand::parse("0700"), SystemCommand::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemCommand {
    /// No command seen yet, or an unrecognized payload.
    #[default]
    Unknown,
    /// Any other `0600x`/`0601x` firmware code.
    InternalSystem,
    /// Factory reset.
    FullReset,
    /// Firmware update followed by a reboot.
    UpdateFirmware,
    /// Reboot.
    Reboot,
}

impl SystemCommand {
    /// Prefixes of the firmware's internal command family.
    const INTERNAL_PREFIXES: [&'static str; 2] = ["0600", "0601"];

    /// Parses a raw payload. Never fails; unrecognized input yields `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = normalize(raw);
        match raw.as_str() {
            "0608" => Self::FullReset,
            "0609" => Self::UpdateFirmware,
            "0689" => Self::Reboot,
            other
                if Self::INTERNAL_PREFIXES
                    .iter()
                    .any(|prefix| other.starts_with(prefix)) =>
            {
                Self::InternalSystem
            }
            _ => Self::Unknown,
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    ///
    /// Unlike [`parse`](Self::parse), this accepts the `internal_system`
    /// label, which the appliance never sends but the status JSON contains.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        if raw == Self::InternalSystem.as_str() {
            Self::InternalSystem
        } else {
            Self::parse(raw)
        }
    }

    /// Returns the wire representation. `Unknown` maps to an empty string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::InternalSystem => "internal_system",
            Self::FullReset => "0608",
            Self::UpdateFirmware => "0609",
            Self::Reboot => "0689",
        }
    }

    /// Returns `true` for the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

wire_string!(SystemCommand, SystemCommand::from_wire);
