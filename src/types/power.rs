// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off state of the ventilation unit.

use super::normalize;

/// Represents the power state of the ventilation unit.
///
/// # Examples
///
/// ```
/// use vakio_bridge::types::PowerState;
///
/// assert_eq!(PowerState::parse("on"), PowerState::On);
/// assert_eq!(PowerState::parse("Off\n"), PowerState::Off);
/// assert_eq!(PowerState::parse("toggle"), PowerState::Unknown);
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    /// State not reported yet, or an unrecognized payload.
    #[default]
    Unknown,
    /// The unit is switched off.
    Off,
    /// The unit is running.
    On,
}

impl PowerState {
    /// Parses a raw payload. Never fails; unrecognized input yields `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire representation. `Unknown` maps to an empty string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` if the unit is running.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns `true` for the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

wire_string!(PowerState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_values() {
        assert_eq!(PowerState::parse("on"), PowerState::On);
        assert_eq!(PowerState::parse("OFF"), PowerState::Off);
        assert_eq!(PowerState::parse("  On\t"), PowerState::On);
    }

    #[test]
    fn parse_unknown_values() {
        for raw in ["", "1", "true", "onn", "toggle"] {
            assert_eq!(PowerState::parse(raw), PowerState::Unknown, "{raw:?}");
        }
    }

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }

    #[test]
    fn serializes_as_wire_string() {
        assert_eq!(serde_json::to_string(&PowerState::On).unwrap(), "\"on\"");
        assert_eq!(serde_json::to_string(&PowerState::Unknown).unwrap(), "\"\"");
        let parsed: PowerState = serde_json::from_str("\"OFF\"").unwrap();
        assert_eq!(parsed, PowerState::Off);
    }
}
