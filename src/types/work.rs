// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating profiles of the ventilation unit.

use super::normalize;

/// Named operating profile.
///
/// # Examples
///
/// ```
/// use vakio_bridge::types::WorkProfile;
///
/// assert_eq!(WorkProfile::parse("Night"), WorkProfile::Night);
/// assert_eq!(WorkProfile::Recuperator.as_str(), "recuperator");
/// assert!(WorkProfile::parse("bogus").is_unknown());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkProfile {
    /// Profile not reported yet, or an unrecognized payload.
    #[default]
    Unknown,
    /// Supply air only.
    Inflow,
    /// Heat recovery, summer cycle.
    Recuperator,
    /// Supply air at full speed.
    InflowMax,
    /// Heat recovery, winter cycle.
    Winter,
    /// Exhaust only.
    Outflow,
    /// Exhaust at full speed.
    OutflowMax,
    /// Quiet night profile.
    Night,
}

impl WorkProfile {
    /// Every known profile, in wire order.
    pub const ALL: [Self; 7] = [
        Self::Inflow,
        Self::Recuperator,
        Self::InflowMax,
        Self::Winter,
        Self::Outflow,
        Self::OutflowMax,
        Self::Night,
    ];

    /// Parses a raw payload. Never fails; unrecognized input yields `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str() == raw)
            .unwrap_or(Self::Unknown)
    }

    /// Returns the wire representation. `Unknown` maps to an empty string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Inflow => "inflow",
            Self::Recuperator => "recuperator",
            Self::InflowMax => "inflow_max",
            Self::Winter => "winter",
            Self::Outflow => "outflow",
            Self::OutflowMax => "outflow_max",
            Self::Night => "night",
        }
    }

    /// Returns `true` for the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

wire_string!(WorkProfile);
