// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed type.
//!
//! The appliance runs at one of seven fixed speeds. Profiles such as
//! `inflow_max` drive the fan at full power, which is represented by the
//! [`FanSpeed::MAX`] sentinel rather than a literal RPM value.

use std::fmt;

/// Fan speed of the ventilation unit.
///
/// Valid values are `0` (stopped), `1..=7`, and [`FanSpeed::MAX`]. Inbound
/// speed reports are trusted as published, so any `u64` is representable.
///
/// On the wire and in JSON the value is a plain unsigned integer; `MAX` is
/// `u64::MAX`.
///
/// # Examples
///
/// ```
/// use vakio_bridge::types::FanSpeed;
///
/// let speed = FanSpeed::parse("3").unwrap();
/// assert_eq!(speed.value(), 3);
/// assert!(speed.is_running());
///
/// assert!(FanSpeed::parse("fast").is_none());
/// assert!(FanSpeed::MAX.is_max());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct FanSpeed(u64);

impl FanSpeed {
    /// The fan is stopped.
    pub const OFF: Self = Self(0);

    /// Highest fixed speed step.
    pub const TOP_STEP: u64 = 7;

    /// Sentinel for "maximum fan speed".
    pub const MAX: Self = Self(u64::MAX);

    /// Creates a fan speed from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parses a decimal speed payload.
    ///
    /// Surrounding whitespace is ignored. Returns `None` if the payload is
    /// not an unsigned decimal integer fitting in 64 bits.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(Self)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the fan is turning.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.0 > 0
    }

    /// Returns `true` for the maximum-speed sentinel.
    #[must_use]
    pub const fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Returns `true` for one of the fixed steps `1..=7`.
    #[must_use]
    pub const fn is_step(&self) -> bool {
        self.0 >= 1 && self.0 <= Self::TOP_STEP
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for FanSpeed {
    fn from(value: u8) -> Self {
        Self(u64::from(value))
    }
}
