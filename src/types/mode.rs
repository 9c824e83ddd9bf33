// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composite mode codes and their expansion table.
//!
//! The appliance reports its directive as a single five-digit code on the
//! mode topic. Codes are grouped by their leading digits:
//!
//! | Family | Meaning |
//! |--------|---------|
//! | `0600x` | power off / on |
//! | `0601x` | recuperator summer / winter |
//! | `0602x` | inflow / inflow max |
//! | `0603x` | outflow / outflow max |
//! | `0604x` | night |
//! | `0650x` | fixed speed 1-7 |
//!
//! A code only ever changes part of the decomposed status. The expansion
//! table ([`Mode::rule`]) says, per code, which of (state, speed, work) is
//! replaced by a literal and which keeps its current value.

use super::{FanSpeed, PowerState, WorkProfile, normalize};
use crate::state::DeviceStatus;

/// How one field is derived when a mode code is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy<T> {
    /// Keep the field's current value.
    Keep,
    /// Replace the field with a literal.
    Set(T),
}

impl<T: Copy> Policy<T> {
    /// Resolves the policy against the field's current value.
    #[must_use]
    pub fn resolve(self, current: T) -> T {
        match self {
            Self::Keep => current,
            Self::Set(value) => value,
        }
    }
}

/// One row of the mode expansion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRule {
    /// Policy for the on/off state.
    pub state: Policy<PowerState>,
    /// Policy for the fan speed.
    pub speed: Policy<FanSpeed>,
    /// Policy for the work profile.
    pub work: Policy<WorkProfile>,
}

impl ModeRule {
    const fn new(
        state: Policy<PowerState>,
        speed: Policy<FanSpeed>,
        work: Policy<WorkProfile>,
    ) -> Self {
        Self { state, speed, work }
    }

    const fn work(work: WorkProfile) -> Self {
        Self::new(Policy::Keep, Policy::Keep, Policy::Set(work))
    }

    const fn speed(speed: u64) -> Self {
        Self::new(Policy::Keep, Policy::Set(FanSpeed::new(speed)), Policy::Keep)
    }

    const fn full_speed(work: WorkProfile) -> Self {
        Self::new(Policy::Keep, Policy::Set(FanSpeed::MAX), Policy::Set(work))
    }
}

/// The (state, speed, work) triple a mode code decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeExpansion {
    /// Resulting on/off state.
    pub state: PowerState,
    /// Resulting fan speed.
    pub speed: FanSpeed,
    /// Resulting work profile.
    pub work: WorkProfile,
}

/// Composite mode code reported on the mode topic.
///
/// # Examples
///
/// ```
/// use vakio_bridge::state::DeviceStatus;
/// use vakio_bridge::types::{FanSpeed, Mode, WorkProfile};
///
/// let mut status = DeviceStatus::new();
/// status.speed = FanSpeed::new(2);
///
/// let expansion = Mode::parse("06022").expand(&status).unwrap();
/// assert_eq!(expansion.speed, FanSpeed::MAX);
/// assert_eq!(expansion.work, WorkProfile::InflowMax);
/// assert_eq!(expansion.state, status.state);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// No mode seen yet, or an unrecognized payload.
    #[default]
    Unknown,
    /// `06000`: switch off.
    Off,
    /// `06001`: switch on with the previous profile.
    On,
    /// `06010`: recuperator, summer cycle.
    RecuperatorSummer,
    /// `06011`: recuperator, winter cycle.
    RecuperatorWinter,
    /// `06021`: inflow.
    Inflow,
    /// `06022`: inflow at full speed.
    InflowMax,
    /// `06031`: outflow.
    Outflow,
    /// `06032`: outflow at full speed.
    OutflowMax,
    /// `06041`: night profile.
    Night,
    /// `06501`: fixed speed 1.
    Speed1,
    /// `06502`: fixed speed 2.
    Speed2,
    /// `06503`: fixed speed 3.
    Speed3,
    /// `06504`: fixed speed 4.
    Speed4,
    /// `06505`: fixed speed 5.
    Speed5,
    /// `06506`: fixed speed 6.
    Speed6,
    /// `06507`: fixed speed 7.
    Speed7,
}

impl Mode {
    /// Every known mode code.
    pub const ALL: [Self; 16] = [
        Self::Off,
        Self::On,
        Self::RecuperatorSummer,
        Self::RecuperatorWinter,
        Self::Inflow,
        Self::InflowMax,
        Self::Outflow,
        Self::OutflowMax,
        Self::Night,
        Self::Speed1,
        Self::Speed2,
        Self::Speed3,
        Self::Speed4,
        Self::Speed5,
        Self::Speed6,
        Self::Speed7,
    ];

    /// Parses a raw payload. Never fails; unrecognized input yields `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw)
            .unwrap_or(Self::Unknown)
    }

    /// Returns the five-digit code. `Unknown` maps to an empty string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Off => "06000",
            Self::On => "06001",
            Self::RecuperatorSummer => "06010",
            Self::RecuperatorWinter => "06011",
            Self::Inflow => "06021",
            Self::InflowMax => "06022",
            Self::Outflow => "06031",
            Self::OutflowMax => "06032",
            Self::Night => "06041",
            Self::Speed1 => "06501",
            Self::Speed2 => "06502",
            Self::Speed3 => "06503",
            Self::Speed4 => "06504",
            Self::Speed5 => "06505",
            Self::Speed6 => "06506",
            Self::Speed7 => "06507",
        }
    }

    /// Returns `true` for the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the expansion table row for this code.
    ///
    /// Returns `None` for `Unknown`.
    #[must_use]
    pub const fn rule(&self) -> Option<ModeRule> {
        use Policy::{Keep, Set};

        let rule = match self {
            Self::Unknown => return None,
            Self::Off => ModeRule::new(Set(PowerState::Off), Set(FanSpeed::OFF), Keep),
            Self::On => ModeRule::new(Set(PowerState::On), Keep, Keep),
            Self::RecuperatorSummer => ModeRule::work(WorkProfile::Recuperator),
            Self::RecuperatorWinter => ModeRule::work(WorkProfile::Winter),
            Self::Inflow => ModeRule::work(WorkProfile::Inflow),
            Self::InflowMax => ModeRule::full_speed(WorkProfile::InflowMax),
            Self::Outflow => ModeRule::work(WorkProfile::Outflow),
            Self::OutflowMax => ModeRule::full_speed(WorkProfile::OutflowMax),
            Self::Night => ModeRule::work(WorkProfile::Night),
            Self::Speed1 => ModeRule::speed(1),
            Self::Speed2 => ModeRule::speed(2),
            Self::Speed3 => ModeRule::speed(3),
            Self::Speed4 => ModeRule::speed(4),
            Self::Speed5 => ModeRule::speed(5),
            Self::Speed6 => ModeRule::speed(6),
            Self::Speed7 => ModeRule::speed(7),
        };
        Some(rule)
    }

    /// Decodes this code into (state, speed, work) against the current status.
    ///
    /// Returns `None` if the code is not recognized; the caller must then
    /// leave the status untouched.
    #[must_use]
    pub fn expand(&self, status: &DeviceStatus) -> Option<ModeExpansion> {
        self.rule().map(|rule| ModeExpansion {
            state: rule.state.resolve(status.state),
            speed: rule.speed.resolve(status.speed),
            work: rule.work.resolve(status.work),
        })
    }
}

wire_string!(Mode);
