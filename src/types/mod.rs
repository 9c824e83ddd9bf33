// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Code tables for the appliance wire protocol.
//!
//! Each type here is a closed enumeration of the values the appliance
//! publishes, with an explicit `Unknown` variant. Parsing is total: it trims
//! and lowercases the raw payload and falls back to `Unknown` instead of
//! failing, so callers decide whether an unknown value is an error.
//!
//! # Types
//!
//! - [`PowerState`] - On/off state (`on`, `off`)
//! - [`FanSpeed`] - Fan speed `0..=7` plus the [`FanSpeed::MAX`] sentinel
//! - [`WorkProfile`] - Named operating profile (`inflow`, `night`, ...)
//! - [`Mode`] - Five-digit composite mode code (`06022`, ...) and its expansion
//! - [`SystemCommand`] - Four-digit system command (`0689`, ...)
//!
//! # Examples
//!
//! ```
//! use vakio_bridge::types::{Mode, PowerState, WorkProfile};
//!
//! assert_eq!(PowerState::parse(" ON "), PowerState::On);
//! assert_eq!(WorkProfile::parse("inflow_max"), WorkProfile::InflowMax);
//! assert_eq!(Mode::parse("42"), Mode::Unknown);
//! ```

/// Implements `Display` and serde support for a wire enumeration.
///
/// The type must provide `as_str(&self) -> &'static str` and a total
/// `parse(&str) -> Self`. When `as_str` yields a name that `parse` does not
/// accept, pass the inverse of `as_str` as the second argument.
macro_rules! wire_string {
    ($ty:ty) => {
        wire_string!($ty, <$ty>::parse);
    };
    ($ty:ty, $from_wire:expr) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(($from_wire)(&raw))
            }
        }
    };
}

mod command;
mod mode;
mod power;
mod speed;
mod work;

pub use command::SystemCommand;
pub use mode::{Mode, ModeExpansion, ModeRule, Policy};
pub use power::PowerState;
pub use speed::FanSpeed;
pub use work::WorkProfile;

/// Normalizes a raw payload the way every code table expects it.
fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
