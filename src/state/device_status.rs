// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device status record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::protocol::Topic;
use crate::types::{FanSpeed, Mode, PowerState, SystemCommand, WorkProfile};

use super::Fingerprint;

/// Everything the bridge knows about the appliance.
///
/// A fresh record is unavailable, stopped, and has every enumeration set to
/// `Unknown`. It serializes to the JSON object served on `/condition`:
///
/// ```json
/// {"last_activity_at":"0001-01-01T00:00:00Z","available":false,"speed":0,"state":"","work":"","mode":"","command":""}
/// ```
///
/// An unset `last_activity_at` is written as the zero instant, never `null`,
/// since clients parse it unconditionally.
///
/// `mode` and `command` are informational. Only `available`, `speed`,
/// `state`, and `work` take part in the [`Fingerprint`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Time of the last accepted inbound field update.
    #[serde(with = "activity_time")]
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Whether the appliance answered the last reachability probe.
    pub available: bool,
    /// Fan speed.
    pub speed: FanSpeed,
    /// On/off state.
    pub state: PowerState,
    /// Work profile.
    pub work: WorkProfile,
    /// Last composite mode code reported.
    pub mode: Mode,
    /// Last system command seen.
    pub command: SystemCommand,
}

impl DeviceStatus {
    /// Creates the initial record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one inbound payload received on `topic` into the record.
    ///
    /// The payload is decoded first and the record is only touched once
    /// decoding succeeded, so a rejected payload leaves every field as it
    /// was. An accepted payload refreshes `last_activity_at`.
    ///
    /// A speed report also sets `state`: `0` means off, anything else on.
    /// A state report never changes `speed`.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] variant matching `topic` when the payload
    /// is not a value the appliance publishes.
    pub fn apply_inbound(&mut self, topic: Topic, raw: &str) -> Result<(), ParseError> {
        match topic {
            Topic::System => {
                let command = SystemCommand::parse(raw);
                if command.is_unknown() {
                    return Err(ParseError::UnknownCommand(raw.to_string()));
                }
                self.command = command;
            }
            Topic::State => {
                let state = PowerState::parse(raw);
                if state.is_unknown() {
                    return Err(ParseError::UnknownState(raw.to_string()));
                }
                self.state = state;
            }
            Topic::Speed => {
                let speed = FanSpeed::parse(raw)
                    .ok_or_else(|| ParseError::InvalidSpeed(raw.to_string()))?;
                self.speed = speed;
                self.state = PowerState::from(speed.is_running());
            }
            Topic::WorkMode => {
                let work = WorkProfile::parse(raw);
                if work.is_unknown() {
                    return Err(ParseError::UnknownWorkProfile(raw.to_string()));
                }
                self.work = work;
            }
            Topic::Mode => {
                let mode = Mode::parse(raw);
                let expansion = mode
                    .expand(self)
                    .ok_or_else(|| ParseError::UnknownMode(raw.to_string()))?;
                self.mode = mode;
                self.state = expansion.state;
                self.speed = expansion.speed;
                self.work = expansion.work;
            }
        }
        self.last_activity_at = Some(Utc::now());
        Ok(())
    }

    /// Records the outcome of a reachability probe.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Returns the fingerprint of the observable fields.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

/// Wire form of `last_activity_at`: `None` is the zero instant.
mod activity_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) const ZERO: &str = "0001-01-01T00:00:00Z";

    /// Unix timestamp of `0001-01-01T00:00:00Z`.
    const ZERO_TIMESTAMP: i64 = -62_135_596_800;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => at.serialize(serializer),
            None => serializer.serialize_str(ZERO),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let at = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(at.filter(|at| at.timestamp() != ZERO_TIMESTAMP))
    }
}
