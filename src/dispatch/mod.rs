// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control intents towards the appliance.
//!
//! The [`Dispatcher`] turns a control intent into a [`Command`], publishes it
//! through a [`Transport`], and records the intended state in the status
//! store right away instead of waiting for the appliance to echo it back.
//!
//! The dispatcher keeps the invariant that a stopped fan is never reported
//! as running: switching off also zeroes the speed, and setting a speed
//! derives the on/off state from it.
//!
//! # Examples
//!
//! ```
//! use vakio_bridge::dispatch::Dispatcher;
//! use vakio_bridge::protocol::{RecordingTransport, Topic};
//! use vakio_bridge::state::StatusStore;
//! use vakio_bridge::types::{FanSpeed, PowerState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> vakio_bridge::Result<()> {
//! let store = StatusStore::new();
//! let transport = RecordingTransport::new();
//! let dispatcher = Dispatcher::new(transport.clone(), store.clone());
//!
//! dispatcher.set_speed(4).await?;
//!
//! let status = store.snapshot();
//! assert_eq!(status.speed, FanSpeed::new(4));
//! assert_eq!(status.state, PowerState::On);
//! assert_eq!(transport.published()[0].topic, Topic::Speed);
//! # Ok(())
//! # }
//! ```

mod command;

pub use command::Command;

use crate::error::{Error, ValueError};
use crate::protocol::Transport;
use crate::state::StatusStore;
use crate::types::{FanSpeed, PowerState, SystemCommand, WorkProfile};

/// Translates control intents into transport publishes.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
    store: StatusStore,
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a dispatcher publishing through `transport` and mirroring
    /// intents into `store`.
    #[must_use]
    pub fn new(transport: T, store: StatusStore) -> Self {
        Self { transport, store }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Switches the unit on or off. Switching off also zeroes the speed.
    ///
    /// # Errors
    ///
    /// Returns error if the publish fails.
    pub async fn turn_on_off(&self, on: bool) -> Result<(), Error> {
        let state = PowerState::from(on);
        self.store.update(|status| {
            status.state = state;
            if !on {
                status.speed = FanSpeed::OFF;
            }
        });
        self.send(Command::Power(state)).await
    }

    /// Sets the fan speed. A non-zero speed switches the unit on, zero
    /// switches it off.
    ///
    /// # Errors
    ///
    /// Returns error if the publish fails.
    pub async fn set_speed(&self, speed: u8) -> Result<(), Error> {
        self.store.update(|status| {
            status.speed = FanSpeed::from(speed);
            status.state = PowerState::from(speed > 0);
        });
        self.send(Command::Speed(speed)).await
    }

    /// Selects a work profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidWorkProfile`] if `raw` is not a known
    /// profile; nothing is published or recorded in that case. Returns
    /// error if the publish fails.
    pub async fn set_work_profile(&self, raw: &str) -> Result<(), Error> {
        let work = WorkProfile::parse(raw);
        if work.is_unknown() {
            return Err(ValueError::InvalidWorkProfile(raw.to_string()).into());
        }
        self.store.update(|status| status.work = work);
        self.send(Command::Work(work)).await
    }

    /// Asks the appliance to reboot. The status is left as is.
    ///
    /// # Errors
    ///
    /// Returns error if the publish fails.
    pub async fn reboot(&self) -> Result<(), Error> {
        self.send(Command::System(SystemCommand::Reboot)).await
    }

    /// Publishes a command.
    ///
    /// # Errors
    ///
    /// Returns error if the publish fails.
    pub async fn send(&self, command: Command) -> Result<(), Error> {
        let topic = command.topic();
        let payload = command.payload();
        if let Err(e) = self.transport.publish(topic, &payload).await {
            tracing::warn!(topic = %topic, payload = %payload, error = %e, "Command publish failed");
            return Err(e.into());
        }
        tracing::info!(topic = %topic, payload = %payload, "Command sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::{Published, RecordingTransport, Topic};

    fn dispatcher() -> (Dispatcher<RecordingTransport>, RecordingTransport, StatusStore) {
        let transport = RecordingTransport::new();
        let store = StatusStore::new();
        (
            Dispatcher::new(transport.clone(), store.clone()),
            transport,
            store,
        )
    }

    fn published(topic: Topic, payload: &str) -> Published {
        Published {
            topic,
            payload: payload.to_string(),
        }
    }

    #[tokio::test]
    async fn turn_off_zeroes_speed() {
        let (dispatcher, transport, store) = dispatcher();
        dispatcher.set_speed(5).await.unwrap();
        dispatcher.turn_on_off(false).await.unwrap();

        let status = store.snapshot();
        assert_eq!(status.state, PowerState::Off);
        assert_eq!(status.speed, FanSpeed::OFF);
        assert_eq!(transport.published()[1], published(Topic::State, "off"));
    }

    #[tokio::test]
    async fn turn_on_keeps_speed() {
        let (dispatcher, transport, store) = dispatcher();
        store.update(|status| status.speed = FanSpeed::new(3));
        dispatcher.turn_on_off(true).await.unwrap();

        let status = store.snapshot();
        assert_eq!(status.state, PowerState::On);
        assert_eq!(status.speed, FanSpeed::new(3));
        assert_eq!(transport.published(), vec![published(Topic::State, "on")]);
    }

    #[tokio::test]
    async fn set_speed_derives_state() {
        let (dispatcher, transport, store) = dispatcher();

        dispatcher.set_speed(0).await.unwrap();
        assert_eq!(store.snapshot().state, PowerState::Off);

        dispatcher.set_speed(2).await.unwrap();
        let status = store.snapshot();
        assert_eq!(status.state, PowerState::On);
        assert_eq!(status.speed, FanSpeed::new(2));

        assert_eq!(
            transport.published(),
            vec![published(Topic::Speed, "0"), published(Topic::Speed, "2")]
        );
    }

    #[tokio::test]
    async fn set_work_profile_publishes_canonical_name() {
        let (dispatcher, transport, store) = dispatcher();
        dispatcher.set_work_profile(" Inflow_Max ").await.unwrap();

        assert_eq!(store.snapshot().work, WorkProfile::InflowMax);
        assert_eq!(
            transport.published(),
            vec![published(Topic::WorkMode, "inflow_max")]
        );
    }

    #[tokio::test]
    async fn unknown_work_profile_is_rejected_untouched() {
        let (dispatcher, transport, store) = dispatcher();
        let before = store.snapshot();

        let err = dispatcher.set_work_profile("bogus").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidWorkProfile(ref raw)) if raw == "bogus"
        ));
        assert!(transport.published().is_empty());
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn reboot_leaves_status_alone() {
        let (dispatcher, transport, store) = dispatcher();
        let before = store.snapshot();

        dispatcher.reboot().await.unwrap();
        assert_eq!(transport.published(), vec![published(Topic::System, "0689")]);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn publish_failure_is_surfaced() {
        let (dispatcher, transport, _store) = dispatcher();
        transport.set_failing(true);

        let err = dispatcher.reboot().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ConnectionFailed(_))
        ));
    }
}
