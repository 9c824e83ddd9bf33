// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pub/sub transport to the appliance.
//!
//! The bridge talks to the appliance over a topic-based message bus. The
//! [`Transport`] trait is the outbound half: it publishes one payload on one
//! [`Topic`]. Inbound deliveries are pushed into the ingestion pipeline by
//! the transport implementation itself.
//!
//! # Implementations
//!
//! - [`MqttTransport`]: MQTT broker connection (feature `mqtt`)
//! - [`RecordingTransport`]: in-memory transport that records publishes

#[cfg(feature = "mqtt")]
mod mqtt;
mod recording;
mod topic;

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttTransport, MqttTransportBuilder, MqttTransportConfig};
pub use recording::{Published, RecordingTransport};
pub use topic::Topic;

use std::future::Future;

use crate::error::ProtocolError;

/// Outbound side of the message bus.
///
/// Publishes are fire-and-forget towards the appliance: a successful return
/// means the message was handed to a live connection, not that the appliance
/// acted on it. Implementations must fail instead of buffering while they
/// know the connection is down, so callers learn that nothing was sent.
pub trait Transport: Send + Sync {
    /// Publishes `payload` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message could not be handed over, or
    /// [`ProtocolError::ConnectionFailed`] while disconnected.
    fn publish(
        &self,
        topic: Topic,
        payload: &str,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}
