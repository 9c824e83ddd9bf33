// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! The hierarchy mirrors the failure domains of the bridge: value validation
//! for control intents, transport communication, inbound payload parsing, and
//! reachability probing.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A control intent carried an invalid value.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Publishing to or receiving from the transport failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An inbound payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A reachability probe could not be performed.
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// The service configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O operation failed (listener bind, socket setup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when validating control intents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The requested work profile is not one the appliance knows.
    #[error("invalid work profile: {0:?}")]
    InvalidWorkProfile(String),
}

/// Errors related to the pub/sub transport and the ingestion queue.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The ingestion queue has no free slot.
    #[error("ingestion queue is full")]
    QueueFull,

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors raised when an inbound field update cannot be decoded.
///
/// Each variant names the raw payload that was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The on/off payload is not a known power state.
    #[error("unknown power state: {0:?}")]
    UnknownState(String),

    /// The fan speed payload is not an unsigned decimal number.
    #[error("invalid fan speed: {0:?}")]
    InvalidSpeed(String),

    /// The work profile payload is not a known profile.
    #[error("unknown work profile: {0:?}")]
    UnknownWorkProfile(String),

    /// The mode payload is not a known mode code.
    #[error("unknown mode: {0:?}")]
    UnknownMode(String),

    /// The system command payload is not a known command.
    #[error("unknown system command: {0:?}")]
    UnknownCommand(String),

    /// The message arrived on a topic the bridge does not consume.
    #[error("unexpected topic {topic:?} (payload {payload:?})")]
    UnknownTopic {
        /// The topic the message was published to.
        topic: String,
        /// The raw payload.
        payload: String,
    },
}

/// Errors raised by reachability probes.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No device address is configured.
    #[error("device address is not configured")]
    NoAddress,

    /// The probe socket could not be opened.
    #[error("cannot open probe socket: {0}")]
    Socket(#[source] std::io::Error),

    /// The probe did not finish within its overall deadline.
    #[error("probe timed out after {0} ms")]
    Timeout(u64),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
