// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::ProtocolError;

use super::{Topic, Transport};

/// A message handed to a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Destination topic.
    pub topic: Topic,
    /// Payload.
    pub payload: String,
}

/// Transport that keeps every publish in memory instead of sending it.
///
/// Useful for running the bridge without a broker and for asserting what
/// would have been sent. It can be switched into a failing mode to exercise
/// error paths.
///
/// # Examples
///
/// ```
/// use vakio_bridge::protocol::{RecordingTransport, Topic, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = RecordingTransport::new();
/// transport.publish(Topic::Speed, "4").await.unwrap();
///
/// let published = transport.published();
/// assert_eq!(published[0].topic, Topic::Speed);
/// assert_eq!(published[0].payload, "4");
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    published: Arc<Mutex<Vec<Published>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<Published> {
        self.published.lock().clone()
    }

    /// Makes subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Forgets recorded messages.
    pub fn clear(&self) {
        self.published.lock().clear();
    }
}

impl Transport for RecordingTransport {
    async fn publish(&self, topic: Topic, payload: &str) -> Result<(), ProtocolError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(ProtocolError::ConnectionFailed(
                "transport is offline".to_string(),
            ));
        }
        tracing::debug!(topic = %topic, payload = %payload, "Recorded publish");
        self.published.lock().push(Published {
            topic,
            payload: payload.to_string(),
        });
        Ok(())
    }
}
