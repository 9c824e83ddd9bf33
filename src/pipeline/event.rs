// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events accepted by the ingestion pipeline.

use crate::protocol::Topic;

/// One unit of work for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    /// A raw payload received on an appliance topic.
    Field {
        /// Topic the payload arrived on.
        topic: Topic,
        /// Undecoded payload.
        payload: String,
    },
    /// Reachability verdict from the availability monitor.
    Availability(bool),
}

impl IngestEvent {
    /// Creates a field event.
    #[must_use]
    pub fn field(topic: Topic, payload: impl Into<String>) -> Self {
        Self::Field {
            topic,
            payload: payload.into(),
        }
    }
}
