// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialized ingestion of inbound updates.
//!
//! The transport and the availability monitor both produce
//! [`IngestEvent`]s. They are queued on one bounded channel and drained by a
//! single [`Ingestor`], so updates are applied strictly in arrival order and
//! never interleave. A full queue makes producers wait instead of dropping
//! events.
//!
//! # Examples
//!
//! ```
//! use vakio_bridge::notify::ChangeNotifier;
//! use vakio_bridge::pipeline::{IngestEvent, Ingestor};
//! use vakio_bridge::protocol::Topic;
//! use vakio_bridge::state::StatusStore;
//! use vakio_bridge::types::PowerState;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = StatusStore::new();
//! let (sender, mut ingestor) = Ingestor::channel(store.clone(), ChangeNotifier::default(), 16);
//!
//! sender.send(IngestEvent::field(Topic::State, "on")).await.unwrap();
//! let event = ingestor.recv().await.unwrap();
//! ingestor.process(event);
//!
//! assert_eq!(store.snapshot().state, PowerState::On);
//! # }
//! ```

mod event;
mod ingestor;

pub use event::IngestEvent;
pub use ingestor::{DEFAULT_QUEUE_CAPACITY, IngestSender, Ingestor};
