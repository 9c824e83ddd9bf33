// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Queue and single consumer of the ingestion pipeline.

use tokio::sync::mpsc;

use crate::error::{Error, ParseError, ProtocolError};
use crate::notify::ChangeNotifier;
use crate::shutdown::Shutdown;
use crate::state::{DeviceStatus, StatusStore};

use super::IngestEvent;

/// Queue capacity used by the service.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Producer handle of the ingestion queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IngestSender {
    tx: mpsc::Sender<IngestEvent>,
}

impl IngestSender {
    /// Queues an event, waiting for a free slot if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ChannelClosed`] if the consumer has stopped.
    pub async fn send(&self, event: IngestEvent) -> Result<(), Error> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ProtocolError::ChannelClosed("ingestion queue".to_string()).into())
    }

    /// Queues an event without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::QueueFull`] if no slot is free, or
    /// [`ProtocolError::ChannelClosed`] if the consumer has stopped.
    pub fn try_send(&self, event: IngestEvent) -> Result<(), Error> {
        self.tx.try_send(event).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => ProtocolError::QueueFull.into(),
            mpsc::error::TrySendError::Closed(_) => {
                ProtocolError::ChannelClosed("ingestion queue".to_string()).into()
            }
        })
    }

    /// Returns `true` once the consumer has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single consumer applying queued events to the status store.
#[derive(Debug)]
pub struct Ingestor {
    rx: mpsc::Receiver<IngestEvent>,
    store: StatusStore,
    notifier: ChangeNotifier,
}

impl Ingestor {
    /// Creates the queue and its consumer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn channel(
        store: StatusStore,
        notifier: ChangeNotifier,
        capacity: usize,
    ) -> (IngestSender, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            IngestSender { tx },
            Self {
                rx,
                store,
                notifier,
            },
        )
    }

    /// Drains the queue until shutdown or until every sender is dropped.
    pub async fn run(mut self, mut shutdown: Shutdown) {
        tracing::debug!("Ingestion pipeline started");
        loop {
            tokio::select! {
                () = shutdown.wait() => break,
                event = self.rx.recv() => match event {
                    Some(event) => {
                        self.process(event);
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("Ingestion pipeline stopped");
    }

    /// Receives the next queued event.
    pub async fn recv(&mut self) -> Option<IngestEvent> {
        self.rx.recv().await
    }

    /// Applies one event and runs change detection.
    ///
    /// Decoding, mutation, and the post-update snapshot happen under a single
    /// write lock. Hooks run after the lock is released. A payload that does
    /// not decode is logged and dropped.
    ///
    /// Returns `true` if the notifier called its hooks.
    pub fn process(&mut self, event: IngestEvent) -> bool {
        let applied: Result<DeviceStatus, ParseError> = self.store.update(|status| {
            match &event {
                IngestEvent::Field { topic, payload } => {
                    status.apply_inbound(*topic, payload)?;
                }
                IngestEvent::Availability(available) => status.set_available(*available),
            }
            Ok(status.clone())
        });

        match applied {
            Ok(status) => {
                tracing::trace!(?event, "Applied inbound event");
                self.notifier.observe(&status)
            }
            Err(err) => {
                tracing::warn!(error = %err, ?event, "Dropping inbound update");
                false
            }
        }
    }

    /// Returns the change notifier.
    #[must_use]
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::notify::HookRegistry;
    use crate::protocol::Topic;
    use crate::shutdown;
    use crate::types::{FanSpeed, PowerState, WorkProfile};

    fn pipeline(capacity: usize) -> (IngestSender, Ingestor, StatusStore, Arc<AtomicUsize>) {
        let store = StatusStore::new();
        let hooks = HookRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        hooks.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (sender, ingestor) =
            Ingestor::channel(store.clone(), ChangeNotifier::new(hooks), capacity);
        (sender, ingestor, store, calls)
    }

    #[test]
    fn applies_field_events() {
        let (_sender, mut ingestor, store, _) = pipeline(4);

        assert!(ingestor.process(IngestEvent::field(Topic::Speed, "3")));
        let status = store.snapshot();
        assert_eq!(status.speed, FanSpeed::new(3));
        assert_eq!(status.state, PowerState::On);
    }

    #[test]
    fn repeated_update_notifies_once() {
        let (_sender, mut ingestor, _store, calls) = pipeline(4);

        assert!(ingestor.process(IngestEvent::field(Topic::WorkMode, "night")));
        assert!(!ingestor.process(IngestEvent::field(Topic::WorkMode, "night")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_payload_is_dropped() {
        let (_sender, mut ingestor, store, calls) = pipeline(4);
        ingestor.process(IngestEvent::field(Topic::Speed, "2"));
        let before = store.snapshot();

        assert!(!ingestor.process(IngestEvent::field(Topic::Speed, "fast")));
        assert_eq!(store.snapshot(), before);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn availability_events() {
        let (_sender, mut ingestor, store, calls) = pipeline(4);

        assert!(ingestor.process(IngestEvent::Availability(true)));
        assert!(store.snapshot().available);
        assert!(!ingestor.process(IngestEvent::Availability(true)));
        assert!(ingestor.process(IngestEvent::Availability(false)));
        assert!(!store.snapshot().available);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn try_send_reports_full_queue() {
        let (sender, _ingestor, _store, _) = pipeline(1);

        sender.try_send(IngestEvent::Availability(true)).unwrap();
        let err = sender
            .try_send(IngestEvent::Availability(false))
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::QueueFull)));
    }

    #[tokio::test]
    async fn send_fails_once_consumer_is_gone() {
        let (sender, ingestor, _store, _) = pipeline(4);
        drop(ingestor);

        assert!(sender.is_closed());
        let err = sender
            .send(IngestEvent::Availability(true))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ChannelClosed(_))
        ));
    }

    #[tokio::test]
    async fn run_drains_in_order() {
        let (sender, ingestor, store, _) = pipeline(8);
        let (trigger, shutdown) = shutdown::channel();
        let handle = tokio::spawn(ingestor.run(shutdown));

        sender.send(IngestEvent::field(Topic::Speed, "5")).await.unwrap();
        sender
            .send(IngestEvent::field(Topic::WorkMode, "winter"))
            .await
            .unwrap();
        sender.send(IngestEvent::field(Topic::Speed, "0")).await.unwrap();
        drop(sender);
        handle.await.unwrap();
        drop(trigger);

        let status = store.snapshot();
        assert_eq!(status.speed, FanSpeed::OFF);
        assert_eq!(status.state, PowerState::Off);
        assert_eq!(status.work, WorkProfile::Winter);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let (_sender, ingestor, _store, _) = pipeline(8);
        let (trigger, shutdown) = shutdown::channel();
        let handle = tokio::spawn(ingestor.run(shutdown));

        trigger.trigger();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn send_waits_for_capacity() {
        let (sender, mut ingestor, _store, _) = pipeline(1);
        sender.send(IngestEvent::Availability(true)).await.unwrap();

        let blocked = sender.clone();
        let pending = tokio::spawn(async move {
            blocked.send(IngestEvent::Availability(false)).await
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        let first = ingestor.recv().await.unwrap();
        assert_eq!(first, IngestEvent::Availability(true));
        pending.await.unwrap().unwrap();
        assert_eq!(
            ingestor.recv().await.unwrap(),
            IngestEvent::Availability(false)
        );
    }
}
