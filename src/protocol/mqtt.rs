// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport.
//!
//! One broker connection serves both directions. The background event loop
//! subscribes to every appliance topic each time the broker acknowledges a
//! connection, so subscriptions survive reconnects, and forwards incoming
//! publishes to the ingestion pipeline. Outbound commands are published with
//! QoS 0 and without the retain flag, and are refused while the broker
//! connection is down rather than queued for a later reconnect.
//!
//! # Examples
//!
//! ```no_run
//! use vakio_bridge::notify::ChangeNotifier;
//! use vakio_bridge::pipeline::Ingestor;
//! use vakio_bridge::protocol::{MqttTransport, Topic, Transport};
//! use vakio_bridge::state::StatusStore;
//!
//! # async fn example() -> vakio_bridge::Result<()> {
//! let (sender, _ingestor) = Ingestor::channel(StatusStore::new(), ChangeNotifier::default(), 1000);
//! let (_trigger, shutdown) = vakio_bridge::shutdown::channel();
//!
//! let (transport, _events) = MqttTransport::builder()
//!     .broker("tcp://192.168.1.10:1883")
//!     .credentials("user", "password")
//!     .build(sender, shutdown)
//!     .await?;
//!
//! transport.publish(Topic::Speed, "3").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, SubscribeFilter};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{ParseError, ProtocolError};
use crate::pipeline::{IngestEvent, IngestSender};
use crate::shutdown::Shutdown;

use super::{Topic, Transport};

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Pause before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Default MQTT port.
const DEFAULT_PORT: u16 = 1883;

/// Connection settings of an [`MqttTransport`].
#[derive(Debug, Clone)]
pub struct MqttTransportConfig {
    broker: String,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connection_timeout: Duration,
}

impl Default for MqttTransportConfig {
    fn default() -> Self {
        Self {
            broker: String::new(),
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

/// MQTT connection to the broker the appliance is attached to.
///
/// Cheaply cloneable; every clone publishes through the same connection.
#[derive(Clone)]
pub struct MqttTransport {
    inner: Arc<MqttTransportInner>,
}

struct MqttTransportInner {
    client: AsyncClient,
    host: String,
    port: u16,
    connected: AtomicBool,
}

impl MqttTransport {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> MqttTransportBuilder {
        MqttTransportBuilder::default()
    }

    /// Returns whether the broker connection is currently up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Sends a clean disconnect to the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.host,
            port = %self.inner.port,
            "Disconnecting from MQTT broker"
        );
        self.inner.client.disconnect().await?;
        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }

    /// Subscribes to every appliance topic.
    ///
    /// Runs inside the event loop, so it must not wait on the request queue.
    fn subscribe_all(&self) {
        let filters = Topic::ALL
            .into_iter()
            .map(|topic| SubscribeFilter::new(topic.as_str().to_string(), QoS::AtMostOnce));
        match self.inner.client.try_subscribe_many(filters) {
            Ok(()) => tracing::debug!("Subscribed to appliance topics"),
            Err(e) => tracing::error!(error = %e, "Failed to subscribe to appliance topics"),
        }
    }
}

impl Transport for MqttTransport {
    async fn publish(&self, topic: Topic, payload: &str) -> Result<(), ProtocolError> {
        if !topic.is_writable() {
            return Err(ProtocolError::InvalidAddress(format!(
                "topic {topic} is read-only"
            )));
        }

        if !self.is_connected() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "not connected to {}:{}",
                self.inner.host, self.inner.port
            )));
        }

        tracing::debug!(topic = %topic, payload = %payload, "Publishing MQTT command");
        self.inner
            .client
            .publish(topic.as_str(), QoS::AtMostOnce, false, payload.to_string())
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

impl std::fmt::Debug for MqttTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttTransport")
            .field("host", &self.inner.host)
            .field("port", &self.inner.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for an [`MqttTransport`].
#[derive(Debug, Default)]
pub struct MqttTransportBuilder {
    config: MqttTransportConfig,
}

impl MqttTransportBuilder {
    /// Sets the broker URL (`tcp://host:port`, `mqtt://host:port`, or
    /// `host[:port]`; the port defaults to 1883).
    #[must_use]
    pub fn broker(mut self, url: impl Into<String>) -> Self {
        self.config.broker = url.into();
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets how long to wait for the first connection (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Connects to the broker and starts the event loop.
    ///
    /// Incoming appliance messages are pushed into `sender`. The event loop
    /// runs until `shutdown` fires or the ingestion queue closes; its handle
    /// is returned alongside the transport.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The broker URL is missing or malformed
    /// - The broker does not acknowledge the connection in time
    pub async fn build(
        self,
        sender: IngestSender,
        shutdown: Shutdown,
    ) -> Result<(MqttTransport, JoinHandle<()>), ProtocolError> {
        let (host, port) = parse_mqtt_url(&self.config.broker)?;

        let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let client_id = format!("vakio_{}_{}", std::process::id(), counter);

        let mut mqtt_options = MqttOptions::new(&client_id, &host, port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let transport = MqttTransport {
            inner: Arc::new(MqttTransportInner {
                client,
                host,
                port,
                connected: AtomicBool::new(false),
            }),
        };

        let (connack_tx, connack_rx) = oneshot::channel();
        let handle = tokio::spawn(handle_events(
            event_loop,
            transport.clone(),
            sender,
            shutdown,
            Some(connack_tx),
        ));

        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(
                    host = %transport.inner.host,
                    port = %transport.inner.port,
                    client_id = %client_id,
                    "Connected to MQTT broker"
                );
                Ok((transport, handle))
            }
            Ok(Err(_)) => {
                handle.abort();
                Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ))
            }
            Err(_) => {
                handle.abort();
                Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )))
            }
        }
    }
}

/// Splits a broker URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), DEFAULT_PORT)
    };

    if host.is_empty() {
        return Err(ProtocolError::InvalidAddress(
            "MQTT broker host is required".to_string(),
        ));
    }

    Ok((host, port))
}

/// Drives the MQTT connection and forwards appliance messages.
async fn handle_events(
    mut event_loop: EventLoop,
    transport: MqttTransport,
    sender: IngestSender,
    mut shutdown: Shutdown,
    mut connack_tx: Option<oneshot::Sender<()>>,
) {
    use rumqttc::{Event, Packet};

    loop {
        let event = tokio::select! {
            () = shutdown.wait() => break,
            event = event_loop.poll() => event,
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                transport.inner.connected.store(true, Ordering::Release);
                transport.subscribe_all();
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Ok(payload) = String::from_utf8(publish.payload.to_vec()) else {
                    tracing::warn!(topic = %publish.topic, "Ignoring non UTF-8 payload");
                    continue;
                };
                let Some(topic) = Topic::from_topic(&publish.topic) else {
                    let err = ParseError::UnknownTopic {
                        topic: publish.topic.clone(),
                        payload,
                    };
                    tracing::debug!(error = %err, "Ignoring MQTT message");
                    continue;
                };

                tracing::debug!(topic = %topic, payload = %payload, "MQTT message received");
                if sender.send(IngestEvent::field(topic, payload)).await.is_err() {
                    tracing::debug!("Ingestion queue closed, stopping MQTT event loop");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                transport.inner.connected.store(false, Ordering::Release);
            }
            Ok(_) => {}
            Err(e) => {
                if transport.is_connected() {
                    tracing::warn!(error = %e, "MQTT connection lost, reconnecting");
                } else {
                    tracing::debug!(error = %e, "MQTT connection attempt failed");
                }
                transport.inner.connected.store(false, Ordering::Release);
                tokio::select! {
                    () = shutdown.wait() => break,
                    () = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
            }
        }
    }

    transport.inner.connected.store(false, Ordering::Release);
    tracing::debug!("MQTT event loop stopped");
}
