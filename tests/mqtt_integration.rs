// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::time::sleep;
use vakio_bridge::notify::{ChangeNotifier, HookRegistry};
use vakio_bridge::pipeline::{DEFAULT_QUEUE_CAPACITY, IngestEvent, IngestSender, Ingestor};
use vakio_bridge::shutdown::{self, Shutdown, ShutdownTrigger};
use vakio_bridge::{MqttTransport, ProtocolError, StatusStore, Topic, Transport};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind and accept connections
    sleep(Duration::from_millis(500)).await;
}

/// Connects a second client that plays the appliance.
async fn start_appliance(port: u16) -> rumqttc::AsyncClient {
    use std::sync::atomic::{AtomicU16, Ordering};
    static APPLIANCE_COUNTER: AtomicU16 = AtomicU16::new(0);

    let id = APPLIANCE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let options = rumqttc::MqttOptions::new(format!("appliance_{id}"), "127.0.0.1", port);
    let (client, mut event_loop) = rumqttc::AsyncClient::new(options, 10);
    tokio::spawn(async move { while event_loop.poll().await.is_ok() {} });

    // Let the connection and the transport's subscriptions settle
    sleep(Duration::from_millis(300)).await;
    client
}

/// Waits for the next event forwarded by the transport.
async fn next_event(ingestor: &mut Ingestor) -> IngestEvent {
    tokio::time::timeout(Duration::from_secs(3), ingestor.recv())
        .await
        .expect("no event forwarded")
        .expect("queue closed")
}

/// Ingestion plumbing the transport needs; the consumer is not spawned.
fn plumbing() -> (IngestSender, Ingestor, ShutdownTrigger, Shutdown) {
    let (sender, ingestor) = Ingestor::channel(
        StatusStore::new(),
        ChangeNotifier::new(HookRegistry::new()),
        DEFAULT_QUEUE_CAPACITY,
    );
    let (trigger, shutdown) = shutdown::channel();
    (sender, ingestor, trigger, shutdown)
}

// ============================================================================
// Connection
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder()
            .broker(format!("mqtt://127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await;

        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
        let (transport, _events) = result.unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.host(), "127.0.0.1");
        assert_eq!(transport.port(), port);
    }

    #[tokio::test]
    async fn connect_with_tcp_scheme() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder()
            .broker(format!("tcp://127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn connect_without_scheme() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unreachable_broker_times_out() {
        let port = get_test_port();
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .connection_timeout(Duration::from_millis(300))
            .build(sender, shutdown)
            .await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn missing_broker_fails() {
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder().build(sender, shutdown).await;

        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn invalid_port_fails() {
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let result = MqttTransport::builder()
            .broker("mqtt://127.0.0.1:notaport")
            .build(sender, shutdown)
            .await;

        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn event_loop_stops_on_shutdown() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, trigger, shutdown) = plumbing();

        let (transport, events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();

        transport.disconnect().await.unwrap();
        trigger.trigger();

        tokio::time::timeout(Duration::from_secs(5), events)
            .await
            .expect("event loop did not stop")
            .unwrap();
        assert!(!transport.is_connected());
    }
}

// ============================================================================
// Publishing
// ============================================================================

mod publishing {
    use super::*;

    #[tokio::test]
    async fn publish_writable_topics() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let (transport, _events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();

        assert!(transport.publish(Topic::State, "on").await.is_ok());
        assert!(transport.publish(Topic::Speed, "3").await.is_ok());
        assert!(transport.publish(Topic::WorkMode, "inflow").await.is_ok());
        assert!(transport.publish(Topic::System, "0689").await.is_ok());
    }

    #[tokio::test]
    async fn mode_topic_is_read_only() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, _trigger, shutdown) = plumbing();

        let (transport, _events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();

        let result = transport.publish(Topic::Mode, "06503").await;

        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn publish_fails_once_disconnected() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, _ingestor, trigger, shutdown) = plumbing();

        let (transport, events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();

        transport.disconnect().await.unwrap();
        trigger.trigger();
        events.await.unwrap();

        let result = transport.publish(Topic::Speed, "3").await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }
}

// ============================================================================
// Inbound delivery
// ============================================================================

mod inbound {
    use rumqttc::QoS;

    use super::*;

    #[tokio::test]
    async fn appliance_message_reaches_pipeline() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, mut ingestor, _trigger, shutdown) = plumbing();

        let (_transport, _events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();
        let appliance = start_appliance(port).await;

        appliance
            .publish("vakio/speed", QoS::AtMostOnce, false, "3")
            .await
            .unwrap();

        assert_eq!(
            next_event(&mut ingestor).await,
            IngestEvent::field(Topic::Speed, "3")
        );
    }

    #[tokio::test]
    async fn foreign_topics_and_binary_payloads_are_not_forwarded() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let (sender, mut ingestor, _trigger, shutdown) = plumbing();

        let (_transport, _events) = MqttTransport::builder()
            .broker(format!("127.0.0.1:{port}"))
            .build(sender, shutdown)
            .await
            .unwrap();
        let appliance = start_appliance(port).await;

        appliance
            .publish("other/speed", QoS::AtMostOnce, false, "5")
            .await
            .unwrap();
        appliance
            .publish("vakio/speed", QoS::AtMostOnce, false, vec![0xff, 0xfe])
            .await
            .unwrap();
        appliance
            .publish("vakio/workmode", QoS::AtMostOnce, false, "night")
            .await
            .unwrap();

        // Only the last message is an appliance field with a text payload
        assert_eq!(
            next_event(&mut ingestor).await,
            IngestEvent::field(Topic::WorkMode, "night")
        );
        let extra = tokio::time::timeout(Duration::from_millis(300), ingestor.recv()).await;
        assert!(extra.is_err(), "unexpected event: {extra:?}");
    }
}
