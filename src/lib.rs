// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vakio Bridge - MQTT bridge for Vakio ventilation units.
//!
//! The appliance reports its state as one field per MQTT topic under
//! `vakio/`. This crate folds those fields into a single [`DeviceStatus`],
//! keeps it current with a reachability monitor, and translates high-level
//! control intents back into topic publishes.
//!
//! # Components
//!
//! - [`pipeline`]: bounded queue and the single consumer that owns writes
//! - [`state`]: the canonical status record and its shared store
//! - [`notify`]: change detection and downstream hooks
//! - [`monitor`]: periodic ICMP reachability probing
//! - [`dispatch`]: control intents to topic publishes
//! - [`protocol`]: the transport seam and the MQTT implementation
//! - [`web`]: HTTP control surface (feature `http`)
//!
//! # Quick Start
//!
//! ```no_run
//! use vakio_bridge::{Config, Service};
//!
//! #[tokio::main]
//! async fn main() -> vakio_bridge::Result<()> {
//!     let config = Config::from_env()?;
//!     let service = Service::start(config).await?;
//!
//!     service.hooks().on_change(|status| {
//!         println!("speed is now {}", status.speed);
//!     });
//!
//!     service
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await
//! }
//! ```
//!
//! # Without a broker
//!
//! The pipeline and dispatcher work against any [`Transport`], which makes
//! them usable with the in-memory [`RecordingTransport`]:
//!
//! ```
//! use vakio_bridge::{Dispatcher, RecordingTransport, StatusStore, Topic};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> vakio_bridge::Result<()> {
//! let transport = RecordingTransport::new();
//! let dispatcher = Dispatcher::new(transport.clone(), StatusStore::new());
//!
//! dispatcher.set_speed(4).await?;
//!
//! let published = transport.published();
//! assert_eq!(published[0].topic, Topic::Speed);
//! assert_eq!(published[0].payload, "4");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod pipeline;
pub mod protocol;
#[cfg(feature = "mqtt")]
pub mod service;
pub mod shutdown;
pub mod state;
pub mod types;
#[cfg(feature = "http")]
pub mod web;

pub use config::Config;
pub use dispatch::{Command, Dispatcher};
pub use error::{Error, ParseError, ProbeError, ProtocolError, Result, ValueError};
pub use monitor::{AvailabilityMonitor, IcmpProber, MonitorConfig, Prober};
pub use notify::{ChangeNotifier, HookId, HookRegistry};
pub use pipeline::{IngestEvent, IngestSender, Ingestor};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttTransport, MqttTransportBuilder};
pub use protocol::{Published, RecordingTransport, Topic, Transport};
#[cfg(feature = "mqtt")]
pub use service::Service;
pub use state::{DeviceStatus, Fingerprint, StatusStore};
pub use types::{FanSpeed, Mode, PowerState, SystemCommand, WorkProfile};
