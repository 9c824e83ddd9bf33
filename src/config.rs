// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service configuration from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MQTT_URL` | Broker URL, e.g. `tcp://192.168.1.15:1883` | required |
//! | `MQTT_USERNAME` | Broker user name | none |
//! | `MQTT_PASSWORD` | Broker password | empty |
//! | `VAKIO_IP` | Appliance IP address, probed for availability | none |
//! | `WEB_SERVER` | HTTP listen address (`host:port` or `:port`) | `0.0.0.0:80` |
//!
//! Empty variables count as unset.

use std::net::{IpAddr, SocketAddr};

use crate::error::Error;
use crate::monitor::MonitorConfig;
use crate::pipeline::DEFAULT_QUEUE_CAPACITY;

const ENV_MQTT_URL: &str = "MQTT_URL";
const ENV_MQTT_USERNAME: &str = "MQTT_USERNAME";
const ENV_MQTT_PASSWORD: &str = "MQTT_PASSWORD";
const ENV_VAKIO_IP: &str = "VAKIO_IP";
const ENV_WEB_SERVER: &str = "WEB_SERVER";

const DEFAULT_WEB_SERVER: &str = "0.0.0.0:80";

/// Settings of the bridge service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// MQTT broker URL.
    pub mqtt_url: String,
    /// MQTT user name.
    pub mqtt_username: Option<String>,
    /// MQTT password.
    pub mqtt_password: Option<String>,
    /// Appliance address probed by the availability monitor.
    pub vakio_ip: Option<IpAddr>,
    /// HTTP listen address.
    pub web_server: SocketAddr,
    /// Capacity of the ingestion queue. Values below one are treated as one.
    pub queue_capacity: usize,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `MQTT_URL` is missing or `WEB_SERVER`
    /// is not a socket address.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// An unparsable `VAKIO_IP` is logged and treated as unset, so the
    /// service still runs with availability probing disabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `MQTT_URL` is missing or `WEB_SERVER`
    /// is not a socket address.
    ///
    /// # Examples
    ///
    /// ```
    /// use vakio_bridge::config::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "MQTT_URL" => Some("tcp://192.168.1.15:1883".to_string()),
    ///     "WEB_SERVER" => Some(":8080".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.web_server.port(), 8080);
    /// assert!(config.vakio_ip.is_none());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mqtt_url = var(ENV_MQTT_URL)
            .ok_or_else(|| Error::Config(format!("{ENV_MQTT_URL} must be set")))?;

        let vakio_ip = var(ENV_VAKIO_IP).and_then(|raw| match raw.trim().parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring invalid {ENV_VAKIO_IP}");
                None
            }
        });

        let web_server = var(ENV_WEB_SERVER).unwrap_or_else(|| DEFAULT_WEB_SERVER.to_string());
        let web_server = parse_listen_addr(&web_server)?;

        Ok(Self {
            mqtt_url,
            mqtt_username: var(ENV_MQTT_USERNAME),
            mqtt_password: var(ENV_MQTT_PASSWORD),
            vakio_ip,
            web_server,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    /// Sets the ingestion queue capacity. Zero is raised to one.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Returns the broker credentials, if a user name is configured.
    #[must_use]
    pub fn mqtt_credentials(&self) -> Option<(&str, &str)> {
        self.mqtt_username.as_deref().map(|username| {
            (username, self.mqtt_password.as_deref().unwrap_or_default())
        })
    }

    /// Returns the availability monitor settings.
    #[must_use]
    pub fn monitor(&self) -> MonitorConfig {
        MonitorConfig::new(self.vakio_ip)
    }
}

/// Parses `host:port`, accepting `:port` as "all interfaces".
fn parse_listen_addr(raw: &str) -> Result<SocketAddr, Error> {
    let raw = raw.trim();
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };
    full.parse()
        .map_err(|e| Error::Config(format!("invalid {ENV_WEB_SERVER} {raw:?}: {e}")))
}
