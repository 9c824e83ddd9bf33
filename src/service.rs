// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service wiring.
//!
//! [`Service::start`] builds every component around one [`StatusStore`] and
//! spawns the background loops:
//!
//! - the ingestion consumer,
//! - the MQTT event loop,
//! - the availability monitor,
//! - the HTTP server (feature `http`).
//!
//! [`Service::run_until`] then waits for a stop signal, or for the HTTP
//! server to fail, and shuts everything down.

use std::future::Future;
#[cfg(feature = "http")]
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::monitor::{AvailabilityMonitor, IcmpProber};
use crate::notify::{ChangeNotifier, HookRegistry};
use crate::pipeline::Ingestor;
use crate::protocol::MqttTransport;
use crate::shutdown::{self, ShutdownTrigger};
use crate::state::StatusStore;

/// The running bridge.
pub struct Service {
    store: StatusStore,
    hooks: HookRegistry,
    transport: MqttTransport,
    dispatcher: Arc<Dispatcher<MqttTransport>>,
    trigger: ShutdownTrigger,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    fatal: mpsc::Receiver<Error>,
    #[cfg(feature = "http")]
    local_addr: SocketAddr,
}

impl Service {
    /// Starts the bridge with an empty hook registry.
    ///
    /// # Errors
    ///
    /// Returns error if the broker connection or the HTTP listener cannot be
    /// established. Tasks already spawned are stopped.
    pub async fn start(config: Config) -> Result<Self, Error> {
        Self::start_with_hooks(config, HookRegistry::new()).await
    }

    /// Starts the bridge, announcing status changes to `hooks`.
    ///
    /// # Errors
    ///
    /// Returns error if the broker connection or the HTTP listener cannot be
    /// established. Tasks already spawned are stopped.
    pub async fn start_with_hooks(config: Config, hooks: HookRegistry) -> Result<Self, Error> {
        let store = StatusStore::new();
        let (trigger, shutdown) = shutdown::channel();
        let (fatal_tx, fatal) = mpsc::channel(1);

        let (sender, ingestor) = Ingestor::channel(
            store.clone(),
            ChangeNotifier::new(hooks.clone()),
            config.queue_capacity.max(1),
        );
        let mut tasks = vec![("ingestion", tokio::spawn(ingestor.run(shutdown.clone())))];

        let mut builder = MqttTransport::builder().broker(config.mqtt_url.as_str());
        if let Some((username, password)) = config.mqtt_credentials() {
            builder = builder.credentials(username, password);
        }
        let (transport, events) = match builder.build(sender.clone(), shutdown.clone()).await {
            Ok(started) => started,
            Err(e) => {
                trigger.trigger();
                return Err(e.into());
            }
        };
        tasks.push(("mqtt", events));

        let monitor = AvailabilityMonitor::new(config.monitor(), IcmpProber::new(), sender);
        tasks.push(("monitor", tokio::spawn(monitor.run(shutdown.clone()))));

        let dispatcher = Arc::new(Dispatcher::new(transport.clone(), store.clone()));

        #[cfg(feature = "http")]
        let local_addr = {
            use crate::web::{self, AppState};

            let bound = tokio::net::TcpListener::bind(config.web_server)
                .await
                .and_then(|listener| listener.local_addr().map(|addr| (listener, addr)));
            let (listener, local_addr) = match bound {
                Ok(bound) => bound,
                Err(e) => {
                    trigger.trigger();
                    return Err(e.into());
                }
            };
            let router = web::create_router(AppState::new(store.clone(), Arc::clone(&dispatcher)));
            let http_shutdown = shutdown.clone();
            tasks.push((
                "http",
                tokio::spawn(async move {
                    if let Err(e) = web::serve(listener, router, http_shutdown).await {
                        tracing::error!(error = %e, "HTTP server failed");
                        let _ = fatal_tx.send(e.into()).await;
                    }
                }),
            ));
            local_addr
        };
        #[cfg(not(feature = "http"))]
        drop(fatal_tx);
        drop(shutdown);

        tracing::info!("Bridge started");
        Ok(Self {
            store,
            hooks,
            transport,
            dispatcher,
            trigger,
            tasks,
            fatal,
            #[cfg(feature = "http")]
            local_addr,
        })
    }

    /// Returns the shared status store.
    #[must_use]
    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    /// Returns the hook registry; hooks may be added while running.
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Returns the command dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<MqttTransport> {
        &self.dispatcher
    }

    /// Returns the address the HTTP server is bound to.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs until `signal` resolves, then shuts down.
    ///
    /// # Errors
    ///
    /// Returns the error of a background task that failed before `signal`.
    pub async fn run_until(mut self, signal: impl Future<Output = ()>) -> Result<(), Error> {
        let result = tokio::select! {
            () = signal => {
                tracing::info!("Shutdown requested");
                Ok(())
            }
            Some(err) = self.fatal.recv() => Err(err),
        };
        self.shutdown().await;
        result
    }

    /// Stops every background task and waits for them.
    pub async fn shutdown(self) {
        if let Err(e) = self.transport.disconnect().await {
            tracing::debug!(error = %e, "MQTT disconnect failed");
        }
        self.trigger.trigger();
        for (name, handle) in self.tasks {
            if let Err(e) = handle.await {
                tracing::warn!(task = name, error = %e, "Task ended abnormally");
            }
        }
        tracing::info!("Bridge stopped");
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("transport", &self.transport)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
