// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vakio_bridge::{Config, Fingerprint, Service};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        broker = %config.mqtt_url,
        web_server = %config.web_server,
        device = ?config.vakio_ip,
        "Configuration loaded"
    );

    let service = match Service::start(config).await {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    service.hooks().on_change(|status| {
        info!(status = %Fingerprint::of(status), mode = %status.mode, "Status changed");
    });

    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl-C");
        }
    };
    match service.run_until(stop).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bridge failed");
            ExitCode::FAILURE
        }
    }
}
