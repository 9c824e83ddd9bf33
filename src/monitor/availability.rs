// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The polling loop.

use std::net::IpAddr;
use std::time::Duration;

use crate::error::ProbeError;
use crate::pipeline::{IngestEvent, IngestSender};
use crate::shutdown::Shutdown;

use super::{Phase, Prober};

/// Settings of an [`AvailabilityMonitor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    address: Option<IpAddr>,
    warm_up_period: Duration,
    steady_period: Duration,
    probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            address: None,
            warm_up_period: Duration::from_millis(500),
            steady_period: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(15),
        }
    }
}

impl MonitorConfig {
    /// Creates the default schedule for `address`.
    ///
    /// Without an address every tick is skipped.
    #[must_use]
    pub fn new(address: Option<IpAddr>) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Sets the period used while warming up (default: 500 ms).
    #[must_use]
    pub fn with_warm_up_period(mut self, period: Duration) -> Self {
        self.warm_up_period = period;
        self
    }

    /// Sets the period used in steady state (default: 30 s).
    #[must_use]
    pub fn with_steady_period(mut self, period: Duration) -> Self {
        self.steady_period = period;
        self
    }

    /// Sets the overall deadline of one probe (default: 15 s).
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Returns the probed address.
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        self.address
    }

    /// Returns the tick period of `phase`.
    #[must_use]
    pub fn period(&self, phase: Phase) -> Duration {
        match phase {
            Phase::WarmingUp => self.warm_up_period,
            Phase::SteadyState => self.steady_period,
        }
    }
}

/// Result of one monitor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The probe completed; `true` if the appliance answered.
    Verdict(bool),
    /// The probe could not be performed.
    Failed,
    /// No address is configured.
    Skipped,
}

/// Periodically probes the appliance and reports availability.
#[derive(Debug)]
pub struct AvailabilityMonitor<P> {
    config: MonitorConfig,
    prober: P,
    sender: IngestSender,
    phase: Phase,
}

impl<P: Prober> AvailabilityMonitor<P> {
    /// Creates a monitor in the warm-up phase.
    #[must_use]
    pub fn new(config: MonitorConfig, prober: P, sender: IngestSender) -> Self {
        Self {
            config,
            prober,
            sender,
            phase: Phase::WarmingUp,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Probes once and classifies the result. Does not report it.
    pub async fn tick(&self) -> TickOutcome {
        let address = match self.config.address.ok_or(ProbeError::NoAddress) {
            Ok(address) => address,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping availability probe");
                return TickOutcome::Skipped;
            }
        };

        let deadline = self.config.probe_timeout;
        let result = match tokio::time::timeout(deadline, self.prober.probe(address)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(
                u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            )),
        };

        match result {
            Ok(report) => {
                let available = report.is_reachable();
                tracing::debug!(
                    %address,
                    available,
                    loss = report.loss_percent(),
                    "Availability probed"
                );
                TickOutcome::Verdict(available)
            }
            Err(err) => {
                tracing::warn!(%address, error = %err, "Availability probe failed");
                TickOutcome::Failed
            }
        }
    }

    /// Runs the schedule until shutdown.
    ///
    /// Each tick waits for the current phase's period, probes, and then
    /// settles into the steady-state phase. Only verdicts are reported; a
    /// failed or skipped tick leaves availability unchanged. Shutdown
    /// abandons an in-flight probe.
    pub async fn run(mut self, mut shutdown: Shutdown) {
        tracing::debug!(address = ?self.config.address, "Availability monitor started");
        loop {
            let period = self.config.period(self.phase);
            tokio::select! {
                () = shutdown.wait() => break,
                () = tokio::time::sleep(period) => {}
            }

            let outcome = tokio::select! {
                () = shutdown.wait() => break,
                outcome = self.tick() => outcome,
            };

            if self.phase.is_warming_up() {
                tracing::debug!("Availability monitor entering steady state");
            }
            self.phase = self.phase.after_attempt();

            if let TickOutcome::Verdict(available) = outcome {
                let sent = tokio::select! {
                    () = shutdown.wait() => break,
                    sent = self.sender.send(IngestEvent::Availability(available)) => sent,
                };
                if sent.is_err() {
                    tracing::debug!("Ingestion queue closed, stopping availability monitor");
                    break;
                }
            }
        }
        tracing::debug!("Availability monitor stopped");
    }
}
