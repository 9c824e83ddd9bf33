// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reachability probes.

use std::future::Future;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};

use crate::error::ProbeError;

/// Source of ICMP identifiers, so concurrent probes do not steal replies.
static IDENTIFIER_COUNTER: AtomicU16 = AtomicU16::new(0);

/// Outcome of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Echo requests sent.
    pub transmitted: u16,
    /// Echo replies received.
    pub received: u16,
}

impl ProbeReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(transmitted: u16, received: u16) -> Self {
        Self {
            transmitted,
            received,
        }
    }

    /// Returns the packet loss in percent.
    #[must_use]
    pub fn loss_percent(&self) -> f64 {
        if self.transmitted == 0 {
            return 100.0;
        }
        let lost = self.transmitted.saturating_sub(self.received);
        f64::from(lost) * 100.0 / f64::from(self.transmitted)
    }

    /// Availability verdict: anything short of total loss counts as reachable.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.received > 0
    }
}

/// Something that can tell whether an address answers.
pub trait Prober: Send + Sync {
    /// Probes `address` once.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the probe could not be performed at all.
    /// Unanswered requests are not an error; they show up as loss in the
    /// report.
    fn probe(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<ProbeReport, ProbeError>> + Send;
}

/// ICMP echo prober.
///
/// Sends a fixed number of echo requests, one after the other, waiting up to
/// a per-packet timeout for each reply.
///
/// Opening the ICMP socket may require privileges (`CAP_NET_RAW`, or a
/// matching `net.ipv4.ping_group_range` on Linux). Failure to open it is
/// reported as [`ProbeError::Socket`].
#[derive(Debug, Clone)]
pub struct IcmpProber {
    count: u16,
    packet_timeout: Duration,
    interval: Duration,
    payload: Vec<u8>,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self {
            count: 4,
            packet_timeout: Duration::from_secs(2),
            interval: Duration::from_secs(1),
            payload: vec![0; 56],
        }
    }
}

impl IcmpProber {
    /// Creates a prober sending 4 requests with a 2 second reply timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of echo requests per probe.
    #[must_use]
    pub fn with_count(mut self, count: u16) -> Self {
        self.count = count;
        self
    }

    /// Sets how long to wait for each reply.
    #[must_use]
    pub fn with_packet_timeout(mut self, timeout: Duration) -> Self {
        self.packet_timeout = timeout;
        self
    }

    /// Sets the pause between two requests.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the number of echo requests per probe.
    #[must_use]
    pub fn count(&self) -> u16 {
        self.count
    }
}

impl Prober for IcmpProber {
    async fn probe(&self, address: IpAddr) -> Result<ProbeReport, ProbeError> {
        let config = match address {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = Client::new(&config).map_err(ProbeError::Socket)?;

        let identifier = PingIdentifier(IDENTIFIER_COUNTER.fetch_add(1, Ordering::Relaxed));
        let mut pinger = client.pinger(address, identifier).await;
        pinger.timeout(self.packet_timeout);

        let mut received = 0;
        for seq in 0..self.count {
            if seq > 0 {
                tokio::time::sleep(self.interval).await;
            }
            match pinger.ping(PingSequence(seq), &self.payload).await {
                Ok((_, rtt)) => {
                    received += 1;
                    tracing::trace!(%address, seq, ?rtt, "Echo reply");
                }
                Err(SurgeError::Timeout { .. }) => {
                    tracing::trace!(%address, seq, "Echo request timed out");
                }
                Err(e) => {
                    tracing::debug!(%address, seq, error = %e, "Echo request failed");
                }
            }
        }

        let report = ProbeReport::new(self.count, received);
        tracing::debug!(
            %address,
            transmitted = report.transmitted,
            received = report.received,
            loss = report.loss_percent(),
            "Probe finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_loss_is_unreachable() {
        let report = ProbeReport::new(4, 0);
        assert!(!report.is_reachable());
        assert!((report.loss_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_loss_is_reachable() {
        let report = ProbeReport::new(4, 1);
        assert!(report.is_reachable());
        assert!((report.loss_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_sent_counts_as_total_loss() {
        let report = ProbeReport::new(0, 0);
        assert!(!report.is_reachable());
        assert!((report.loss_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn icmp_prober_settings() {
        let prober = IcmpProber::new()
            .with_count(2)
            .with_packet_timeout(Duration::from_millis(500))
            .with_interval(Duration::ZERO);
        assert_eq!(prober.count(), 2);
        assert_eq!(prober.packet_timeout, Duration::from_millis(500));
        assert_eq!(prober.interval, Duration::ZERO);
        assert_eq!(IcmpProber::default().count(), 4);
    }
}
