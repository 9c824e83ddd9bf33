// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance reachability monitor.
//!
//! The appliance never reports that it went away, so liveness is inferred
//! from ICMP echo. [`AvailabilityMonitor`] probes the configured address on
//! a schedule and feeds each verdict into the ingestion pipeline as an
//! availability event.
//!
//! The schedule has two phases (see [`Phase`]): a short warm-up period so
//! the first verdict arrives quickly after start, then a long steady-state
//! period.

mod availability;
mod phase;
mod prober;

pub use availability::{AvailabilityMonitor, MonitorConfig, TickOutcome};
pub use phase::Phase;
pub use prober::{IcmpProber, ProbeReport, Prober};
