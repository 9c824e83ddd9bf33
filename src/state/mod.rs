// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical device status.
//!
//! [`DeviceStatus`] is the single record describing the appliance. Inbound
//! topic payloads are folded into it with [`DeviceStatus::apply_inbound`],
//! and [`Fingerprint`] captures the subset of fields whose change is worth
//! announcing downstream. [`StatusStore`] is the shared handle every task
//! reads and writes through.
//!
//! # Examples
//!
//! ```
//! use vakio_bridge::protocol::Topic;
//! use vakio_bridge::state::StatusStore;
//! use vakio_bridge::types::{FanSpeed, PowerState};
//!
//! let store = StatusStore::new();
//! store.update(|status| status.apply_inbound(Topic::Speed, "3")).unwrap();
//!
//! let status = store.snapshot();
//! assert_eq!(status.speed, FanSpeed::new(3));
//! assert_eq!(status.state, PowerState::On);
//! ```

mod device_status;
mod fingerprint;
mod store;

pub use device_status::DeviceStatus;
pub use fingerprint::Fingerprint;
pub use store::StatusStore;
