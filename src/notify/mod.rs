// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notification.
//!
//! The ingestion pipeline hands every post-update status to a
//! [`ChangeNotifier`]. The notifier compares the status [`Fingerprint`] with
//! the last one it announced and only calls the registered hooks when it
//! differs, so repeated identical reports stay silent.
//!
//! Hooks are plain closures registered on a [`HookRegistry`]:
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use vakio_bridge::notify::{ChangeNotifier, HookRegistry};
//! use vakio_bridge::state::DeviceStatus;
//!
//! let hooks = HookRegistry::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! hooks.on_change(move |_status| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let mut notifier = ChangeNotifier::new(hooks);
//! let status = DeviceStatus::new();
//! assert!(notifier.observe(&status));
//! assert!(!notifier.observe(&status));
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```
//!
//! [`Fingerprint`]: crate::state::Fingerprint

mod hooks;
mod notifier;

pub use hooks::{HookId, HookRegistry};
pub use notifier::ChangeNotifier;
