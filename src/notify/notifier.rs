// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fingerprint-based change detection.

use crate::state::{DeviceStatus, Fingerprint};

use super::HookRegistry;

/// Announces status changes to a [`HookRegistry`].
///
/// Only the single ingestion consumer drives the notifier, so the last
/// announced fingerprint needs no locking.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    last: Option<Fingerprint>,
    hooks: HookRegistry,
}

impl ChangeNotifier {
    /// Creates a notifier that has not announced anything yet.
    #[must_use]
    pub fn new(hooks: HookRegistry) -> Self {
        Self { last: None, hooks }
    }

    /// Compares `status` with the last announced fingerprint.
    ///
    /// On a mismatch the new fingerprint is remembered and every hook is
    /// called with `status`. Returns `true` if the hooks were called. The
    /// first observation always notifies.
    pub fn observe(&mut self, status: &DeviceStatus) -> bool {
        let fingerprint = status.fingerprint();
        if self.last == Some(fingerprint) {
            return false;
        }

        tracing::debug!(
            previous = ?self.last.map(|fp| fp.to_string()),
            current = %fingerprint,
            "Device status changed"
        );
        self.last = Some(fingerprint);
        self.hooks.dispatch(status);
        true
    }

    /// Returns the last announced fingerprint.
    #[must_use]
    pub fn last(&self) -> Option<Fingerprint> {
        self.last
    }

    /// Returns the hook registry.
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }
}
