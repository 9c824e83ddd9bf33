// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of status change hooks.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::DeviceStatus;

/// Handle returned by [`HookRegistry::on_change`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.0)
    }
}

type Hook = Arc<dyn Fn(&DeviceStatus) + Send + Sync>;

/// Thread-safe set of change hooks.
///
/// Cloning yields another handle to the same set, so hooks can be added
/// after the registry has been handed to the ingestion pipeline. An empty
/// registry is a valid no-op sink.
#[derive(Clone)]
pub struct HookRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    next_id: AtomicU64,
    hooks: RwLock<HashMap<HookId, Hook>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                next_id: AtomicU64::new(1),
                hooks: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Registers a hook called with the new status after every change.
    pub fn on_change<F>(&self, hook: F) -> HookId
    where
        F: Fn(&DeviceStatus) + Send + Sync + 'static,
    {
        let id = HookId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.hooks.write().insert(id, Arc::new(hook));
        id
    }

    /// Removes a hook. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: HookId) -> bool {
        self.inner.hooks.write().remove(&id).is_some()
    }

    /// Removes every hook.
    pub fn clear(&self) {
        self.inner.hooks.write().clear();
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.hooks.read().len()
    }

    /// Returns `true` if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.hooks.read().is_empty()
    }

    /// Calls every hook with `status`, in no particular order.
    ///
    /// The registry lock is released before the hooks run, so a hook may
    /// register or remove hooks. A panicking hook is logged and skipped.
    /// Returns the number of hooks that completed.
    pub fn dispatch(&self, status: &DeviceStatus) -> usize {
        let hooks: Vec<(HookId, Hook)> = self
            .inner
            .hooks
            .read()
            .iter()
            .map(|(id, hook)| (*id, Arc::clone(hook)))
            .collect();

        let mut completed = 0;
        for (id, hook) in hooks {
            match panic::catch_unwind(AssertUnwindSafe(|| hook(status))) {
                Ok(()) => completed += 1,
                Err(_) => tracing::error!(hook = %id, "Change hook panicked"),
            }
        }
        completed
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}
