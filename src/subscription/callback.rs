// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{Availability, DeviceState, StateChange};
use crate::types::ModePayload;

/// Unique identifier for a subscription.
///
/// IDs are unique within a coordinator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

type PowerCallback = Arc<dyn Fn(bool) + Send + Sync>;

type ModeCallback = Arc<dyn Fn(ModePayload) + Send + Sync>;

type AvailabilityCallback = Arc<dyn Fn(Availability) + Send + Sync>;

/// Registry for managing coordinator subscription callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability. Callbacks are cloned
/// out of the maps before being invoked, so a callback may subscribe or
/// unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_callbacks: RwLock<HashMap<SubscriptionId, StateCallback>>,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    mode_callbacks: RwLock<HashMap<SubscriptionId, ModeCallback>>,
    availability_callbacks: RwLock<HashMap<SubscriptionId, AvailabilityCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_callbacks: RwLock::new(HashMap::new()),
            power_callbacks: RwLock::new(HashMap::new()),
            mode_callbacks: RwLock::new(HashMap::new()),
            availability_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback receiving the state published after each refresh.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for mode changes.
    pub fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ModePayload) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.mode_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for availability transitions.
    pub fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Availability) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.availability_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_callbacks.write().remove(&id).is_some()
            || self.power_callbacks.write().remove(&id).is_some()
            || self.mode_callbacks.write().remove(&id).is_some()
            || self.availability_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_callbacks.write().clear();
        self.power_callbacks.write().clear();
        self.mode_callbacks.write().clear();
        self.availability_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Publishes a state to every state subscriber.
    pub fn dispatch_state(&self, state: &DeviceState) {
        let callbacks: Vec<_> = self.state_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }

    /// Dispatches an attribute change to the matching subscribers.
    pub fn dispatch_change(&self, change: &StateChange) {
        match *change {
            StateChange::Power(on) => {
                let callbacks: Vec<_> = self.power_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(on);
                }
            }
            StateChange::Mode(mode) => {
                let callbacks: Vec<_> = self.mode_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(mode);
                }
            }
        }
    }

    /// Dispatches an availability transition.
    pub fn dispatch_availability(&self, availability: Availability) {
        let callbacks: Vec<_> = self
            .availability_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(availability);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_callbacks.read().len()
            + self.power_callbacks.read().len()
            + self.mode_callbacks.read().len()
            + self.availability_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
