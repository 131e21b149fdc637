// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for state publishers.

use crate::state::{Availability, DeviceState};
use crate::subscription::SubscriptionId;
use crate::types::ModePayload;

/// Trait for types that publish device state to subscribers.
///
/// Anything that renders "current state" can attach here; there is no
/// entity base type to inherit from.
///
/// # Examples
///
/// ```no_run
/// use purifier_link::{Coordinator, DeviceConfig};
/// use purifier_link::protocol::SimulatedLink;
/// use purifier_link::subscription::Subscribable;
/// use purifier_link::types::Mode;
///
/// # async fn example() {
/// let link = SimulatedLink::new(true, Mode::Auto);
/// let coordinator = Coordinator::new(link, DeviceConfig::default());
///
/// let sub_id = coordinator.on_state_changed(|state| {
///     println!("power={} mode={}", state.power(), state.mode_name());
/// });
///
/// coordinator.refresh().await.ok();
/// coordinator.unsubscribe(sub_id);
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to published state.
    ///
    /// Called after every refresh that yields a state, including refreshes
    /// triggered by commands and cycles served from cache.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to power changes observed by a fresh read.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to mode changes observed by a fresh read.
    fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ModePayload) + Send + Sync + 'static;

    /// Subscribes to availability transitions.
    fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Availability) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
