// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device state.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that manages callbacks and dispatches updates
//! - [`Subscribable`] - Trait for types that publish state
//!
//! Callbacks run synchronously on the task that performed the refresh,
//! so they should return quickly.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
