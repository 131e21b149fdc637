// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use serde::{Deserialize, Serialize};

use crate::state::{Availability, DeviceState, StateChange};

use super::DeviceId;

/// Events broadcast by the device manager.
///
/// # Examples
///
/// ```
/// use purifier_link::event::{DeviceEvent, DeviceId};
/// use purifier_link::state::Availability;
///
/// let device_id = DeviceId::new();
/// let event = DeviceEvent::AvailabilityChanged {
///     device_id,
///     availability: Availability::Unavailable,
/// };
/// assert_eq!(event.device_id(), device_id);
/// assert!(!event.is_lifecycle());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// A device passed its first refresh and was registered.
    DeviceAdded {
        /// The registered device.
        device_id: DeviceId,
    },

    /// A device was shut down and removed.
    DeviceRemoved {
        /// The removed device.
        device_id: DeviceId,
    },

    /// A device became available or unavailable.
    AvailabilityChanged {
        /// The device.
        device_id: DeviceId,
        /// The new availability.
        availability: Availability,
    },

    /// A fresh read observed a different attribute value.
    StateChanged {
        /// The device.
        device_id: DeviceId,
        /// The attribute that changed.
        change: StateChange,
        /// The full state after the change.
        new_state: DeviceState,
    },
}

impl DeviceEvent {
    /// Returns the device this event concerns.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::AvailabilityChanged { device_id, .. }
            | Self::StateChanged { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` for added/removed events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` for state change events.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }
}
