// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manager-level events.
//!
//! The [`DeviceManager`](crate::manager::DeviceManager) forwards each
//! coordinator's notifications onto an [`EventBus`], tagged with the
//! [`DeviceId`] of the device they came from.
//!
//! # Examples
//!
//! ```
//! use purifier_link::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::DeviceAdded { device_id: DeviceId::new() });
//! assert!(rx.try_recv().unwrap().is_lifecycle());
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
