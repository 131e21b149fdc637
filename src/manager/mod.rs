// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ownership of several coordinated purifiers.
//!
//! The [`DeviceManager`] is the explicit owner of every [`Coordinator`]
//! an application runs. A device is only registered once its first poll
//! succeeded; from then on it is polled in the background and its
//! availability and state changes appear on the manager's event channel.
//!
//! ```no_run
//! use purifier_link::event::DeviceEvent;
//! use purifier_link::manager::DeviceManager;
//! use purifier_link::protocol::SimulatedLink;
//!
//! # fn example() {
//! let manager = DeviceManager::<SimulatedLink>::new();
//! let mut events = manager.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let DeviceEvent::AvailabilityChanged { device_id, availability } = event {
//!             println!("{device_id}: {availability}");
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! [`Coordinator`]: crate::Coordinator

mod device_manager;

pub use device_manager::DeviceManager;
