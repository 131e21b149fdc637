// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `purifier_link` - resilient polling and control of a BLE air purifier.
//!
//! The purifier exposes two attributes, power and fan mode, over an
//! unreliable point-to-point link. This library keeps a best known copy of
//! both, retries transient link failures, and only reports the device as
//! unavailable once failures persist across several poll cycles.
//!
//! # Overview
//!
//! - [`Coordinator`] - owns one [`DeviceLink`](protocol::DeviceLink), polls
//!   it on a timer and serializes power/mode commands against it
//! - [`manager::DeviceManager`] - owns several coordinators and forwards
//!   their notifications onto a broadcast channel
//! - [`protocol`] - the link abstraction, attribute wire encoding and an
//!   in-memory [`SimulatedLink`](protocol::SimulatedLink)
//! - [`subscription`] - callbacks for state, attribute and availability
//!   changes
//!
//! The transport driver itself is not part of this crate. Anything that
//! can connect, read and write the two attributes can implement
//! [`DeviceLink`](protocol::DeviceLink).
//!
//! # Quick Start
//!
//! ```no_run
//! use purifier_link::{Coordinator, DeviceConfig};
//! use purifier_link::protocol::SimulatedLink;
//! use purifier_link::subscription::Subscribable;
//! use purifier_link::types::{Mode, PollInterval};
//!
//! #[tokio::main]
//! async fn main() -> purifier_link::Result<()> {
//!     let config = DeviceConfig::new()
//!         .with_friendly_name("Living room")
//!         .with_poll_interval(PollInterval::new(60)?);
//!     let coordinator = Coordinator::new(SimulatedLink::new(false, Mode::Auto), config);
//!
//!     coordinator.on_availability_changed(|availability| {
//!         println!("purifier is {availability}");
//!     });
//!
//!     coordinator.first_refresh().await?;
//!     coordinator.spawn_poller();
//!
//!     coordinator.set_power(true).await?;
//!     coordinator.set_mode_by_name("Silent").await?;
//!
//!     coordinator.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod coordinator;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use coordinator::{Coordinator, DeviceConfig, RetryPolicy, SessionDiagnostics};
pub use error::{CommandError, Error, LinkError, PollError, Result, ValueError};
pub use state::{Availability, DeviceState, StateChange};
pub use subscription::{Subscribable, SubscriptionId};
pub use types::{Mode, ModePayload, PollInterval, PowerState};
