// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state types.
//!
//! [`DeviceState`] is the snapshot produced by a successful poll,
//! [`StateChange`] names what differs between two snapshots and
//! [`Availability`] tells whether that state can be trusted.
//!
//! # Examples
//!
//! ```
//! use purifier_link::state::{DeviceState, StateChange};
//! use purifier_link::types::Mode;
//!
//! let before = DeviceState::new(false, Mode::Auto.into());
//! let after = DeviceState::new(true, Mode::Auto.into());
//!
//! assert_eq!(after.changes_since(Some(&before)), vec![StateChange::Power(true)]);
//! ```

mod availability;
mod device_state;
mod state_change;

pub use availability::Availability;
pub use device_state::DeviceState;
pub use state_change::StateChange;
