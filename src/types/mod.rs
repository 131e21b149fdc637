// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for purifier control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so invalid arguments are rejected before any link I/O.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off power state
//! - [`Mode`] - Closed set of fan modes (Auto, Silent, Standard, Strong)
//! - [`ModePayload`] - Raw 4-byte mode attribute, including unknown codes
//! - [`PollInterval`] - Scheduled poll period (10-600 seconds)

mod mode;
mod poll_interval;
mod power;

pub use mode::{MODE_PADDING, Mode, ModePayload, UNKNOWN_MODE_NAME};
pub use poll_interval::PollInterval;
pub use power::PowerState;
