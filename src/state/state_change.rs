// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] names one attribute that differs between two
//! consecutive [`DeviceState`](super::DeviceState) snapshots. Changes drive
//! the fine-grained subscription callbacks and manager events.

use serde::{Deserialize, Serialize};

use crate::protocol::AttributeId;
use crate::types::ModePayload;

/// A single attribute change.
///
/// # Examples
///
/// ```
/// use purifier_link::protocol::AttributeId;
/// use purifier_link::state::StateChange;
/// use purifier_link::types::Mode;
///
/// let change = StateChange::Mode(Mode::Silent.into());
/// assert_eq!(change.attribute(), AttributeId::Mode);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// The power switch changed.
    Power(bool),
    /// The fan mode changed.
    Mode(ModePayload),
}

impl StateChange {
    /// Returns the attribute this change concerns.
    #[must_use]
    pub const fn attribute(&self) -> AttributeId {
        match self {
            Self::Power(_) => AttributeId::Power,
            Self::Mode(_) => AttributeId::Mode,
        }
    }
}
