// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state type.
//!
//! The power attribute is a single byte: `0x01` for on and `0x00` for off.
//! When reading, any non-zero byte counts as on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the power state of the purifier.
///
/// # Examples
///
/// ```
/// use purifier_link::types::PowerState;
///
/// assert_eq!(PowerState::On.as_byte(), 0x01);
/// assert_eq!(PowerState::from_byte(0x00), PowerState::Off);
/// assert_eq!(PowerState::from_byte(0x7F), PowerState::On);
/// assert_eq!(PowerState::from(true), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the byte written to the power attribute.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0x01,
        }
    }

    /// Interprets a byte read from the power attribute.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        if byte == 0 { Self::Off } else { Self::On }
    }

    /// Returns `true` if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the display string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(state: PowerState) -> Self {
        state.is_on()
    }
}
