// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Availability of a polled device.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Availability of the device as seen by subscribers.
///
/// A device starts [`NotReady`](Self::NotReady), becomes
/// [`Available`](Self::Available) on its first successful read and only turns
/// [`Unavailable`](Self::Unavailable) once enough consecutive poll cycles
/// have failed. Isolated failures never change availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Availability {
    /// No poll has succeeded yet.
    #[default]
    NotReady,
    /// State is being served (possibly cached across a transient failure).
    Available,
    /// The failure threshold was crossed.
    Unavailable,
}

impl Availability {
    /// Returns `true` if the device is available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotReady => "not ready",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        })
    }
}
