// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute identifiers exposed by the purifier.

use std::fmt;

use uuid::{Uuid, uuid};

/// GATT service that groups the purifier's attributes.
pub const SERVICE_UUID: Uuid = uuid!("0000ffd0-0000-1000-8000-00805f9b34fb");

/// Attributes read and written by the coordinator.
///
/// Each attribute maps to a characteristic UUID so that a concrete
/// [`DeviceLink`](super::DeviceLink) can translate it to its own addressing.
///
/// # Examples
///
/// ```
/// use purifier_link::protocol::AttributeId;
///
/// assert_eq!(AttributeId::Power.payload_len(), 1);
/// assert_eq!(AttributeId::Mode.payload_len(), 4);
/// assert_eq!(
///     AttributeId::Mode.uuid().to_string(),
///     "0000ffd3-0000-1000-8000-00805f9b34fb"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    /// Power switch, 1-byte payload.
    Power,
    /// Fan mode, 4-byte payload.
    Mode,
}

impl AttributeId {
    /// Characteristic UUID of the attribute.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Power => uuid!("0000ffd1-0000-1000-8000-00805f9b34fb"),
            Self::Mode => uuid!("0000ffd3-0000-1000-8000-00805f9b34fb"),
        }
    }

    /// Length of the payload written to the attribute.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        match self {
            Self::Power => 1,
            Self::Mode => 4,
        }
    }

    /// Short lowercase name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
