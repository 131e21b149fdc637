// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Managed device identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier the [`DeviceManager`](crate::manager::DeviceManager) assigns
/// to each registered purifier.
///
/// # Examples
///
/// ```
/// use purifier_link::event::DeviceId;
///
/// let id = DeviceId::new();
/// let parsed: DeviceId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First group is enough to tell devices apart in logs.
        let simple = self.0.simple().to_string();
        write!(f, "DeviceId({})", &simple[..8])
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DeviceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for DeviceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(DeviceId::new(), DeviceId::new());
    }

    #[test]
    fn parse_and_display() {
        let id: DeviceId = "6f1c2a9e-0d4b-4e37-9a51-3c8e7d2b1f00".parse().unwrap();
        assert_eq!(id.to_string(), "6f1c2a9e-0d4b-4e37-9a51-3c8e7d2b1f00");
        assert_eq!(format!("{id:?}"), "DeviceId(6f1c2a9e)");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("purifier".parse::<DeviceId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DeviceId::from(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""00000000-0000-0000-0000-000000000000""#);
    }
}
