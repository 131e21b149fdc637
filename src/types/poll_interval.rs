// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll interval type.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Interval between two scheduled polls, in whole seconds (10-600).
///
/// Shorter intervals give fresher state at the cost of radio time and
/// battery on the peer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use purifier_link::types::PollInterval;
///
/// let interval = PollInterval::new(60).unwrap();
/// assert_eq!(interval.as_duration(), Duration::from_secs(60));
///
/// assert_eq!(PollInterval::default().seconds(), 30);
/// assert!(PollInterval::new(5).is_err());
/// assert!(PollInterval::new(601).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PollInterval(u64);

impl PollInterval {
    /// Shortest allowed interval.
    pub const MIN: Self = Self(10);

    /// Longest allowed interval.
    pub const MAX: Self = Self(600);

    /// Default interval.
    pub const DEFAULT: Self = Self(30);

    /// Creates a poll interval.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `seconds` is outside 10-600.
    pub fn new(seconds: u64) -> Result<Self, ValueError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&seconds) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: seconds,
            });
        }
        Ok(Self(seconds))
    }

    /// Returns the interval in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        self.0
    }

    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for PollInterval {
    type Error = ValueError;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}

impl From<PollInterval> for u64 {
    fn from(interval: PollInterval) -> Self {
        interval.0
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(PollInterval::new(10).unwrap(), PollInterval::MIN);
        assert_eq!(PollInterval::new(600).unwrap(), PollInterval::MAX);
    }

    #[test]
    fn out_of_range_reports_bounds() {
        let err = PollInterval::new(9).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                min: 10,
                max: 600,
                actual: 9
            }
        );
        assert!(PollInterval::new(0).is_err());
        assert!(PollInterval::new(u64::MAX).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PollInterval::DEFAULT.to_string(), "30s");
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: PollInterval = serde_json::from_str("120").unwrap();
        assert_eq!(ok.seconds(), 120);

        assert!(serde_json::from_str::<PollInterval>("3").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "120");
    }
}
