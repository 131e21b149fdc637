// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device configuration.

use serde::{Deserialize, Serialize};

use crate::coordinator::RetryPolicy;
use crate::types::PollInterval;

/// Label used in logs when no friendly name is configured.
pub const DEFAULT_LABEL: &str = "purifier";

/// Configuration for one coordinated device.
///
/// The persisted part (`friendly_name`, `poll_interval`) deserializes from
/// any serde format; an out-of-range poll interval is rejected at that point.
/// The retry policy is a runtime setting and is never persisted.
///
/// # Examples
///
/// ```
/// use purifier_link::DeviceConfig;
/// use purifier_link::types::PollInterval;
///
/// let config = DeviceConfig::new()
///     .with_friendly_name("Bedroom purifier")
///     .with_poll_interval(PollInterval::new(60).unwrap());
///
/// assert_eq!(config.label(), "Bedroom purifier");
/// assert_eq!(config.poll_interval.seconds(), 60);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Optional friendly name for the device.
    pub friendly_name: Option<String>,
    /// Seconds between poll cycles.
    pub poll_interval: PollInterval,
    /// Retry and escalation policy.
    #[serde(skip)]
    pub retry: RetryPolicy,
}

impl DeviceConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a friendly name for the device.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: PollInterval) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Returns the name used to identify the device in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(DEFAULT_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.friendly_name, None);
        assert_eq!(config.poll_interval, PollInterval::DEFAULT);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.label(), DEFAULT_LABEL);
    }

    #[test]
    fn deserializes_persisted_fields() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"friendly_name":"Office","poll_interval":120}"#).unwrap();
        assert_eq!(config.label(), "Office");
        assert_eq!(config.poll_interval.seconds(), 120);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: DeviceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn rejects_out_of_range_interval() {
        assert!(serde_json::from_str::<DeviceConfig>(r#"{"poll_interval":5}"#).is_err());
        assert!(serde_json::from_str::<DeviceConfig>(r#"{"poll_interval":601}"#).is_err());
    }

    #[test]
    fn retry_policy_is_not_serialized() {
        let json = serde_json::to_string(&DeviceConfig::default()).unwrap();
        assert_eq!(json, r#"{"friendly_name":null,"poll_interval":30}"#);
    }
}
