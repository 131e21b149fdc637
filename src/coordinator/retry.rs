// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Retry and escalation policy.

use std::time::Duration;

/// Attempts made per poll cycle or command.
pub const MAX_RETRIES: u32 = 3;

/// Pause between two attempts of the same cycle.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Consecutive failed poll cycles after which the device is unavailable.
pub const FAILURE_THRESHOLD: u32 = 5;

/// Two-level retry policy.
///
/// Within one cycle an operation is attempted up to `max_attempts` times,
/// `retry_delay` apart. Across cycles, `failure_threshold` consecutive
/// exhausted poll cycles escalate to unavailability.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use purifier_link::coordinator::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.retry_delay(), Duration::from_secs(1));
/// assert_eq!(policy.failure_threshold(), 5);
///
/// let policy = RetryPolicy::new()
///     .with_max_attempts(5)
///     .with_retry_delay(Duration::from_millis(250))
///     .with_failure_threshold(2);
/// assert!(policy.is_escalated(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_delay: Duration,
    failure_threshold: u32,
}

impl RetryPolicy {
    /// Creates a policy with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempts per cycle. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the escalation threshold. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Returns the attempts per cycle.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Returns the escalation threshold.
    #[must_use]
    pub const fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Returns `true` if another attempt may follow attempt number `attempt`
    /// (1-based).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Returns `true` if `consecutive_failures` cycles warrant escalation.
    #[must_use]
    pub const fn is_escalated(&self, consecutive_failures: u32) -> bool {
        consecutive_failures >= self.failure_threshold
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
            failure_threshold: FAILURE_THRESHOLD,
        }
    }
}
