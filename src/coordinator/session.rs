// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Failure bookkeeping and last-known-good state.

use super::retry::RetryPolicy;
use crate::error::{LinkError, PollError};
use crate::state::{Availability, DeviceState};
use crate::types::PollInterval;

/// Point-in-time view of a coordinator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDiagnostics {
    /// Exhausted poll cycles since the last successful read or write.
    pub consecutive_failures: u32,
    /// Current availability.
    pub availability: Availability,
    /// Last successfully read state.
    pub last_good_state: Option<DeviceState>,
    /// Description of the most recent link failure, if any.
    pub last_error: Option<String>,
    /// Current poll interval.
    pub poll_interval: PollInterval,
}

/// Result of recording a successful read.
#[derive(Debug)]
pub(crate) struct ReadRecorded {
    pub previous: Option<DeviceState>,
    pub availability_changed: Option<Availability>,
}

/// Result of recording an exhausted poll cycle.
#[derive(Debug)]
pub(crate) struct FailureRecorded {
    pub result: Result<DeviceState, PollError>,
    pub availability_changed: Option<Availability>,
}

/// Mutable state of one coordinator.
#[derive(Debug, Default)]
pub(crate) struct Session {
    consecutive_failures: u32,
    last_good_state: Option<DeviceState>,
    availability: Availability,
    last_error: Option<String>,
}

impl Session {
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_good_state(&self) -> Option<DeviceState> {
        self.last_good_state
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn diagnostics(&self, poll_interval: PollInterval) -> SessionDiagnostics {
        SessionDiagnostics {
            consecutive_failures: self.consecutive_failures,
            availability: self.availability,
            last_good_state: self.last_good_state,
            last_error: self.last_error.clone(),
            poll_interval,
        }
    }

    /// Caches a freshly read state and resets the failure count.
    pub fn record_read(&mut self, state: DeviceState) -> ReadRecorded {
        self.consecutive_failures = 0;
        self.last_error = None;
        let previous = self.last_good_state.replace(state);
        ReadRecorded {
            previous,
            availability_changed: self.transition(Availability::Available),
        }
    }

    /// Resets the failure count after a successful write.
    ///
    /// Availability is left alone: only a read proves the state is current.
    pub fn record_write(&mut self) {
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    /// Notes a failure that does not count as a poll cycle.
    pub fn record_error(&mut self, error: &LinkError) {
        self.last_error = Some(error.to_string());
    }

    /// Classifies an exhausted poll cycle.
    pub fn record_failed_cycle(
        &mut self,
        error: &LinkError,
        policy: &RetryPolicy,
    ) -> FailureRecorded {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.to_string());

        if policy.is_escalated(self.consecutive_failures) {
            return FailureRecorded {
                result: Err(PollError::Unavailable {
                    consecutive_failures: self.consecutive_failures,
                }),
                availability_changed: self.transition(Availability::Unavailable),
            };
        }

        FailureRecorded {
            result: self.last_good_state.ok_or(PollError::NoDataYet),
            availability_changed: None,
        }
    }

    fn transition(&mut self, next: Availability) -> Option<Availability> {
        if self.availability == next {
            return None;
        }
        self.availability = next;
        Some(next)
    }
}
