// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{Mode, ModePayload, PowerState};

use super::StateChange;

/// Snapshot of the purifier produced by one successful full read.
///
/// Snapshots are immutable values: every successful poll produces a new one
/// and failed polls keep serving the previous one.
///
/// # Examples
///
/// ```
/// use purifier_link::state::DeviceState;
/// use purifier_link::types::Mode;
///
/// let state = DeviceState::new(true, Mode::Standard.into());
/// assert!(state.power());
/// assert_eq!(state.mode(), Some(Mode::Standard));
/// assert_eq!(state.mode_name(), "Standard");
/// assert_eq!(state.mode_code(), 0x02);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceState {
    power: bool,
    mode: ModePayload,
}

impl DeviceState {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(power: bool, mode: ModePayload) -> Self {
        Self { power, mode }
    }

    /// Returns `true` if the purifier is on.
    #[must_use]
    pub const fn power(&self) -> bool {
        self.power
    }

    /// Returns the power state.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        PowerState::from(self.power)
    }

    /// Returns the decoded mode, or `None` if the device reported an
    /// unrecognized code.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        self.mode.mode()
    }

    /// Returns the mode name (`"Unknown"` for unrecognized codes).
    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Returns the raw mode code.
    #[must_use]
    pub const fn mode_code(&self) -> u8 {
        self.mode.code()
    }

    /// Returns the raw mode payload.
    #[must_use]
    pub const fn mode_payload(&self) -> ModePayload {
        self.mode
    }

    /// Lists what changed going from `previous` to `self`.
    ///
    /// Without a previous snapshot every attribute counts as changed.
    #[must_use]
    pub fn changes_since(&self, previous: Option<&Self>) -> Vec<StateChange> {
        let mut changes = Vec::new();
        if previous.is_none_or(|prev| prev.power != self.power) {
            changes.push(StateChange::Power(self.power));
        }
        if previous.is_none_or(|prev| prev.mode != self.mode) {
            changes.push(StateChange::Mode(self.mode));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_keeps_raw_code() {
        let state = DeviceState::new(false, ModePayload::from_code(0x42));
        assert_eq!(state.mode(), None);
        assert_eq!(state.mode_name(), "Unknown");
        assert_eq!(state.mode_code(), 0x42);
        assert_eq!(state.power_state(), PowerState::Off);
    }

    #[test]
    fn first_snapshot_reports_everything() {
        let state = DeviceState::new(true, Mode::Auto.into());
        assert_eq!(
            state.changes_since(None),
            vec![
                StateChange::Power(true),
                StateChange::Mode(Mode::Auto.into())
            ]
        );
    }

    #[test]
    fn identical_snapshot_reports_nothing() {
        let state = DeviceState::new(true, Mode::Auto.into());
        assert!(state.changes_since(Some(&state)).is_empty());
    }

    #[test]
    fn only_differences_are_reported() {
        let before = DeviceState::new(true, Mode::Auto.into());
        let after = DeviceState::new(true, Mode::Strong.into());
        assert_eq!(
            after.changes_since(Some(&before)),
            vec![StateChange::Mode(Mode::Strong.into())]
        );
    }
}
